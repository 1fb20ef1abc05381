// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pattern lookups that turn a substring or a regular expression into ranges of the text.

use std::borrow::Cow;
use std::fmt;

use attributed_text::TextRange;
use regex::{Regex, RegexBuilder};

use crate::Error;

/// Which of a pattern's matches a lookup keeps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Only the leftmost match.
    First,
    /// Only the rightmost match.
    Last,
    /// Every match, left to right.
    Each,
}

/// Flags controlling how a regular expression is compiled.
///
/// ```
/// use text_composer::RegexOptions;
///
/// let options = RegexOptions::new().case_insensitive(true).multi_line(true);
/// assert!(options.is_case_insensitive());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegexOptions {
    case_insensitive: bool,
    multi_line: bool,
    dot_matches_new_line: bool,
    ignore_whitespace: bool,
    ignore_metacharacters: bool,
    unicode: bool,
    crlf: bool,
}

impl RegexOptions {
    /// Default options: case-sensitive, Unicode-aware, `^`/`$` anchor to the whole text.
    pub const fn new() -> Self {
        Self {
            case_insensitive: false,
            multi_line: false,
            dot_matches_new_line: false,
            ignore_whitespace: false,
            ignore_metacharacters: false,
            unicode: true,
            crlf: false,
        }
    }

    /// Match letters regardless of case.
    pub const fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// Let `^` and `$` match at line starts and ends.
    pub const fn multi_line(mut self, yes: bool) -> Self {
        self.multi_line = yes;
        self
    }

    /// Let `.` match line separators.
    pub const fn dot_matches_new_line(mut self, yes: bool) -> Self {
        self.dot_matches_new_line = yes;
        self
    }

    /// Ignore whitespace in the pattern and allow `#` comments.
    pub const fn ignore_whitespace(mut self, yes: bool) -> Self {
        self.ignore_whitespace = yes;
        self
    }

    /// Treat the whole pattern as literal text.
    pub const fn ignore_metacharacters(mut self, yes: bool) -> Self {
        self.ignore_metacharacters = yes;
        self
    }

    /// Use Unicode semantics for classes and word boundaries (on by default).
    pub const fn unicode(mut self, yes: bool) -> Self {
        self.unicode = yes;
        self
    }

    /// Treat `\r\n` as well as `\n` as a line separator for anchors and `.`.
    pub const fn crlf(mut self, yes: bool) -> Self {
        self.crlf = yes;
        self
    }

    /// Whether matching ignores case.
    pub const fn is_case_insensitive(self) -> bool {
        self.case_insensitive
    }

    fn compile(self, pattern: &str) -> Result<Regex, Error> {
        let source = if self.ignore_metacharacters {
            Cow::Owned(regex::escape(pattern))
        } else {
            Cow::Borrowed(pattern)
        };
        let regex = RegexBuilder::new(&source)
            .case_insensitive(self.case_insensitive)
            .multi_line(self.multi_line)
            .dot_matches_new_line(self.dot_matches_new_line)
            .ignore_whitespace(self.ignore_whitespace)
            .unicode(self.unicode)
            .crlf(self.crlf)
            .build()?;
        Ok(regex)
    }
}

impl Default for RegexOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// A capture group, by position or by name.
///
/// Group `0` is the whole match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GroupRef {
    /// The group at this index.
    Index(usize),
    /// The group with this name.
    Name(String),
}

impl From<usize> for GroupRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for GroupRef {
    fn from(name: &str) -> Self {
        Self::Name(name.into())
    }
}

impl fmt::Display for GroupRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => write!(f, "`{name}`"),
        }
    }
}

/// What to look for in the text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern<'p> {
    /// Literal, case-sensitive occurrences of a string.
    Substring(&'p str),
    /// Matches of a regular expression, or of one of its capture groups.
    Regex {
        /// The expression source.
        pattern: &'p str,
        /// Compilation flags.
        options: RegexOptions,
        /// The capture group to report instead of the whole match.
        group: Option<GroupRef>,
    },
}

impl<'p> Pattern<'p> {
    /// Literal occurrences of `needle`.
    pub fn substring(needle: &'p str) -> Self {
        Self::Substring(needle)
    }

    /// Whole matches of `pattern`.
    pub fn regex(pattern: &'p str, options: RegexOptions) -> Self {
        Self::Regex {
            pattern,
            options,
            group: None,
        }
    }

    /// Capture group `group` of each match of `pattern`.
    pub fn regex_group(
        pattern: &'p str,
        group: impl Into<GroupRef>,
        options: RegexOptions,
    ) -> Self {
        Self::Regex {
            pattern,
            options,
            group: Some(group.into()),
        }
    }
}

/// Finds the ranges of a text selected by a [`Pattern`] and a [`Selection`].
///
/// Matches are non-overlapping and reported left to right. Finding nothing is not an error.
///
/// ```
/// use text_composer::{MatchFinder, Pattern, Selection};
///
/// let finder = MatchFinder::new("abababa");
/// let each = finder.find(&Pattern::substring("a"), Selection::Each)?;
/// let starts: Vec<_> = each.iter().map(|r| r.start()).collect();
/// assert_eq!(starts, [0, 2, 4, 6]);
///
/// let last = finder.find(&Pattern::substring("ab"), Selection::Last)?;
/// assert_eq!(last[0].as_range(), 4..6);
/// # Ok::<(), text_composer::Error>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MatchFinder<'t> {
    text: &'t str,
}

impl<'t> MatchFinder<'t> {
    /// Creates a finder over `text`.
    pub fn new(text: &'t str) -> Self {
        Self { text }
    }

    /// Returns the ranges `pattern` selects.
    pub fn find(
        &self,
        pattern: &Pattern<'_>,
        selection: Selection,
    ) -> Result<Vec<TextRange>, Error> {
        let ranges = match pattern {
            Pattern::Substring(needle) => self.find_substring(needle, selection),
            Pattern::Regex {
                pattern,
                options,
                group,
            } => self.find_regex(pattern, *options, group.as_ref(), selection)?,
        };
        log::debug!(
            "{pattern:?} ({selection:?}) selected {} range(s)",
            ranges.len()
        );
        Ok(ranges)
    }

    /// Literal, case-sensitive, non-overlapping occurrences of `needle`.
    ///
    /// An empty needle matches nothing.
    pub fn find_substring(&self, needle: &str, selection: Selection) -> Vec<TextRange> {
        if needle.is_empty() {
            return Vec::new();
        }
        let matches = self
            .text
            .match_indices(needle)
            .map(|(start, found)| TextRange::new_unchecked(start, start + found.len()));
        select(matches, selection)
    }

    /// Matches of `pattern`, or of capture `group` within each match.
    ///
    /// A group that exists but did not take part in a particular match contributes nothing for
    /// that match.
    pub fn find_regex(
        &self,
        pattern: &str,
        options: RegexOptions,
        group: Option<&GroupRef>,
        selection: Selection,
    ) -> Result<Vec<TextRange>, Error> {
        let regex = options.compile(pattern)?;
        let Some(group) = group else {
            let matches = regex
                .find_iter(self.text)
                .map(|m| TextRange::new_unchecked(m.start(), m.end()));
            return Ok(select(matches, selection));
        };

        let index = group_index(&regex, group).ok_or_else(|| Error::NoSuchGroup {
            pattern: pattern.into(),
            group: group.clone(),
        })?;
        let matches = regex
            .captures_iter(self.text)
            .filter_map(|captures| captures.get(index))
            .map(|m| TextRange::new_unchecked(m.start(), m.end()));
        Ok(select(matches, selection))
    }
}

fn group_index(regex: &Regex, group: &GroupRef) -> Option<usize> {
    match group {
        GroupRef::Index(index) => (*index < regex.captures_len()).then_some(*index),
        GroupRef::Name(name) => regex
            .capture_names()
            .position(|candidate| candidate == Some(name.as_str())),
    }
}

fn select(mut matches: impl Iterator<Item = TextRange>, selection: Selection) -> Vec<TextRange> {
    match selection {
        Selection::First => matches.next().into_iter().collect(),
        Selection::Last => matches.last().into_iter().collect(),
        Selection::Each => matches.collect(),
    }
}
