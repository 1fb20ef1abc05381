// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Range;

use crate::text_range::validate_range;
use crate::{AttributeName, AttributeSegmentsWorkspace, Attributes, Error, TextRange, TextStorage};

/// A block of text with attributes written onto ranges within it.
///
/// Writes are kept as spans in the order they happened. Reading resolves them: for any character
/// and attribute name, the value comes from the most recent write that covered the character and
/// carried that name. So a write only sets or overwrites its own names, only over its own range.
#[derive(Clone, Debug)]
pub struct AttributedText<T: Debug + TextStorage, V: Debug> {
    text: T,
    spans: Vec<(Range<usize>, Attributes<V>)>,
}

/// A maximal stretch of text with one resolved set of attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeRun<V> {
    /// The range of the run.
    pub range: Range<usize>,
    /// Every attribute in effect over the run.
    pub attributes: Attributes<V>,
}

impl<T: Debug + TextStorage, V: Debug> AttributedText<T, V> {
    /// Create an `AttributedText` with no attributes applied.
    pub fn new(text: T) -> Self {
        Self {
            text,
            spans: Vec::default(),
        }
    }

    /// Borrow the underlying text storage.
    pub fn text(&self) -> &T {
        &self.text
    }

    /// Unwraps the underlying text storage, dropping all spans.
    pub fn into_text(self) -> T {
        self.text
    }

    /// Returns the length of the underlying text, in code units.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns `true` if the underlying text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Borrow the underlying text as `&str` when the storage is contiguous.
    pub fn as_str(&self) -> &str
    where
        T: AsRef<str>,
    {
        self.text.as_ref()
    }

    /// Writes `attributes` onto `range`.
    ///
    /// Names in `attributes` are set or overwritten for every character in `range`. Other names,
    /// and characters outside `range`, are left alone. Writing an empty mapping, or onto an empty
    /// range, changes nothing.
    pub fn set_attributes(&mut self, range: TextRange, attributes: Attributes<V>) {
        if range.is_empty() || attributes.is_empty() {
            return;
        }
        self.spans.push((range.as_range(), attributes));
    }

    /// Like [`set_attributes`](Self::set_attributes), for an unvalidated `range`.
    pub fn set_attributes_bytes(
        &mut self,
        range: Range<usize>,
        attributes: Attributes<V>,
    ) -> Result<(), Error> {
        validate_range(&self.text, &range)?;
        self.set_attributes(TextRange::new_unchecked(range.start, range.end), attributes);
        Ok(())
    }

    /// Writes a single attribute onto `range`.
    pub fn set_attribute(&mut self, range: TextRange, name: impl Into<AttributeName>, value: V) {
        let mut attributes = Attributes::with_capacity(1);
        attributes.insert(name, value);
        self.set_attributes(range, attributes);
    }

    /// The value of `name` in effect at `index`, if any.
    pub fn attribute_at(&self, index: usize, name: &str) -> Option<&V> {
        self.spans
            .iter()
            .rev()
            .filter(|(range, _)| range.contains(&index))
            .find_map(|(_, attributes)| attributes.get(name))
    }

    /// Iterate over the written spans in the order they were written.
    pub fn spans_iter(&self) -> impl ExactSizeIterator<Item = (&Range<usize>, &Attributes<V>)> {
        self.spans.iter().map(|(range, attributes)| (range, attributes))
    }

    /// Returns the number of spans written onto the text.
    pub fn spans_len(&self) -> usize {
        self.spans.len()
    }

    pub(crate) fn span_at_idx(&self, idx: usize) -> Option<(&Range<usize>, &Attributes<V>)> {
        self.spans.get(idx).map(|(range, attributes)| (range, attributes))
    }

    /// Remove all written spans.
    pub fn clear_attributes(&mut self) {
        self.spans.clear();
    }

    /// Replaces the underlying text, dropping all spans but retaining their storage.
    pub fn set_text(&mut self, text: T) {
        self.text = text;
        self.spans.clear();
    }
}

impl<T: Debug + TextStorage, V: Debug + Clone> AttributedText<T, V> {
    /// Every attribute in effect at `index`.
    ///
    /// Returns an empty mapping for indices past the end of the text.
    pub fn attributes_at(&self, index: usize) -> Attributes<V> {
        let mut merged = Attributes::new();
        for (range, attributes) in &self.spans {
            if range.contains(&index) {
                merged.overwrite_with(attributes);
            }
        }
        merged
    }

    /// The resolved runs of the text, left to right.
    ///
    /// The runs cover the whole text without gaps; a run may carry no attributes. Adjacent runs
    /// can carry equal attributes, see [`runs_coalesced`](Self::runs_coalesced).
    pub fn runs(&self) -> Vec<AttributeRun<V>> {
        AttributeSegmentsWorkspace::new().runs(self).collect()
    }
}

impl<T: Debug + TextStorage, V: Debug + Clone + PartialEq> AttributedText<T, V> {
    /// The resolved runs of the text, with adjacent equal runs merged.
    pub fn runs_coalesced(&self) -> Vec<AttributeRun<V>> {
        let mut out: Vec<AttributeRun<V>> = Vec::new();
        for run in AttributeSegmentsWorkspace::new().runs(self) {
            match out.last_mut() {
                Some(last)
                    if last.range.end == run.range.start && last.attributes == run.attributes =>
                {
                    last.range.end = run.range.end;
                }
                _ => out.push(run),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::{AttributedText, Attributes, Endpoint, ErrorKind, TextRange};
    use alloc::format;
    use alloc::vec;
    use alloc::vec::Vec;

    #[derive(Debug, Clone, PartialEq)]
    enum Color {
        Blue,
        Green,
        Red,
    }

    fn range(text: &AttributedText<&str, Color>, r: core::ops::Range<usize>) -> TextRange {
        TextRange::new(text.text(), r).unwrap()
    }

    #[test]
    fn write_only_touches_its_names() {
        let mut at = AttributedText::new("abababa");
        let all = range(&at, 0..7);
        at.set_attribute(all, "background", Color::Blue);
        let head = range(&at, 0..2);
        at.set_attribute(head, "foreground", Color::Green);

        assert_eq!(at.attribute_at(0, "background"), Some(&Color::Blue));
        assert_eq!(at.attribute_at(1, "foreground"), Some(&Color::Green));
        assert_eq!(at.attribute_at(2, "foreground"), None);
        assert_eq!(at.attribute_at(6, "background"), Some(&Color::Blue));
        assert_eq!(at.attribute_at(7, "background"), None);
    }

    #[test]
    fn later_write_overwrites_inside_its_range() {
        let mut at = AttributedText::new("0123456789");
        let outer = range(&at, 0..10);
        at.set_attribute(outer, "x", Color::Red);
        let inner = range(&at, 2..4);
        at.set_attribute(inner, "x", Color::Green);

        let xs: Vec<_> = (0..10).map(|i| at.attribute_at(i, "x").cloned()).collect();
        let mut expected = vec![Some(Color::Red); 10];
        expected[2] = Some(Color::Green);
        expected[3] = Some(Color::Green);
        assert_eq!(xs, expected);
    }

    #[test]
    fn empty_writes_are_dropped() {
        let mut at = AttributedText::new("string");
        let empty = range(&at, 3..3);
        at.set_attribute(empty, "x", Color::Red);
        let all = range(&at, 0..6);
        at.set_attributes(all, Attributes::new());
        assert_eq!(at.spans_len(), 0);
    }

    #[test]
    fn runs_cover_the_text() {
        let mut at = AttributedText::new("string");
        let r = range(&at, 1..3);
        at.set_attribute(r, "x", Color::Red);
        let runs = at.runs();
        let ranges: Vec<_> = runs.iter().map(|run| run.range.clone()).collect();
        assert_eq!(ranges, vec![0..1, 1..3, 3..6]);
        assert!(runs[0].attributes.is_empty());
        assert_eq!(runs[1].attributes.get("x"), Some(&Color::Red));
        assert!(runs[2].attributes.is_empty());
    }

    #[test]
    fn coalesced_runs_merge_equal_neighbours() {
        let mut at = AttributedText::new("string");
        let a = range(&at, 0..3);
        at.set_attribute(a, "x", Color::Red);
        let b = range(&at, 3..6);
        at.set_attribute(b, "x", Color::Red);
        let c = range(&at, 4..5);
        at.set_attribute(c, "y", Color::Blue);

        assert_eq!(at.runs().len(), 4);
        let coalesced = at.runs_coalesced();
        let ranges: Vec<_> = coalesced.iter().map(|run| run.range.clone()).collect();
        assert_eq!(ranges, vec![0..4, 4..5, 5..6]);
        assert_eq!(coalesced[1].attributes.len(), 2);
    }

    #[test]
    fn attributes_at_merges_in_write_order() {
        let mut at = AttributedText::new("string");
        let a = range(&at, 0..6);
        at.set_attributes(a, [("x", Color::Red), ("y", Color::Red)].into_iter().collect());
        let b = range(&at, 2..3);
        at.set_attribute(b, "y", Color::Blue);

        let merged = at.attributes_at(2);
        assert_eq!(merged.get("x"), Some(&Color::Red));
        assert_eq!(merged.get("y"), Some(&Color::Blue));
        assert!(at.attributes_at(6).is_empty());
    }

    #[expect(
        clippy::reversed_empty_ranges,
        reason = "We want an invalid range for testing."
    )]
    #[test]
    fn bad_range_for_set_attributes_bytes() {
        let mut at = AttributedText::<&str, Color>::new("string");
        let one = || -> Attributes<Color> { [("x", Color::Red)].into_iter().collect() };

        assert!(at.set_attributes_bytes(0..6, one()).is_ok());
        let err = at.set_attributes_bytes(4..3, one()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
        assert!(format!("{err}").contains("start > end"));

        let err = at.set_attributes_bytes(0..7, one()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBounds);
        assert!(format!("{err}").contains("len 6"));
        assert_eq!(at.spans_len(), 1);
    }

    #[test]
    fn not_on_char_boundary() {
        let mut at = AttributedText::<&str, Color>::new("über");
        let err = at
            .set_attributes_bytes(0..1, [("x", Color::Red)].into_iter().collect())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotOnCharBoundary);
        assert_eq!(err.boundary().map(|b| b.which), Some(Endpoint::End));
    }

    #[test]
    fn set_text_clears_spans() {
        let mut at = AttributedText::new("string");
        let all = range(&at, 0..6);
        at.set_attribute(all, "x", Color::Red);
        at.set_text("other");
        assert_eq!(at.spans_len(), 0);
        assert_eq!(at.as_str(), "other");
    }
}
