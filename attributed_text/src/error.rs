// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use crate::TextStorage;

/// Rich error type for range validation.
///
/// Carries a non-exhaustive [`ErrorKind`] plus the attempted range, the text length, the code
/// units both are measured in and, for boundary failures, the character enclosing the offending
/// index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    start: usize,
    end: usize,
    len: usize,
    units: CodeUnit,
    boundary: Option<BoundaryInfo>,
}

#[expect(
    clippy::len_without_is_empty,
    reason = "`Error::len` reports source text length context; an `is_empty` method would be misleading and unused."
)]
impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The start index of the range provided by the caller.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The end index (exclusive) of the range provided by the caller.
    pub fn end(&self) -> usize {
        self.end
    }

    /// The range provided by the caller.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The length of the text at the time of the error, in [`units`](Self::units).
    pub fn len(&self) -> usize {
        self.len
    }

    /// The code units the range and length are measured in.
    pub fn units(&self) -> CodeUnit {
        self.units
    }

    /// Extra details for boundary-related errors, if available.
    pub fn boundary(&self) -> Option<BoundaryInfo> {
        self.boundary
    }

    fn new(kind: ErrorKind, range: &Range<usize>, len: usize, units: CodeUnit) -> Self {
        Self {
            kind,
            start: range.start,
            end: range.end,
            len,
            units,
            boundary: None,
        }
    }

    pub(crate) fn invalid_bounds(range: &Range<usize>, len: usize, units: CodeUnit) -> Self {
        Self::new(ErrorKind::InvalidBounds, range, len, units)
    }

    pub(crate) fn invalid_range(range: &Range<usize>, len: usize, units: CodeUnit) -> Self {
        Self::new(ErrorKind::InvalidRange, range, len, units)
    }

    pub(crate) fn not_on_char_boundary<T: TextStorage>(
        text: &T,
        range: &Range<usize>,
        which: Endpoint,
    ) -> Self {
        let index = match which {
            Endpoint::Start => range.start,
            Endpoint::End => range.end,
        };
        let (char_start, char_end) = enclosing_char_span(text, index).unwrap_or((index, index));
        Self::inside_char(range, text.len(), CodeUnit::Utf8, which, char_start..char_end)
    }

    /// A boundary failure where the caller already knows the enclosing character.
    pub(crate) fn inside_char(
        range: &Range<usize>,
        len: usize,
        units: CodeUnit,
        which: Endpoint,
        char_span: Range<usize>,
    ) -> Self {
        let index = match which {
            Endpoint::Start => range.start,
            Endpoint::End => range.end,
        };
        Self {
            boundary: Some(BoundaryInfo {
                which,
                index,
                char_start: char_span.start,
                char_end: char_span.end,
            }),
            ..Self::new(ErrorKind::NotOnCharBoundary, range, len, units)
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::InvalidBounds => write!(
                f,
                "range {}..{} out of bounds for len {} ({} code units)",
                self.start, self.end, self.len, self.units
            ),
            ErrorKind::InvalidRange => {
                write!(f, "invalid range {}..{}: start > end", self.start, self.end)
            }
            ErrorKind::NotOnCharBoundary => match self.boundary {
                Some(b) => {
                    let which = match b.which {
                        Endpoint::Start => "start",
                        Endpoint::End => "end",
                    };
                    write!(
                        f,
                        "range {}..{}: {} index {} not on {} boundary (char {}..{})",
                        self.start, self.end, which, b.index, self.units, b.char_start, b.char_end
                    )
                }
                None => write!(
                    f,
                    "range {}..{} not on {} boundary",
                    self.start, self.end, self.units
                ),
            },
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Provided range indices were out of bounds relative to the text length.
    InvalidBounds,

    /// The provided range had `start > end`.
    InvalidRange,

    /// Either `start` or `end` fell inside a character.
    NotOnCharBoundary,
}

/// The code units a range was expressed in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CodeUnit {
    /// UTF-8 bytes, the native offsets of [`TextStorage`].
    Utf8,

    /// UTF-16 code units, as used by [`TextRange::from_utf16`](crate::TextRange::from_utf16).
    Utf16,
}

impl core::fmt::Display for CodeUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Utf8 => "UTF-8",
            Self::Utf16 => "UTF-16",
        })
    }
}

/// Identifies which endpoint of a range failed boundary validation.
///
/// This type is surfaced via [`BoundaryInfo`], which is attached to [`Error`]
/// for boundary-related failures.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The `start` endpoint of the range.
    Start,

    /// The `end` endpoint of the range.
    End,
}

/// Details about an offending index that was not on a character boundary.
///
/// Returned by [`Error::boundary`] when the error kind is [`ErrorKind::NotOnCharBoundary`].
/// All indices are in the error's [`units`](Error::units).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundaryInfo {
    /// Which endpoint (`start` or `end`) was invalid.
    pub which: Endpoint,

    /// The offending index.
    pub index: usize,

    /// The start index of the enclosing character.
    pub char_start: usize,

    /// The end index (exclusive) of the enclosing character.
    pub char_end: usize,
}

fn enclosing_char_span<T: TextStorage>(text: &T, index: usize) -> Option<(usize, usize)> {
    let len = text.len();
    if index > len {
        return None;
    }
    if text.is_char_boundary(index) {
        return Some((index, index));
    }

    // `0` is always a boundary, so this terminates.
    let mut start = index;
    while start > 0 {
        start -= 1;
        if text.is_char_boundary(start) {
            break;
        }
    }

    let mut end = index;
    while end < len {
        end += 1;
        if text.is_char_boundary(end) {
            break;
        }
    }

    Some((start, end))
}
