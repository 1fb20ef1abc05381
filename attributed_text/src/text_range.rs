// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use crate::{CodeUnit, Endpoint, Error, TextStorage};

/// A validated, half-open range of code units into a text buffer.
///
/// Invariants, checked once by [`TextRange::new`]:
///
/// - `start <= end`
/// - `start` and `end` are within the text bounds
/// - `start` and `end` lie on character boundaries
///
/// APIs taking a `TextRange` can then be infallible with respect to range correctness.
///
/// ## Important
///
/// `TextRange` does not encode which text it was validated against. Only reuse it with the
/// text content it was validated for.
///
/// ## Example
///
/// ```
/// use attributed_text::{AttributedText, TextRange};
///
/// let mut text = AttributedText::new("Hello!");
/// let range = TextRange::new(text.text(), 0..5).unwrap();
/// text.set_attribute(range, "weight", 700);
/// assert_eq!(text.attribute_at(4, "weight"), Some(&700));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    /// Returns a validated `TextRange` for the provided text.
    #[inline]
    pub fn new<T: TextStorage>(text: &T, range: Range<usize>) -> Result<Self, Error> {
        validate_range(text, &range)?;
        Ok(Self {
            start: range.start,
            end: range.end,
        })
    }

    /// Returns the range covering all of `text`.
    #[inline]
    pub fn full<T: TextStorage>(text: &T) -> Self {
        Self {
            start: 0,
            end: text.len(),
        }
    }

    /// Creates a `TextRange` without validation.
    ///
    /// This is intended for callers that already maintain range invariants, such as offsets
    /// reported by a pattern match over the same text.
    #[must_use]
    #[inline]
    pub const fn new_unchecked(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Converts a range of UTF-16 code units over `text` into a validated `TextRange`.
    ///
    /// Errors are reported in UTF-16 units. An endpoint that splits a surrogate pair is a
    /// [`NotOnCharBoundary`](crate::ErrorKind::NotOnCharBoundary) error.
    ///
    /// ```
    /// use attributed_text::TextRange;
    ///
    /// // "😀" is two UTF-16 code units and four UTF-8 bytes.
    /// let range = TextRange::from_utf16("😀 ok", 3..5).unwrap();
    /// assert_eq!(range.as_range(), 5..7);
    /// ```
    pub fn from_utf16(text: &str, range: Range<usize>) -> Result<Self, Error> {
        let utf16_len = text.encode_utf16().count();
        if range.start > range.end {
            return Err(Error::invalid_range(&range, utf16_len, CodeUnit::Utf16));
        }
        if range.end > utf16_len {
            return Err(Error::invalid_bounds(&range, utf16_len, CodeUnit::Utf16));
        }
        let start = utf16_to_utf8(text, range.start).map_err(|span| {
            Error::inside_char(&range, utf16_len, CodeUnit::Utf16, Endpoint::Start, span)
        })?;
        let end = utf16_to_utf8(text, range.end).map_err(|span| {
            Error::inside_char(&range, utf16_len, CodeUnit::Utf16, Endpoint::End, span)
        })?;
        Ok(Self { start, end })
    }

    /// Returns this range in UTF-16 code units of `text`.
    ///
    /// Returns `None` if the range does not fit `text`.
    pub fn to_utf16(self, text: &str) -> Option<Range<usize>> {
        let start = text.get(..self.start)?.encode_utf16().count();
        let len = text.get(self.start..self.end)?.encode_utf16().count();
        Some(start..start + len)
    }

    /// The start offset.
    #[must_use]
    #[inline]
    pub const fn start(self) -> usize {
        self.start
    }

    /// The end offset (exclusive).
    #[must_use]
    #[inline]
    pub const fn end(self) -> usize {
        self.end
    }

    /// The number of code units covered.
    ///
    /// A reversed range made with [`new_unchecked`](Self::new_unchecked) covers nothing.
    #[must_use]
    #[inline]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the range covers nothing.
    #[must_use]
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// Returns `true` if `index` lies inside the range.
    #[must_use]
    #[inline]
    pub const fn contains(self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Returns this range as a `Range<usize>`.
    #[must_use]
    #[inline]
    pub fn as_range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<TextRange> for Range<usize> {
    #[inline]
    fn from(value: TextRange) -> Self {
        value.as_range()
    }
}

#[inline]
pub(crate) fn validate_range<T: TextStorage>(text: &T, range: &Range<usize>) -> Result<(), Error> {
    let text_len = text.len();
    if range.start > range.end {
        return Err(Error::invalid_range(range, text_len, CodeUnit::Utf8));
    }
    if range.end > text_len {
        return Err(Error::invalid_bounds(range, text_len, CodeUnit::Utf8));
    }
    if !text.is_char_boundary(range.start) {
        return Err(Error::not_on_char_boundary(text, range, Endpoint::Start));
    }
    if !text.is_char_boundary(range.end) {
        return Err(Error::not_on_char_boundary(text, range, Endpoint::End));
    }
    Ok(())
}

/// Maps a UTF-16 offset to a UTF-8 offset, or reports the UTF-16 span of the character it splits.
fn utf16_to_utf8(text: &str, index: usize) -> Result<usize, Range<usize>> {
    let mut utf16 = 0;
    for (byte, ch) in text.char_indices() {
        if utf16 == index {
            return Ok(byte);
        }
        let next = utf16 + ch.len_utf16();
        if index < next {
            return Err(utf16..next);
        }
        utf16 = next;
    }
    Ok(text.len())
}

#[cfg(test)]
mod tests {
    use super::{validate_range, TextRange};
    use crate::{CodeUnit, Endpoint, ErrorKind};

    #[test]
    fn validates_ok_ranges() {
        let t = "string";
        assert!(validate_range(&t, &(0..0)).is_ok());
        assert!(validate_range(&t, &(0..6)).is_ok());
        assert!(validate_range(&t, &(6..6)).is_ok());
        assert_eq!(TextRange::full(&t), TextRange::new_unchecked(0, 6));
    }

    #[test]
    #[expect(
        clippy::reversed_empty_ranges,
        reason = "We want an invalid range for testing."
    )]
    fn rejects_start_greater_than_end() {
        let err = TextRange::new(&"string", 4..3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRange);
        assert_eq!(err.range(), 4..3);
        assert_eq!(err.len(), 6);
    }

    #[test]
    fn rejects_out_of_bounds() {
        let err = TextRange::new(&"string", 5..7).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBounds);
        assert_eq!(err.range(), 5..7);
        assert_eq!(err.units(), CodeUnit::Utf8);
    }

    #[test]
    fn rejects_split_character() {
        // "ü" is 2 bytes in UTF-8; index 1 is not a boundary.
        let err = TextRange::new(&"über", 1..3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotOnCharBoundary);
        let b = err.boundary().expect("boundary info");
        assert_eq!(b.which, Endpoint::Start);
        assert_eq!((b.char_start, b.char_end), (0, 2));
    }

    #[test]
    fn accessors() {
        let r = TextRange::new(&"abababa", 2..4).unwrap();
        assert_eq!(r.len(), 2);
        assert!(!r.is_empty());
        assert!(r.contains(2));
        assert!(r.contains(3));
        assert!(!r.contains(4));
        assert!(TextRange::new_unchecked(3, 3).is_empty());
    }

    #[test]
    fn unchecked_reversed_range_is_empty() {
        let r = TextRange::new_unchecked(5, 3);
        assert_eq!(r.len(), 0);
        assert!(r.is_empty());
        assert!(!r.contains(4));
    }

    #[test]
    fn utf16_round_trip_with_surrogates() {
        let t = "a😀b";
        // UTF-16: a=0, 😀=1..3, b=3..4. UTF-8: a=0, 😀=1..5, b=5..6.
        let r = TextRange::from_utf16(t, 1..4).unwrap();
        assert_eq!(r.as_range(), 1..6);
        assert_eq!(r.to_utf16(t), Some(1..4));
    }

    #[test]
    fn utf16_inside_surrogate_pair() {
        let err = TextRange::from_utf16("a😀b", 2..4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotOnCharBoundary);
        assert_eq!(err.units(), CodeUnit::Utf16);
        let b = err.boundary().expect("boundary info");
        assert_eq!((b.which, b.index, b.char_start, b.char_end), (Endpoint::Start, 2, 1, 3));
    }

    #[test]
    fn utf16_out_of_bounds() {
        let err = TextRange::from_utf16("a😀b", 0..5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBounds);
        assert_eq!(err.len(), 4);
        assert_eq!(TextRange::new_unchecked(0, 9).to_utf16("abc"), None);
    }
}
