// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::sync::Arc;

/// The text underneath an [`AttributedText`].
///
/// Offsets handed to an [`AttributedText`] are code units of this storage. For the provided
/// implementations that is UTF-8 bytes; callers holding UTF-16 offsets can convert them with
/// [`TextRange::from_utf16`].
///
/// [`AttributedText`]: crate::AttributedText
/// [`TextRange::from_utf16`]: crate::TextRange::from_utf16
pub trait TextStorage {
    /// The length of the underlying text, in code units.
    fn len(&self) -> usize;

    /// Return `true` if the underlying text is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return whether `index` falls between two characters of the text.
    ///
    /// Both `0` and [`len`](Self::len) are always boundaries. Implementors may compute this by
    /// whatever means suits their representation, e.g. [`str::is_char_boundary`] for contiguous
    /// strings or chunk inspection for ropes.
    fn is_char_boundary(&self, index: usize) -> bool;
}

impl TextStorage for String {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn is_char_boundary(&self, index: usize) -> bool {
        self.as_str().is_char_boundary(index)
    }
}

impl TextStorage for &str {
    fn len(&self) -> usize {
        str::len(self)
    }

    fn is_char_boundary(&self, index: usize) -> bool {
        str::is_char_boundary(self, index)
    }
}

impl TextStorage for Arc<str> {
    fn len(&self) -> usize {
        str::len(self)
    }

    fn is_char_boundary(&self, index: usize) -> bool {
        str::is_char_boundary(self, index)
    }
}
