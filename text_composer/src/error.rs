// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::GroupRef;

/// Errors reported while declaring or resolving attributes.
///
/// Every error is raised synchronously by the call that caused it. A failed
/// [`Composer::finalize`](crate::Composer::finalize) produces no output at all.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum Error {
    /// A regular expression failed to compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A capture group was requested that the pattern does not define.
    #[error("pattern `{pattern}` has no capture group {group}")]
    NoSuchGroup {
        /// The pattern as given by the caller.
        pattern: String,
        /// The requested group.
        group: GroupRef,
    },

    /// A range does not fit the text it was declared or resolved against.
    ///
    /// The wrapped error tells whether the range ran past the end, was reversed, or split a
    /// character.
    #[error("range out of bounds: {0}")]
    RangeOutOfBounds(#[from] attributed_text::Error),
}
