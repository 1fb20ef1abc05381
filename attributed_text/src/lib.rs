// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attributed Text is a small container for text with named attributes written onto ranges.
//!
//! - [`AttributedText`] holds the text plus every write made onto it.
//! - [`Attributes`] is the `name → value` mapping a single write carries. Names are opaque
//!   strings and values are whatever the caller stores; this crate never inspects them.
//! - [`TextRange`] is a range validated once against the text (bounds and character boundaries).
//! - [`AttributeSegmentsWorkspace`] resolves overlapping writes into contiguous runs.
//!
//! ## Write semantics
//!
//! [`AttributedText::set_attributes`] sets or overwrites only the names it carries, only over its
//! range. Reading resolves writes in the order they happened:
//!
//! ```
//! use attributed_text::{AttributedText, TextRange};
//!
//! let mut text = AttributedText::new("0123456789");
//! let all = TextRange::new(text.text(), 0..10).unwrap();
//! text.set_attribute(all, "x", 1);
//! let inner = TextRange::new(text.text(), 2..4).unwrap();
//! text.set_attribute(inner, "x", 2);
//!
//! let runs = text.runs();
//! assert_eq!(runs.len(), 3);
//! assert_eq!(runs[1].range, 2..4);
//! assert_eq!(runs[1].attributes.get("x"), Some(&2));
//! assert_eq!(runs[2].attributes.get("x"), Some(&1));
//! ```
//!
//! ## Indices
//!
//! Offsets are code units of the [`TextStorage`]; for `str`-backed storage those are UTF-8
//! bytes. [`TextRange::from_utf16`] converts from UTF-16 offsets.
//!
//! ## Features
//!
//! - `std` (enabled by default): This is currently unused and is provided for forward compatibility.
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

mod attribute_segments;
mod attributed_text;
mod attributes;
mod error;
mod text_range;
mod text_storage;

pub use crate::attribute_segments::{
    ActiveSpans, ActiveSpansIter, AttributeRuns, AttributeSegments, AttributeSegmentsWorkspace,
};
pub use crate::attributed_text::{AttributeRun, AttributedText};
pub use crate::attributes::{AttributeName, Attributes};
pub use crate::error::{BoundaryInfo, CodeUnit, Endpoint, Error, ErrorKind};
pub use crate::text_range::TextRange;
pub use crate::text_storage::TextStorage;
