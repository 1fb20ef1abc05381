// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text Composer builds [`AttributedText`] from declarative attribute statements.
//!
//! A [`Composer`] session collects declarations of the form "set `name` to `value` over these
//! ranges". Ranges come from explicit offsets, from the whole text, or from a pattern lookup
//! ([`MatchFinder`]) that selects the first, last or every match of a substring or regular
//! expression. Nothing is written until the session is finalized; at that point the
//! [`RangeResolver`] turns the possibly overlapping declarations into one styled text.
//!
//! - [`Composer`] owns the base text and the pending [`AttributeRecord`]s.
//! - [`RecordHandle`] narrows a single declaration's range before finalization.
//! - [`Scope`] and [`Selector`] apply declarations over explicit ranges and pattern matches.
//! - [`RangeResolver`] groups, orders and applies the records.
//!
//! ## Precedence
//!
//! Records with identical ranges are merged, the later declaration winning for a shared name.
//! Groups are then applied by start ascending and length descending, so a narrower range nested
//! in a wider one overrides it inside its own span. Styling already present on a seed text ranks
//! below every declaration.
//!
//! ```
//! use text_composer::{Composer, RegexOptions};
//!
//! let mut make = Composer::new("Ferris says hello, hello!");
//! make.declare("weight", 400);
//! make.each().substring("hello", |scope| {
//!     scope.declare("weight", 700);
//! })?;
//! make.first().regex_match(r"\bF\w+", RegexOptions::new(), |scope| {
//!     scope.declare("weight", 900);
//! })?;
//!
//! let text = make.finalize()?;
//! assert_eq!(text.attribute_at(0, "weight"), Some(&900));
//! assert_eq!(text.attribute_at(7, "weight"), Some(&400));
//! assert_eq!(text.attribute_at(12, "weight"), Some(&700));
//! # Ok::<(), text_composer::Error>(())
//! ```
//!
//! ## Indices
//!
//! Ranges are UTF-8 byte offsets on character boundaries, as in [`attributed_text`]. Hosts that
//! count in UTF-16 code units can use [`RecordHandle::utf16_range`] or
//! [`TextRange::from_utf16`].
//!
//! ## Logging
//!
//! Session events are reported through the [`log`] facade at `debug` level, and each applied
//! group at `trace` level. No logger is installed.
//!
//! ## Features
//!
//! - `std` (enabled by default): This is currently unused and is provided for forward compatibility.
//!   The crate always links `std`, which the regular expression engine needs.
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

mod composer;
mod error;
mod pattern;
mod record;
mod resolve;


pub use attributed_text;
pub use attributed_text::{AttributeName, AttributeRun, AttributedText, Attributes, TextRange};

pub use composer::{compose, compose_attributed, Composer, Scope, Selector};
pub use error::Error;
pub use pattern::{GroupRef, MatchFinder, Pattern, RegexOptions, Selection};
pub use record::{AttributeRecord, DeclarationOrder, RecordHandle};
pub use resolve::{RangeResolver, ResolvedGroup};
