// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conflict resolution: turning a list of possibly overlapping records into one styled text.
//!
//! Resolution runs in three steps:
//!
//! 1. Records are grouped by identical range. Inside a group they stay in declaration order.
//! 2. Groups are ordered by start ascending, then by length descending, so the widest group at a
//!    given start is applied before the narrower ones. Seed groups form a layer below every
//!    declared group.
//! 3. Each group's records are merged into one mapping (the later declaration wins for a shared
//!    name) and written onto exactly the group's range.
//!
//! A write only sets its own names over its own range. Disjoint ranges therefore never interact,
//! and a narrower range applied later wins over a wider one on the names they share.

use core::cmp::Reverse;
use core::fmt::Debug;

use attributed_text::{AttributedText, Attributes, TextRange, TextStorage};
use hashbrown::HashMap;

use crate::{AttributeRecord, Error};

/// All records of a session that share one range.
#[derive(Clone, Debug)]
pub struct ResolvedGroup<'r, V> {
    range: TextRange,
    seed: bool,
    records: Vec<&'r AttributeRecord<V>>,
}

impl<'r, V> ResolvedGroup<'r, V> {
    /// The range shared by every record of the group.
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// Returns `true` if the group holds styling loaded from a pre-styled input.
    pub fn is_seed(&self) -> bool {
        self.seed
    }

    /// The records of the group, in declaration order.
    pub fn records(&self) -> &[&'r AttributeRecord<V>] {
        &self.records
    }

    fn sort_key(&self) -> (bool, usize, Reverse<usize>) {
        // `false < true` puts the seed layer first.
        (!self.seed, self.range.start(), Reverse(self.range.len()))
    }
}

impl<V: Clone> ResolvedGroup<'_, V> {
    /// The group's records merged into one mapping; later declarations win per name.
    pub fn merged(&self) -> Attributes<V> {
        let mut attributes = Attributes::with_capacity(self.records.len());
        for record in &self.records {
            attributes.insert(record.name().clone(), record.value().clone());
        }
        attributes
    }
}

/// Groups and orders a session's records, then applies them to a text.
///
/// ```
/// use attributed_text::AttributedText;
/// use text_composer::{Composer, RangeResolver};
///
/// let mut make = Composer::new("string");
/// make.declare("color", "green").range(0..5)?;
/// make.declare("color", "red");
///
/// // The full range sorts before the narrower one sharing its start.
/// let resolver = RangeResolver::new(make.records());
/// let order: Vec<_> = resolver.groups().iter().map(|g| g.range().as_range()).collect();
/// assert_eq!(order, [0..6, 0..5]);
///
/// let text = resolver.apply(AttributedText::new("string"))?;
/// assert_eq!(text.attribute_at(4, "color"), Some(&"green"));
/// assert_eq!(text.attribute_at(5, "color"), Some(&"red"));
/// # Ok::<(), text_composer::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct RangeResolver<'r, V> {
    groups: Vec<ResolvedGroup<'r, V>>,
    record_count: usize,
}

impl<'r, V> RangeResolver<'r, V> {
    /// Groups `records` by range and orders the groups for application.
    pub fn new(records: &'r [AttributeRecord<V>]) -> Self {
        let mut index: HashMap<(bool, TextRange), usize> = HashMap::new();
        let mut groups: Vec<ResolvedGroup<'r, V>> = Vec::new();
        for record in records {
            let seed = record.order().is_seed();
            let key = (seed, record.range());
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(ResolvedGroup {
                    range: record.range(),
                    seed,
                    records: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].records.push(record);
        }

        for group in &mut groups {
            group.records.sort_by_key(|record| record.order());
        }
        groups.sort_by_key(ResolvedGroup::sort_key);

        Self {
            groups,
            record_count: records.len(),
        }
    }

    /// The groups in application order.
    pub fn groups(&self) -> &[ResolvedGroup<'r, V>] {
        &self.groups
    }
}

impl<V: Debug + Clone> RangeResolver<'_, V> {
    /// Writes every group onto `base`, in order, and returns the result.
    ///
    /// All ranges are checked against `base` before anything is written. A range that does not
    /// fit is reported as [`Error::RangeOutOfBounds`] rather than clamped.
    pub fn apply<T: Debug + TextStorage>(
        &self,
        mut base: AttributedText<T, V>,
    ) -> Result<AttributedText<T, V>, Error> {
        for group in &self.groups {
            TextRange::new(base.text(), group.range.as_range())?;
        }

        log::debug!(
            "applying {} record(s) in {} group(s) to a text of length {}",
            self.record_count,
            self.groups.len(),
            base.len()
        );
        for group in &self.groups {
            log::trace!(
                "group {:?} (seed: {}) with {} record(s)",
                group.range.as_range(),
                group.seed,
                group.records.len()
            );
            base.set_attributes(group.range, group.merged());
        }
        Ok(base)
    }
}
