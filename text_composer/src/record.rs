// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt::Debug;
use core::ops::Range;

use attributed_text::{AttributeName, TextRange, TextStorage};

use crate::Error;

/// Where a record sits in the priority order of a composition session.
///
/// Seed records (styling already present on the input) order before every declared record, and
/// each group orders by its index. The derived `Ord` is that order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeclarationOrder {
    /// The `n`th attribute loaded from a pre-styled input, in run order.
    Seed(usize),
    /// The `n`th attribute declared in the session.
    Declared(usize),
}

impl DeclarationOrder {
    /// Returns `true` for attributes loaded from a pre-styled input.
    pub fn is_seed(self) -> bool {
        matches!(self, Self::Seed(_))
    }
}

/// One pending "set `name` to `value` over `range`" declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeRecord<V> {
    name: AttributeName,
    value: V,
    range: TextRange,
    order: DeclarationOrder,
}

impl<V> AttributeRecord<V> {
    pub(crate) fn new(
        name: AttributeName,
        value: V,
        range: TextRange,
        order: DeclarationOrder,
    ) -> Self {
        Self {
            name,
            value,
            range,
            order,
        }
    }

    /// The attribute name.
    pub fn name(&self) -> &AttributeName {
        &self.name
    }

    /// The attribute value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The range the attribute applies to.
    pub fn range(&self) -> TextRange {
        self.range
    }

    /// The record's position in the session's priority order.
    pub fn order(&self) -> DeclarationOrder {
        self.order
    }
}

/// A freshly declared record whose range can still be narrowed.
///
/// Returned by [`Composer::declare`](crate::Composer::declare). The handle borrows the session,
/// so it cannot outlive the point where the session is finalized. A re-scope that fails removes
/// the record again, so a rejected declaration has no effect on the output.
///
/// ```
/// use text_composer::Composer;
///
/// let mut make = Composer::new("string");
/// make.declare("font", "Menlo").range(0..3)?;
/// assert!(make.declare("font", "Courier").range(2..9).is_err());
///
/// let text = make.finalize()?;
/// assert_eq!(text.attribute_at(2, "font"), Some(&"Menlo"));
/// assert_eq!(text.attribute_at(3, "font"), None);
/// # Ok::<(), text_composer::Error>(())
/// ```
#[derive(Debug)]
pub struct RecordHandle<'a, T: Debug + TextStorage, V: Debug> {
    text: &'a T,
    records: &'a mut Vec<AttributeRecord<V>>,
}

impl<'a, T: Debug + TextStorage, V: Debug> RecordHandle<'a, T, V> {
    /// Wraps the last record of `records`, which must be the one just declared.
    pub(crate) fn new(text: &'a T, records: &'a mut Vec<AttributeRecord<V>>) -> Self {
        Self { text, records }
    }

    /// Re-scopes the record to `range`, validated against the session text.
    ///
    /// On failure the record is withdrawn from the session.
    pub fn range(self, range: Range<usize>) -> Result<Self, Error> {
        match TextRange::new(self.text, range) {
            Ok(range) => Ok(self.with_range(range)),
            Err(err) => Err(self.withdraw(err.into())),
        }
    }

    /// Re-scopes the record to an already validated `range`.
    ///
    /// The range is checked again when the session is finalized.
    pub fn with_range(self, range: TextRange) -> Self {
        if let Some(record) = self.records.last_mut() {
            record.range = range;
        }
        self
    }

    /// Re-scopes the record to `range` given in UTF-16 code units.
    ///
    /// On failure the record is withdrawn from the session.
    pub fn utf16_range(self, range: Range<usize>) -> Result<Self, Error>
    where
        T: AsRef<str>,
    {
        match TextRange::from_utf16(self.text.as_ref(), range) {
            Ok(range) => Ok(self.with_range(range)),
            Err(err) => Err(self.withdraw(err.into())),
        }
    }

    /// Re-scopes the record to the whole text.
    pub fn string_range(self) -> Self {
        let range = TextRange::full(self.text);
        self.with_range(range)
    }

    /// The record as currently declared.
    pub fn record(&self) -> Option<&AttributeRecord<V>> {
        self.records.last()
    }

    fn withdraw(self, err: Error) -> Error {
        if let Some(record) = self.records.pop() {
            log::debug!("withdrew `{}` after a rejected range: {err}", record.name);
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::DeclarationOrder;

    #[test]
    fn seeds_order_before_declarations() {
        let mut orders = vec![
            DeclarationOrder::Declared(1),
            DeclarationOrder::Seed(3),
            DeclarationOrder::Declared(0),
            DeclarationOrder::Seed(0),
        ];
        orders.sort();
        assert_eq!(
            orders,
            vec![
                DeclarationOrder::Seed(0),
                DeclarationOrder::Seed(3),
                DeclarationOrder::Declared(0),
                DeclarationOrder::Declared(1),
            ]
        );
        assert!(orders[1].is_seed());
        assert!(!orders[2].is_seed());
    }
}
