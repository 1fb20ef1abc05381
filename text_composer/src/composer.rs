// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt::Debug;
use core::ops::Range;

use attributed_text::{AttributeName, AttributedText, TextRange, TextStorage};

use crate::{
    AttributeRecord, DeclarationOrder, Error, GroupRef, MatchFinder, Pattern, RangeResolver,
    RecordHandle, RegexOptions, Selection,
};

/// A composition session: a base text plus the attribute declarations made against it.
///
/// Declarations are only recorded while the session is open. Nothing is written until
/// [`finalize`](Self::finalize), which resolves every overlap in one pass. The order of the
/// calls decides precedence only between declarations that share a range; otherwise the narrower
/// range wins inside the wider one.
///
/// ```
/// use text_composer::Composer;
///
/// let mut make = Composer::new("abababa");
/// make.each().substring("a", |scope| {
///     scope.declare("background", "blue");
/// })?;
/// make.first().substring("ab", |scope| {
///     scope.declare("foreground", "green");
/// })?;
///
/// let text = make.finalize()?;
/// assert_eq!(text.attribute_at(0, "foreground"), Some(&"green"));
/// assert_eq!(text.attribute_at(2, "background"), Some(&"blue"));
/// assert_eq!(text.attribute_at(3, "background"), None);
/// # Ok::<(), text_composer::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Composer<T: Debug + TextStorage, V: Debug> {
    text: T,
    records: Vec<AttributeRecord<V>>,
    next_index: usize,
}

impl<T: Debug + TextStorage, V: Debug> Composer<T, V> {
    /// Opens a session over unstyled `text`.
    pub fn new(text: T) -> Self {
        Self {
            text,
            records: Vec::new(),
            next_index: 0,
        }
    }

    /// The base text.
    pub fn text(&self) -> &T {
        &self.text
    }

    /// Every record of the session, seeds first, then declarations in the order they were made.
    pub fn records(&self) -> &[AttributeRecord<V>] {
        &self.records
    }

    /// Declares `name = value` over the whole text.
    ///
    /// The returned handle can narrow the range; see [`RecordHandle`].
    pub fn declare(&mut self, name: impl Into<AttributeName>, value: V) -> RecordHandle<'_, T, V> {
        let range = TextRange::full(&self.text);
        let order = self.next_order();
        self.records.push(AttributeRecord::new(name.into(), value, range, order));
        RecordHandle::new(&self.text, &mut self.records)
    }

    /// Declares `name = value` once for each of `ranges`, returning how many records were made.
    ///
    /// The ranges are checked against the text when the session is finalized.
    pub fn declare_over(
        &mut self,
        name: impl Into<AttributeName>,
        value: V,
        ranges: &[TextRange],
    ) -> usize
    where
        V: Clone,
    {
        let name = name.into();
        for range in ranges {
            let order = self.next_order();
            self.records.push(AttributeRecord::new(name.clone(), value.clone(), *range, order));
        }
        ranges.len()
    }

    /// Runs `f` with a scope whose declarations all apply to `range`.
    pub fn range(
        &mut self,
        range: Range<usize>,
        f: impl FnOnce(&mut Scope<'_, T, V>),
    ) -> Result<(), Error> {
        let range = TextRange::new(&self.text, range)?;
        f(&mut Scope::new(self, vec![range]));
        Ok(())
    }

    /// Runs `f` with a scope whose declarations all apply to the whole text.
    pub fn string_range(&mut self, f: impl FnOnce(&mut Scope<'_, T, V>)) {
        let range = TextRange::full(&self.text);
        f(&mut Scope::new(self, vec![range]));
    }

    /// Selects only the first match of the next pattern.
    pub fn first(&mut self) -> Selector<'_, T, V> {
        self.select(Selection::First)
    }

    /// Selects only the last match of the next pattern.
    pub fn last(&mut self) -> Selector<'_, T, V> {
        self.select(Selection::Last)
    }

    /// Selects every match of the next pattern.
    pub fn each(&mut self) -> Selector<'_, T, V> {
        self.select(Selection::Each)
    }

    /// Selects the matches of the next pattern according to `selection`.
    pub fn select(&mut self, selection: Selection) -> Selector<'_, T, V> {
        Selector {
            composer: self,
            selection,
        }
    }

    fn next_order(&mut self) -> DeclarationOrder {
        let order = DeclarationOrder::Declared(self.next_index);
        self.next_index += 1;
        order
    }
}

impl<T: Debug + TextStorage, V: Debug + Clone> Composer<T, V> {
    /// Opens a session over pre-styled text.
    ///
    /// The existing styling is kept as seed records, which rank below every declaration made in
    /// the session.
    pub fn from_attributed(seed: AttributedText<T, V>) -> Self {
        let mut records = Vec::new();
        for run in seed.runs() {
            let range = TextRange::new_unchecked(run.range.start, run.range.end);
            for (name, value) in run.attributes.iter() {
                let order = DeclarationOrder::Seed(records.len());
                records.push(AttributeRecord::new(name.clone(), value.clone(), range, order));
            }
        }
        log::debug!("seeded session with {} record(s)", records.len());
        Self {
            text: seed.into_text(),
            records,
            next_index: 0,
        }
    }

    /// Resolves every record onto the base text and closes the session.
    ///
    /// Fails with [`Error::RangeOutOfBounds`] if any record's range does not fit the text; no
    /// output is produced in that case.
    pub fn finalize(self) -> Result<AttributedText<T, V>, Error> {
        let resolver = RangeResolver::new(&self.records);
        log::debug!(
            "finalizing {} record(s) in {} group(s)",
            self.records.len(),
            resolver.groups().len()
        );
        resolver.apply(AttributedText::new(self.text))
    }

    /// Resolves the records onto a copy of the base text, leaving the session open.
    ///
    /// Calling this repeatedly yields equal results as long as no declarations are added in
    /// between.
    pub fn preview(&self) -> Result<AttributedText<T, V>, Error>
    where
        T: Clone,
    {
        RangeResolver::new(&self.records).apply(AttributedText::new(self.text.clone()))
    }
}

/// Declarations sharing one set of ranges.
///
/// Handed to the closures passed to [`Composer::range`], [`Composer::string_range`] and the
/// [`Selector`] lookups. When a pattern matched nothing the scope is empty and declarations made
/// through it are dropped.
#[derive(Debug)]
pub struct Scope<'c, T: Debug + TextStorage, V: Debug> {
    composer: &'c mut Composer<T, V>,
    ranges: Vec<TextRange>,
}

impl<'c, T: Debug + TextStorage, V: Debug> Scope<'c, T, V> {
    fn new(composer: &'c mut Composer<T, V>, ranges: Vec<TextRange>) -> Self {
        Self { composer, ranges }
    }

    /// Declares `name = value` over each range of the scope, returning how many records were made.
    pub fn declare(&mut self, name: impl Into<AttributeName>, value: V) -> usize
    where
        V: Clone,
    {
        self.composer.declare_over(name, value, &self.ranges)
    }

    /// The ranges of the scope, left to right.
    pub fn ranges(&self) -> &[TextRange] {
        &self.ranges
    }

    /// Returns `true` if the scope covers no range.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// A selection mode waiting for the pattern it applies to.
///
/// The mode is consumed by exactly one lookup; every lookup returns how many ranges it matched.
#[derive(Debug)]
#[must_use = "a selector does nothing until a pattern is looked up"]
pub struct Selector<'c, T: Debug + TextStorage, V: Debug> {
    composer: &'c mut Composer<T, V>,
    selection: Selection,
}

impl<T: Debug + TextStorage + AsRef<str>, V: Debug> Selector<'_, T, V> {
    /// Scopes `f` to literal occurrences of `needle`.
    pub fn substring(
        self,
        needle: &str,
        f: impl FnOnce(&mut Scope<'_, T, V>),
    ) -> Result<usize, Error> {
        self.pattern(&Pattern::substring(needle), f)
    }

    /// Scopes `f` to matches of the regular expression `pattern`.
    pub fn regex_match(
        self,
        pattern: &str,
        options: RegexOptions,
        f: impl FnOnce(&mut Scope<'_, T, V>),
    ) -> Result<usize, Error> {
        self.pattern(&Pattern::regex(pattern, options), f)
    }

    /// Scopes `f` to capture `group` of each match of `pattern`.
    pub fn regex_group(
        self,
        pattern: &str,
        group: impl Into<GroupRef>,
        options: RegexOptions,
        f: impl FnOnce(&mut Scope<'_, T, V>),
    ) -> Result<usize, Error> {
        self.pattern(&Pattern::regex_group(pattern, group, options), f)
    }

    /// Scopes `f` to the ranges `pattern` selects.
    pub fn pattern(
        self,
        pattern: &Pattern<'_>,
        f: impl FnOnce(&mut Scope<'_, T, V>),
    ) -> Result<usize, Error> {
        let ranges = MatchFinder::new(self.composer.text.as_ref()).find(pattern, self.selection)?;
        let count = ranges.len();
        f(&mut Scope::new(self.composer, ranges));
        Ok(count)
    }
}

/// Builds styled text from plain `text` in one call.
///
/// ```
/// let text = text_composer::compose("string", |make| {
///     make.declare("color", "green").range(0..5)?;
///     make.declare("color", "red");
///     Ok(())
/// })?;
/// assert_eq!(text.attribute_at(4, "color"), Some(&"green"));
/// assert_eq!(text.attribute_at(5, "color"), Some(&"red"));
/// # Ok::<(), text_composer::Error>(())
/// ```
pub fn compose<T, V, F>(text: T, f: F) -> Result<AttributedText<T, V>, Error>
where
    T: Debug + TextStorage,
    V: Debug + Clone,
    F: FnOnce(&mut Composer<T, V>) -> Result<(), Error>,
{
    let mut composer = Composer::new(text);
    f(&mut composer)?;
    composer.finalize()
}

/// Builds styled text on top of already styled `seed` in one call.
pub fn compose_attributed<T, V, F>(
    seed: AttributedText<T, V>,
    f: F,
) -> Result<AttributedText<T, V>, Error>
where
    T: Debug + TextStorage,
    V: Debug + Clone,
    F: FnOnce(&mut Composer<T, V>) -> Result<(), Error>,
{
    let mut composer = Composer::from_attributed(seed);
    f(&mut composer)?;
    composer.finalize()
}

#[cfg(test)]
mod tests {
    use super::Composer;
    use crate::{DeclarationOrder, Error, RegexOptions};
    use attributed_text::{AttributedText, TextRange};

    #[test]
    fn declarations_default_to_the_whole_text() {
        let mut make = Composer::<_, u8>::new("string");
        make.declare("x", 1);
        let record = &make.records()[0];
        assert_eq!(record.range().as_range(), 0..6);
        assert_eq!(record.order(), DeclarationOrder::Declared(0));
    }

    #[test]
    fn handle_narrows_and_resets_the_range() {
        let mut make = Composer::<_, u8>::new("string");
        let handle = make.declare("x", 1).range(1..3).unwrap();
        assert_eq!(handle.record().map(|r| r.range().as_range()), Some(1..3));
        let handle = handle.string_range();
        assert_eq!(handle.record().map(|r| r.range().as_range()), Some(0..6));
    }

    #[test]
    fn rejected_range_withdraws_the_declaration() {
        let mut make = Composer::<_, u8>::new("string");
        make.declare("x", 1).range(0..2).unwrap();
        let err = make.declare("y", 2).range(2..9).unwrap_err();
        assert!(matches!(err, Error::RangeOutOfBounds(_)));
        let err = make.declare("z", 3).utf16_range(0..7).unwrap_err();
        assert!(matches!(err, Error::RangeOutOfBounds(_)));
        assert_eq!(make.records().len(), 1);
        assert_eq!(&**make.records()[0].name(), "x");

        // Later declarations keep counting up; withdrawn indices are not handed out again.
        make.declare("w", 4);
        assert_eq!(make.records()[1].order(), DeclarationOrder::Declared(3));

        let text = make.finalize().unwrap();
        assert_eq!(text.attribute_at(1, "x"), Some(&1));
        assert!((0..6).all(|i| text.attribute_at(i, "y").is_none()));
        assert!((0..6).all(|i| text.attribute_at(i, "z").is_none()));
    }

    #[test]
    fn indices_are_never_reused() {
        let mut make = Composer::<_, u8>::new("abababa");
        make.declare("x", 1);
        make.each()
            .substring("a", |scope| {
                scope.declare("y", 2);
            })
            .unwrap();
        make.declare("z", 3);
        let orders: Vec<_> = make.records().iter().map(|r| r.order()).collect();
        let expected: Vec<_> = (0..6).map(DeclarationOrder::Declared).collect();
        assert_eq!(orders, expected);
    }

    #[test]
    fn scope_declares_once_per_range() {
        let mut make = Composer::<_, u8>::new("abababa");
        let matched = make
            .last()
            .substring("ab", |scope| {
                assert_eq!(scope.ranges().len(), 1);
                assert_eq!(scope.declare("x", 1), 1);
            })
            .unwrap();
        assert_eq!(matched, 1);
        assert_eq!(make.records()[0].range().as_range(), 4..6);
    }

    #[test]
    fn empty_scope_declares_nothing() {
        let mut make = Composer::<_, u8>::new("abababa");
        let matched = make
            .each()
            .substring("zzz", |scope| {
                assert!(scope.is_empty());
                assert_eq!(scope.declare("x", 1), 0);
            })
            .unwrap();
        assert_eq!(matched, 0);
        assert!(make.records().is_empty());
    }

    #[test]
    fn range_scope_validates_its_range() {
        let mut make = Composer::<_, u8>::new("über");
        let err = make.range(0..1, |_| {}).unwrap_err();
        assert!(matches!(err, Error::RangeOutOfBounds(_)));
        make.range(0..2, |scope| {
            scope.declare("x", 1);
        })
        .unwrap();
        assert_eq!(make.records()[0].range().as_range(), 0..2);
    }

    #[test]
    fn regex_lookups_go_through_the_selector() {
        let mut make = Composer::<_, u8>::new("key=value; other=thing");
        let matched = make
            .each()
            .regex_group(r"(\w+)=(\w+)", 2_usize, RegexOptions::new(), |scope| {
                scope.declare("value", 1);
            })
            .unwrap();
        assert_eq!(matched, 2);
        let ranges: Vec<_> = make.records().iter().map(|r| r.range().as_range()).collect();
        assert_eq!(ranges, vec![4..9, 17..22]);
    }

    #[test]
    fn seeds_are_loaded_from_runs() {
        let mut seed = AttributedText::new("string");
        let all = TextRange::new(seed.text(), 0..6).unwrap();
        seed.set_attribute(all, "x", 1_u8);
        let tail = TextRange::new(seed.text(), 3..6).unwrap();
        seed.set_attribute(tail, "y", 2_u8);

        let make = Composer::from_attributed(seed);
        assert_eq!(make.text(), &"string");
        let records = make.records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.order().is_seed()));
        let head: Vec<_> = records
            .iter()
            .filter(|r| r.range().as_range() == (0..3))
            .map(|r| &**r.name())
            .collect();
        assert_eq!(head, vec!["x"]);
    }
}
