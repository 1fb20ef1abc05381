// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use core::fmt::Debug;

use hashbrown::HashMap;

/// The key of an attribute.
///
/// Names are opaque to this crate; two attributes are the same attribute if their names compare
/// equal.
pub type AttributeName = Arc<str>;

/// A set of attribute values keyed by [`AttributeName`].
///
/// This is the unit written onto a range by [`AttributedText::set_attributes`], and the unit read
/// back for each run by [`AttributedText::runs`].
///
/// [`AttributedText::set_attributes`]: crate::AttributedText::set_attributes
/// [`AttributedText::runs`]: crate::AttributedText::runs
#[derive(Clone)]
pub struct Attributes<V> {
    map: HashMap<AttributeName, V>,
}

impl<V> Attributes<V> {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Creates an empty mapping with room for `capacity` attributes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Sets `name` to `value`, returning the value it replaces.
    pub fn insert(&mut self, name: impl Into<AttributeName>, value: V) -> Option<V> {
        self.map.insert(name.into(), value)
    }

    /// Returns the value for `name`.
    pub fn get(&self, name: &str) -> Option<&V> {
        self.map.get(name)
    }

    /// Returns `true` if `name` has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Removes `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<V> {
        self.map.remove(name)
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&AttributeName, &V)> {
        self.map.iter()
    }

    /// Iterates over the attribute names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(|name| &**name)
    }

    /// Removes all attributes, retaining allocated storage.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<V: Clone> Attributes<V> {
    /// Copies every attribute of `other` into `self`, overwriting values under shared names.
    pub fn overwrite_with(&mut self, other: &Self) {
        for (name, value) in &other.map {
            self.map.insert(name.clone(), value.clone());
        }
    }
}

impl<V> Default for Attributes<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for Attributes<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.map.iter()).finish()
    }
}

impl<V: PartialEq> PartialEq for Attributes<V> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<V: Eq> Eq for Attributes<V> {}

impl<N: Into<AttributeName>, V> FromIterator<(N, V)> for Attributes<V> {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        attributes.extend(iter);
        attributes
    }
}

impl<N: Into<AttributeName>, V> Extend<(N, V)> for Attributes<V> {
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.map.insert(name.into(), value);
        }
    }
}

impl<'a, V> IntoIterator for &'a Attributes<V> {
    type Item = (&'a AttributeName, &'a V);
    type IntoIter = hashbrown::hash_map::Iter<'a, AttributeName, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}
