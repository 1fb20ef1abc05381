// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segmentation of an [`AttributedText`] into non-overlapping runs.
//!
//! Spans written onto an [`AttributedText`] may overlap. This module cuts the text at every span
//! boundary and sweeps left to right, keeping the set of spans active over each segment.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::Range;

use crate::{AttributeRun, AttributedText, Attributes, TextStorage};

/// Position of `offset` in the sorted, deduplicated `boundaries`.
///
/// Every span endpoint is pushed into `boundaries`, so the search always hits.
fn boundary_index(boundaries: &[usize], offset: usize) -> usize {
    boundaries
        .binary_search(&offset)
        .unwrap_or_else(|insert_at| insert_at)
}

/// Reusable allocation workspace for attribute segmentation.
///
/// Reusing a workspace amortizes setup allocations when processing many pieces of text.
#[derive(Clone, Debug, Default)]
pub struct AttributeSegmentsWorkspace {
    boundaries: Vec<usize>,
    /// `(boundary, span)` for every non-empty span, sorted by boundary then span.
    opens: Vec<(usize, usize)>,
    closes: Vec<(usize, usize)>,
    /// Ids of the spans covering the current segment, in write order.
    active: Vec<usize>,
}

impl AttributeSegmentsWorkspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a segment iterator using this workspace's retained allocations.
    pub fn segments<'w, 'a, T: Debug + TextStorage, V: Debug>(
        &'w mut self,
        attributed: &'a AttributedText<T, V>,
    ) -> AttributeSegments<'w, 'a, T, V> {
        self.prepare(attributed);
        AttributeSegments {
            attributed,
            workspace: self,
            index: 0,
            next_open: 0,
            next_close: 0,
        }
    }

    /// Build an iterator of resolved [`AttributeRun`]s using this workspace.
    pub fn runs<'w, 'a, T: Debug + TextStorage, V: Debug + Clone>(
        &'w mut self,
        attributed: &'a AttributedText<T, V>,
    ) -> AttributeRuns<'w, 'a, T, V> {
        AttributeRuns {
            segments: self.segments(attributed),
        }
    }

    fn prepare<T: Debug + TextStorage, V: Debug>(&mut self, attributed: &AttributedText<T, V>) {
        self.boundaries.clear();
        self.boundaries.push(0);
        self.boundaries.push(attributed.len());
        for (range, _) in attributed.spans_iter() {
            self.boundaries.push(range.start);
            self.boundaries.push(range.end);
        }
        self.boundaries.sort_unstable();
        // Empty text has a single boundary and therefore no segments.
        self.boundaries.dedup();

        self.opens.clear();
        self.closes.clear();
        for (id, (range, _)) in attributed.spans_iter().enumerate() {
            if range.is_empty() {
                continue;
            }
            self.opens.push((boundary_index(&self.boundaries, range.start), id));
            self.closes.push((boundary_index(&self.boundaries, range.end), id));
        }
        self.opens.sort_unstable();
        self.closes.sort_unstable();
        self.active.clear();
    }
}

/// Iterator over contiguous segments of an [`AttributedText`].
///
/// Each yielded item is a non-empty, non-overlapping range; together they cover the text. The
/// spans written over the yielded range are exposed through [`AttributeSegments::active_spans`].
///
/// # Examples
///
/// ```
/// use attributed_text::{AttributeSegmentsWorkspace, AttributedText, TextRange};
///
/// let mut text = AttributedText::new("hello");
/// let head = TextRange::new(text.text(), 0..2).unwrap();
/// text.set_attribute(head, "color", "red");
/// let tail = TextRange::new(text.text(), 1..5).unwrap();
/// text.set_attribute(tail, "color", "blue");
///
/// let mut workspace = AttributeSegmentsWorkspace::new();
/// let mut segments = workspace.segments(&text);
///
/// assert_eq!(segments.next(), Some(0..1));
/// assert_eq!(segments.active_spans().len(), 1);
///
/// assert_eq!(segments.next(), Some(1..2));
/// let colors: Vec<_> = segments
///     .active_spans()
///     .iter()
///     .map(|(_, attrs)| attrs.get("color").copied())
///     .collect();
/// assert_eq!(colors, vec![Some("red"), Some("blue")]);
/// ```
///
/// Empty writes never reach the span list, so they neither split segments nor become active.
#[derive(Debug)]
pub struct AttributeSegments<'w, 'a, T: Debug + TextStorage, V: Debug> {
    attributed: &'a AttributedText<T, V>,
    workspace: &'w mut AttributeSegmentsWorkspace,
    index: usize,
    next_open: usize,
    next_close: usize,
}

impl<'a, T: Debug + TextStorage, V: Debug> AttributeSegments<'_, 'a, T, V> {
    /// Moves the active set across `boundary`: spans ending there leave, spans starting there join.
    fn cross_boundary(&mut self, boundary: usize) {
        let ws = &mut *self.workspace;
        while let Some(&(at, id)) = ws.closes.get(self.next_close) {
            if at != boundary {
                break;
            }
            if let Ok(ix) = ws.active.binary_search(&id) {
                ws.active.remove(ix);
            }
            self.next_close += 1;
        }
        while let Some(&(at, id)) = ws.opens.get(self.next_open) {
            if at != boundary {
                break;
            }
            if let Err(ix) = ws.active.binary_search(&id) {
                ws.active.insert(ix, id);
            }
            self.next_open += 1;
        }
    }

    /// Returns the spans active for the most recently yielded segment.
    ///
    /// Before the first successful [`Iterator::next`] call, and after exhaustion, this is empty.
    pub fn active_spans(&self) -> ActiveSpans<'_, 'a, T, V> {
        ActiveSpans {
            active_ids: &self.workspace.active,
            attributed: self.attributed,
        }
    }
}

impl<T: Debug + TextStorage, V: Debug> Iterator for AttributeSegments<'_, '_, T, V> {
    type Item = Range<usize>;

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len();
        (remaining, Some(remaining))
    }

    fn next(&mut self) -> Option<Self::Item> {
        if self.index + 1 < self.workspace.boundaries.len() {
            self.cross_boundary(self.index);
            let start = self.workspace.boundaries[self.index];
            let end = self.workspace.boundaries[self.index + 1];
            self.index += 1;
            debug_assert!(start < end, "boundaries are sorted and deduplicated");
            return Some(start..end);
        }
        self.workspace.active.clear();
        None
    }
}

impl<T: Debug + TextStorage, V: Debug> ExactSizeIterator for AttributeSegments<'_, '_, T, V> {
    fn len(&self) -> usize {
        // Remaining segments are remaining adjacent boundary pairs: [i, i + 1).
        self.workspace
            .boundaries
            .len()
            .saturating_sub(self.index + 1)
    }
}

/// A view of the spans active over a particular segment.
///
/// Iterates in write order; iterate in reverse for last-writer-first.
#[derive(Clone, Debug)]
pub struct ActiveSpans<'s, 'a, T: Debug + TextStorage, V: Debug> {
    active_ids: &'s [usize],
    attributed: &'a AttributedText<T, V>,
}

/// Iterator over active spans in write order.
///
/// Obtain this by calling [`ActiveSpans::iter`].
#[derive(Clone, Debug)]
pub struct ActiveSpansIter<'s, 'a, T: Debug + TextStorage, V: Debug> {
    ids: core::slice::Iter<'s, usize>,
    attributed: &'a AttributedText<T, V>,
}

impl<'a, T: Debug + TextStorage, V: Debug> Iterator for ActiveSpansIter<'_, 'a, T, V> {
    type Item = (&'a Range<usize>, &'a Attributes<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let &id = self.ids.next()?;
        self.attributed.span_at_idx(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<T: Debug + TextStorage, V: Debug> ExactSizeIterator for ActiveSpansIter<'_, '_, T, V> {}

impl<T: Debug + TextStorage, V: Debug> DoubleEndedIterator for ActiveSpansIter<'_, '_, T, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let &id = self.ids.next_back()?;
        self.attributed.span_at_idx(id)
    }
}

impl<'a, T: Debug + TextStorage, V: Debug> ActiveSpans<'_, 'a, T, V> {
    /// Iterate over the active spans in write order.
    pub fn iter(&self) -> ActiveSpansIter<'_, 'a, T, V> {
        ActiveSpansIter {
            ids: self.active_ids.iter(),
            attributed: self.attributed,
        }
    }

    /// Returns `true` if no spans are active in this segment.
    pub fn is_empty(&self) -> bool {
        self.active_ids.is_empty()
    }

    /// Returns the number of active spans.
    pub fn len(&self) -> usize {
        self.active_ids.len()
    }
}

/// Iterator over the resolved runs of an [`AttributedText`].
///
/// Each run merges the spans active over one segment in write order, so later writes win per
/// attribute name.
#[derive(Debug)]
pub struct AttributeRuns<'w, 'a, T: Debug + TextStorage, V: Debug + Clone> {
    segments: AttributeSegments<'w, 'a, T, V>,
}

impl<T: Debug + TextStorage, V: Debug + Clone> Iterator for AttributeRuns<'_, '_, T, V> {
    type Item = AttributeRun<V>;

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.segments.size_hint()
    }

    fn next(&mut self) -> Option<Self::Item> {
        let range = self.segments.next()?;
        let mut attributes = Attributes::new();
        for (_, written) in self.segments.active_spans().iter() {
            attributes.overwrite_with(written);
        }
        Some(AttributeRun { range, attributes })
    }
}

impl<T: Debug + TextStorage, V: Debug + Clone> ExactSizeIterator for AttributeRuns<'_, '_, T, V> {}
