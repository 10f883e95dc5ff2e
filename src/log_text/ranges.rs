// logtail-rs - A windowed terminal viewer for large remote logs
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Half-open line range arithmetic.
//!
//! Everything here runs on every scroll event, so the set keeps a single
//! sorted `Vec` and edits it in place with `splice` instead of rebuilding.

use std::ops::Range;

/// Sorted, disjoint set of half-open ranges. Adjacent ranges are coalesced
/// on insert, so `[0, 10)` + `[10, 20)` is stored as `[0, 20)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    ranges: Vec<Range<usize>>,
}

impl RangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of disjoint ranges (not lines).
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Range<usize>] {
        &self.ranges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Range<usize>> {
        self.ranges.iter()
    }

    /// Total number of indices covered.
    #[must_use]
    pub fn covered_len(&self) -> usize {
        self.ranges.iter().map(ExactSizeIterator::len).sum()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    pub fn insert(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        // Everything in lo..hi touches or overlaps `range`.
        let lo = self.ranges.partition_point(|r| r.end < range.start);
        let hi = self.ranges.partition_point(|r| r.start <= range.end);
        if lo == hi {
            self.ranges.insert(lo, range);
            return;
        }
        let start = range.start.min(self.ranges[lo].start);
        let end = range.end.max(self.ranges[hi - 1].end);
        self.ranges.splice(lo..hi, std::iter::once(start..end));
    }

    pub fn remove(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let lo = self.ranges.partition_point(|r| r.end <= range.start);
        let hi = self.ranges.partition_point(|r| r.start < range.end);
        if lo >= hi {
            return;
        }
        let first = self.ranges[lo].start;
        let last = self.ranges[hi - 1].end;
        let head = (first < range.start).then_some(first..range.start);
        let tail = (last > range.end).then_some(range.end..last);
        self.ranges.splice(lo..hi, head.into_iter().chain(tail));
    }

    /// True if every index of `range` is in the set. Empty ranges are always contained.
    #[must_use]
    pub fn contains_range(&self, range: &Range<usize>) -> bool {
        if range.is_empty() {
            return true;
        }
        let idx = self.ranges.partition_point(|r| r.end <= range.start);
        self.ranges.get(idx).is_some_and(|r| r.start <= range.start && r.end >= range.end)
    }

    #[must_use]
    pub fn overlaps(&self, range: &Range<usize>) -> bool {
        if range.is_empty() {
            return false;
        }
        let idx = self.ranges.partition_point(|r| r.end <= range.start);
        self.ranges.get(idx).is_some_and(|r| r.start < range.end)
    }

    /// The parts of `range` not covered by the set, in ascending order.
    #[must_use]
    pub fn gaps_within(&self, range: Range<usize>) -> Vec<Range<usize>> {
        let mut gaps = Vec::new();
        let mut cursor = range.start;
        let first = self.ranges.partition_point(|r| r.end <= range.start);
        for covered in &self.ranges[first..] {
            if covered.start >= range.end {
                break;
            }
            if covered.start > cursor {
                gaps.push(cursor..covered.start);
            }
            cursor = cursor.max(covered.end);
        }
        if cursor < range.end {
            gaps.push(cursor..range.end);
        }
        gaps
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a Range<usize>;
    type IntoIter = std::slice::Iter<'a, Range<usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl FromIterator<Range<usize>> for RangeSet {
    fn from_iter<I: IntoIterator<Item = Range<usize>>>(iter: I) -> Self {
        let mut set = Self::new();
        for range in iter {
            set.insert(range);
        }
        set
    }
}

/// Clip `range` to `[0, limit)`. Ranges entirely past the limit collapse to `limit..limit`.
#[must_use]
pub fn clip(range: Range<usize>, limit: usize) -> Range<usize> {
    let end = range.end.min(limit);
    range.start.min(end)..end
}

/// Grow `range` by `by` on both sides, then clip to `[0, limit)`.
#[must_use]
pub fn pad(range: &Range<usize>, by: usize, limit: usize) -> Range<usize> {
    clip(range.start.saturating_sub(by)..range.end.saturating_add(by), limit)
}

/// Smallest contiguous range covering both inputs. Empty inputs are ignored.
#[must_use]
pub fn hull(a: &Range<usize>, b: &Range<usize>) -> Range<usize> {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.clone(),
        (_, true) => a.clone(),
        _ => a.start.min(b.start)..a.end.max(b.end),
    }
}

#[must_use]
pub fn intersects(a: &Range<usize>, b: &Range<usize>) -> bool {
    !a.is_empty() && !b.is_empty() && a.start < b.end && b.start < a.end
}

/// Lines between two ranges; 0 when they touch or overlap.
#[must_use]
pub fn distance(a: &Range<usize>, b: &Range<usize>) -> usize {
    if a.end <= b.start {
        b.start - a.end
    } else if b.end <= a.start {
        a.start - b.end
    } else {
        0
    }
}

/// Cut `range` into consecutive pieces of at most `max_len` (0 is treated as 1).
pub fn split(range: Range<usize>, max_len: usize) -> impl Iterator<Item = Range<usize>> {
    let step = max_len.max(1);
    let end = range.end;
    range.step_by(step).map(move |start| start..start.saturating_add(step).min(end))
}
