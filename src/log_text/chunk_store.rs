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

use super::line::LogLine;
use std::collections::BTreeMap;
use std::ops::Range;

/// Fetched lines keyed by the first line index of each chunk.
///
/// Chunks never overlap or touch: `merge` folds every neighbour it reaches
/// into one entry, so the keys always describe a minimal disjoint cover.
/// Nothing is ever evicted.
#[derive(Debug, Default)]
pub struct ChunkStore {
    chunks: BTreeMap<usize, Vec<LogLine>>,
    line_count: usize,
}

impl ChunkStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff every index in `range` is cached.
    #[must_use]
    pub fn has_range(&self, range: Range<usize>) -> bool {
        if range.is_empty() {
            return true;
        }
        self.chunk_at(range.start).is_some_and(|(start, lines)| start + lines.len() >= range.end)
    }

    #[must_use]
    pub fn get_line(&self, index: usize) -> Option<&LogLine> {
        let (start, lines) = self.chunk_at(index)?;
        lines.get(index - start)
    }

    /// Store `lines` at `[start, start + lines.len())`. Overlapping content is replaced.
    pub fn merge(&mut self, start: usize, lines: Vec<LogLine>) {
        if lines.is_empty() {
            return;
        }
        let end = start + lines.len();

        // Chunks are disjoint, so walking back from `end` their ends only decrease.
        let touching: Vec<usize> = self
            .chunks
            .range(..=end)
            .rev()
            .take_while(|(s, l)| *s + l.len() >= start)
            .map(|(s, _)| *s)
            .collect();

        let mut removed: Vec<(usize, Vec<LogLine>)> =
            touching.iter().rev().filter_map(|key| self.chunks.remove_entry(key)).collect();
        self.line_count -= removed.iter().map(|(_, l)| l.len()).sum::<usize>();

        let merged_start = removed.first().map_or(start, |(s, _)| (*s).min(start));
        // Cut the tail before the head: both may live in the same chunk.
        let tail = match removed.last_mut() {
            Some((s, l)) if *s + l.len() > end => l.split_off(end - *s),
            _ => Vec::new(),
        };
        let mut merged = match removed.into_iter().next() {
            Some((s, mut head)) if s < start => {
                head.truncate(start - s);
                head
            }
            _ => Vec::with_capacity(lines.len() + tail.len()),
        };
        merged.extend(lines);
        merged.extend(tail);

        self.line_count += merged.len();
        self.chunks.insert(merged_start, merged);
    }

    pub fn cached_ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.chunks.iter().map(|(start, lines)| *start..*start + lines.len())
    }

    /// Cached ranges that overlap `range`, ascending.
    pub fn cached_ranges_within(
        &self,
        range: &Range<usize>,
    ) -> impl Iterator<Item = Range<usize>> + '_ {
        let lower = self.chunk_at(range.start).map_or(range.start, |(start, _)| start);
        self.chunks
            .range(lower..range.end.max(lower))
            .map(|(start, lines)| *start..*start + lines.len())
    }

    #[must_use]
    pub fn cached_line_count(&self) -> usize {
        self.line_count
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    fn chunk_at(&self, index: usize) -> Option<(usize, &Vec<LogLine>)> {
        let (&start, lines) = self.chunks.range(..=index).next_back()?;
        (index < start + lines.len()).then_some((start, lines))
    }
}
