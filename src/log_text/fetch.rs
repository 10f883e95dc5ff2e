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

use super::chunk_store::ChunkStore;
use super::ranges::{self, RangeSet};
use std::ops::Range;

pub const DEFAULT_DOWNLOAD_OVERSCAN_LINES: usize = 200;
pub const DEFAULT_MAX_CHUNK_LINES: usize = 1000;
pub const DEFAULT_COALESCE_GAP_LINES: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTextConfig {
    /// Lines fetched beyond each side of the render range.
    pub download_overscan: usize,
    /// Upper bound on lines per request. 0 behaves like 1.
    pub max_chunk_lines: usize,
    /// Holes separated by fewer cached lines than this are fetched as one request.
    pub coalesce_gap: usize,
}

impl Default for LogTextConfig {
    fn default() -> Self {
        Self {
            download_overscan: DEFAULT_DOWNLOAD_OVERSCAN_LINES,
            max_chunk_lines: DEFAULT_MAX_CHUNK_LINES,
            coalesce_gap: DEFAULT_COALESCE_GAP_LINES,
        }
    }
}

/// Dispatch order class. Variants are declared in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FetchPriority {
    /// Touches rows the user can see.
    Visible,
    /// Touches mounted overscan rows.
    Rendered,
    /// Only covers the download pad.
    Prefetch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub range: Range<usize>,
    pub priority: FetchPriority,
}

/// Turns a render window into fetch requests and remembers what is in flight.
#[derive(Debug, Default)]
pub struct FetchCoordinator {
    config: LogTextConfig,
    pending: RangeSet,
}

impl FetchCoordinator {
    #[must_use]
    pub fn new(config: LogTextConfig) -> Self {
        Self { config, pending: RangeSet::new() }
    }

    #[must_use]
    pub fn config(&self) -> &LogTextConfig {
        &self.config
    }

    #[must_use]
    pub fn pending(&self) -> &RangeSet {
        &self.pending
    }

    /// Requests needed to cover `render` plus the download pad, in dispatch order.
    ///
    /// Returned ranges never overlap each other, the pending set, or (with
    /// `coalesce_gap == 0`) anything already cached.
    #[must_use]
    pub fn plan(
        &self,
        render: &Range<usize>,
        visible: &Range<usize>,
        num_lines: usize,
        store: &ChunkStore,
    ) -> Vec<FetchRequest> {
        let desired = ranges::pad(render, self.config.download_overscan, num_lines);
        self.plan_within(desired, render, visible, store)
    }

    /// Requests needed to cover `span` exactly, without the download pad.
    #[must_use]
    pub fn plan_span(
        &self,
        span: &Range<usize>,
        visible: &Range<usize>,
        num_lines: usize,
        store: &ChunkStore,
    ) -> Vec<FetchRequest> {
        self.plan_within(ranges::clip(span.clone(), num_lines), span, visible, store)
    }

    fn plan_within(
        &self,
        desired: Range<usize>,
        render: &Range<usize>,
        visible: &Range<usize>,
        store: &ChunkStore,
    ) -> Vec<FetchRequest> {
        if desired.is_empty() {
            return Vec::new();
        }

        let mut covered = self.pending.clone();
        for cached in store.cached_ranges_within(&desired) {
            covered.insert(cached);
        }
        let holes = self.coalesce(covered.gaps_within(desired));

        let mut requests: Vec<FetchRequest> = holes
            .into_iter()
            .flat_map(|hole| ranges::split(hole, self.config.max_chunk_lines))
            .map(|range| {
                let priority = classify(&range, render, visible);
                FetchRequest { range, priority }
            })
            .collect();
        requests.sort_by_key(|r| (r.priority, ranges::distance(&r.range, visible), r.range.start));
        requests
    }

    pub fn mark_pending(&mut self, range: Range<usize>) {
        self.pending.insert(range);
    }

    /// Forget an in-flight range, whether it succeeded or failed.
    pub fn complete(&mut self, range: Range<usize>) {
        self.pending.remove(range);
    }

    #[must_use]
    pub fn is_pending(&self, range: &Range<usize>) -> bool {
        self.pending.overlaps(range)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    // Gaps between holes are cached or pending lines. Only all-cached gaps are
    // bridged, re-fetching them is harmless; a pending gap would double-fetch.
    fn coalesce(&self, holes: Vec<Range<usize>>) -> Vec<Range<usize>> {
        if self.config.coalesce_gap == 0 || holes.len() < 2 {
            return holes;
        }
        let mut merged: Vec<Range<usize>> = Vec::with_capacity(holes.len());
        for hole in holes {
            if let Some(last) = merged.last_mut() {
                let gap = last.end..hole.start;
                if gap.len() < self.config.coalesce_gap && !self.pending.overlaps(&gap) {
                    last.end = hole.end;
                    continue;
                }
            }
            merged.push(hole);
        }
        merged
    }
}

fn classify(range: &Range<usize>, render: &Range<usize>, visible: &Range<usize>) -> FetchPriority {
    if ranges::intersects(range, visible) {
        FetchPriority::Visible
    } else if ranges::intersects(range, render) {
        FetchPriority::Rendered
    } else {
        FetchPriority::Prefetch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log_text::line::LogLine;
    use pretty_assertions::assert_eq;

    fn config(pad: usize, max: usize, gap: usize) -> LogTextConfig {
        LogTextConfig { download_overscan: pad, max_chunk_lines: max, coalesce_gap: gap }
    }

    fn cache(store: &mut ChunkStore, range: Range<usize>) {
        let start = range.start;
        store.merge(start, range.map(|i| LogLine::stdout(i.to_string())).collect());
    }

    fn ranges_of(requests: &[FetchRequest]) -> Vec<Range<usize>> {
        requests.iter().map(|r| r.range.clone()).collect()
    }

    #[test]
    fn initial_window_is_one_padded_request() {
        let coordinator = FetchCoordinator::new(config(20, 100, 0));
        let plan = coordinator.plan(&(0..50), &(0..30), 1000, &ChunkStore::new());
        assert_eq!(plan, vec![FetchRequest { range: 0..70, priority: FetchPriority::Visible }]);
    }

    #[test]
    fn pending_and_cached_ranges_are_skipped() {
        let mut coordinator = FetchCoordinator::new(config(0, 1000, 0));
        let mut store = ChunkStore::new();
        cache(&mut store, 0..10);
        coordinator.mark_pending(20..30);
        let plan = coordinator.plan(&(0..40), &(0..40), 1000, &store);
        assert_eq!(ranges_of(&plan), vec![10..20, 30..40]);
    }

    #[test]
    fn fully_covered_window_plans_nothing() {
        let mut coordinator = FetchCoordinator::new(config(10, 1000, 0));
        let mut store = ChunkStore::new();
        cache(&mut store, 0..30);
        coordinator.mark_pending(30..60);
        assert!(coordinator.plan(&(10..40), &(10..40), 1000, &store).is_empty());
    }

    #[test]
    fn large_holes_are_split_at_max_chunk() {
        let coordinator = FetchCoordinator::new(config(0, 100, 0));
        let plan = coordinator.plan(&(0..350), &(0..50), 10_000, &ChunkStore::new());
        assert_eq!(ranges_of(&plan), vec![0..100, 100..200, 200..300, 300..350]);
        assert!(plan.iter().all(|r| r.range.len() <= 100));
    }

    #[test]
    fn visible_holes_are_dispatched_first() {
        let coordinator = FetchCoordinator::new(config(50, 50, 0));
        // desired [50, 250): visible sits in the middle.
        let plan = coordinator.plan(&(100..200), &(140..160), 10_000, &ChunkStore::new());
        assert_eq!(plan[0].priority, FetchPriority::Visible);
        assert_eq!(plan[0].range, 100..150);
        assert_eq!(plan[1].range, 150..200);
        assert_eq!(plan[2].priority, FetchPriority::Prefetch);
        let priorities: Vec<_> = plan.iter().map(|r| r.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn rendered_holes_beat_prefetch() {
        let mut coordinator = FetchCoordinator::new(config(20, 1000, 0));
        let mut store = ChunkStore::new();
        cache(&mut store, 100..200);
        coordinator.mark_pending(95..100);
        // visible is cached, render tail [200, 210) is a hole, pad [80, 95) and [210, 230) too.
        let plan = coordinator.plan(&(100..210), &(120..180), 1000, &store);
        assert_eq!(
            plan,
            vec![
                FetchRequest { range: 200..230, priority: FetchPriority::Rendered },
                FetchRequest { range: 80..95, priority: FetchPriority::Prefetch },
            ]
        );
    }

    #[test]
    fn window_is_clipped_to_num_lines() {
        let coordinator = FetchCoordinator::new(config(20, 1000, 0));
        let plan = coordinator.plan(&(90..120), &(90..120), 100, &ChunkStore::new());
        assert_eq!(ranges_of(&plan), vec![70..100]);
        assert!(coordinator.plan(&(0..10), &(0..10), 0, &ChunkStore::new()).is_empty());
    }

    #[test]
    fn small_cached_gaps_are_bridged_when_configured() {
        let coordinator = FetchCoordinator::new(config(0, 1000, 4));
        let mut store = ChunkStore::new();
        cache(&mut store, 10..12);
        cache(&mut store, 30..40);
        let plan = coordinator.plan(&(0..50), &(0..50), 1000, &store);
        assert_eq!(ranges_of(&plan), vec![0..30, 40..50]);
    }

    #[test]
    fn pending_gaps_are_never_bridged() {
        let mut coordinator = FetchCoordinator::new(config(0, 1000, 100));
        coordinator.mark_pending(10..12);
        let plan = coordinator.plan(&(0..20), &(0..20), 1000, &ChunkStore::new());
        assert_eq!(ranges_of(&plan), vec![0..10, 12..20]);
    }

    #[test]
    fn span_plan_has_no_padding() {
        let mut coordinator = FetchCoordinator::new(config(200, 1000, 0));
        let mut store = ChunkStore::new();
        cache(&mut store, 10..12);
        coordinator.mark_pending(14..15);
        let plan = coordinator.plan_span(&(8..16), &(500..550), 1000, &store);
        assert_eq!(ranges_of(&plan), vec![8..10, 12..14, 15..16]);
        assert!(plan.iter().all(|r| r.priority == FetchPriority::Rendered));
        let clipped = coordinator.plan_span(&(990..1200), &(0..10), 1000, &store);
        assert_eq!(ranges_of(&clipped), vec![990..1000]);
    }

    #[test]
    fn complete_releases_only_its_own_range() {
        let mut coordinator = FetchCoordinator::new(LogTextConfig::default());
        coordinator.mark_pending(0..100);
        coordinator.mark_pending(100..170);
        coordinator.complete(0..100);
        assert!(!coordinator.is_pending(&(0..100)));
        assert!(coordinator.is_pending(&(100..170)));
        assert_eq!(coordinator.pending().as_slice(), &[100..170]);
    }
}
