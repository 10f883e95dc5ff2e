// =====
// TESTS: 10
// =====
//
// Fetch scheduling scenarios driven through the public manager API.

use logtail_rs::log_text::{FetchPriority, FetchRequest, RangeSet, RenderInfo};
use pretty_assertions::assert_eq;
use std::ops::Range;

use crate::helpers::{ScriptedSource, config, local, manager, settle};

fn ranges_of(requests: &[FetchRequest]) -> Vec<Range<usize>> {
    requests.iter().map(|r| r.range.clone()).collect()
}

// --- Initial window ---

#[tokio::test]
async fn first_window_is_fetched_with_download_padding() {
    local(async {
        let source = ScriptedSource::with_lines(1000);
        let mut m = manager(&source, config(20, 1000));

        let requests = m.request_rows(&RenderInfo::new(0..50, 0..30));
        assert_eq!(requests, vec![FetchRequest { range: 0..70, priority: FetchPriority::Visible }]);

        settle(&mut m).await;
        assert!(m.is_range_cached(0..70));
        assert_eq!(m.line_for_display(69).text(), "line 69");
        assert_eq!(source.calls(), vec![0..70]);
    })
    .await;
}

#[tokio::test]
async fn overlapping_window_while_pending_only_fetches_the_new_tail() {
    local(async {
        let source = ScriptedSource::with_lines(1000);
        let mut m = manager(&source, config(20, 1000));

        let first = m.request_rows(&RenderInfo::new(0..50, 0..30));
        assert_eq!(ranges_of(&first), vec![0..70]);

        // Nothing completed yet; the second window overlaps the pending fetch.
        let second = m.request_rows(&RenderInfo::new(10..60, 20..40));
        assert_eq!(ranges_of(&second), vec![70..80]);
        for request in &second {
            assert!(request.range.start >= 70, "re-requested pending lines: {:?}", request.range);
        }

        settle(&mut m).await;
        assert!(m.is_range_cached(0..80));
        assert_eq!(source.calls().len(), 2);
    })
    .await;
}

#[tokio::test]
async fn large_window_is_split_into_capped_chunks_visible_first() {
    local(async {
        let source = ScriptedSource::with_lines(10_000);
        let mut m = manager(&source, config(0, 1000));

        let requests = m.request_rows(&RenderInfo::new(0..5000, 0..30));
        assert_eq!(
            ranges_of(&requests),
            vec![0..1000, 1000..2000, 2000..3000, 3000..4000, 4000..5000]
        );
        assert_eq!(requests[0].priority, FetchPriority::Visible);
        assert!(requests[1..].iter().all(|r| r.priority == FetchPriority::Rendered));
        assert!(requests.iter().all(|r| r.range.len() <= 1000));

        assert_eq!(settle(&mut m).await, 5);
        assert_eq!(m.cached_line_count(), 5000);
    })
    .await;
}

#[tokio::test]
async fn padding_beyond_the_window_is_prefetch() {
    local(async {
        let source = ScriptedSource::with_lines(10_000);
        let mut m = manager(&source, config(100, 50));

        let requests = m.request_rows(&RenderInfo::new(500..520, 505..515));
        // Closest to the visible rows goes first, the far ends of the pad last.
        assert_eq!(requests[0].priority, FetchPriority::Visible);
        assert_eq!(requests.last().map(|r| r.priority), Some(FetchPriority::Prefetch));
        let covered: RangeSet = ranges_of(&requests).into_iter().collect();
        assert_eq!(covered.as_slice(), &[400..620]);
    })
    .await;
}

// --- Selection guard ---

#[tokio::test]
async fn active_selection_keeps_its_rows_mounted_while_scrolling() {
    local(async {
        let source = ScriptedSource::with_lines(1000);
        let mut m = manager(&source, config(0, 1000));

        let info = m.range_to_render_override(RenderInfo::new(40..60, 45..55));
        m.request_rows(&info);
        m.set_is_selection_active(true);

        let scrolled = m.range_to_render_override(RenderInfo::new(70..120, 80..110));
        assert_eq!(scrolled.overscan, 40..120);
        assert_eq!(scrolled.visible, 80..110);
        assert_eq!(m.viewport().baseline(), Some(&(70..120)));

        m.set_is_selection_active(false);
        let released = m.range_to_render_override(RenderInfo::new(70..120, 80..110));
        assert_eq!(released.overscan, 70..120);
    })
    .await;
}

#[tokio::test]
async fn override_always_covers_the_selection_span() {
    local(async {
        let source = ScriptedSource::with_lines(1000);
        let mut m = manager(&source, config(0, 1000));
        m.set_selection_span(Some(300..310));

        for start in [0, 100, 290, 305, 500, 950] {
            let end = (start + 50).min(1000);
            let out = m.range_to_render_override(RenderInfo::new(start..end, start..end));
            assert!(out.overscan.start <= 300 && out.overscan.end >= 310, "{out:?}");
            assert!(out.overscan.start <= start && out.overscan.end >= end, "{out:?}");
        }
    })
    .await;
}

#[tokio::test]
async fn distant_selection_only_fetches_its_own_rows() {
    local(async {
        let source = ScriptedSource::with_lines(100_000);
        let mut m = manager(&source, config(200, 1000));
        m.set_selection_span(Some(5..6));

        let info = m.range_to_render_override(RenderInfo::new(99_930..100_000, 99_950..100_000));
        assert_eq!(info.overscan, 5..100_000);

        let requests = m.request_rows(&info);
        assert_eq!(ranges_of(&requests), vec![99_730..100_000, 5..6]);
        assert_eq!(requests[0].priority, FetchPriority::Visible);

        settle(&mut m).await;
        assert_eq!(m.cached_line_count(), 271);
        assert_eq!(m.line_for_display(5).text(), "line 5");
        assert!(m.line_for_display(6).is_placeholder());
        assert_eq!(m.viewport().render(), &(5..100_000));
    })
    .await;
}

// --- Properties ---

#[tokio::test]
async fn dispatched_ranges_never_overlap_pending_or_cached() {
    local(async {
        let source = ScriptedSource::with_lines(5000);
        let mut m = manager(&source, config(30, 64));
        let windows = [0..40, 20..60, 400..440, 30..90, 380..470, 1000..1040, 0..40, 990..1100];

        for (step, window) in windows.iter().enumerate() {
            let before: RangeSet = m.pending_ranges().clone();
            let requests = m.request_rows(&RenderInfo::new(window.clone(), window.clone()));
            let mut seen = RangeSet::new();
            for request in &requests {
                let range = request.range.clone();
                assert!(!before.overlaps(&range), "step {step}: {range:?} already pending");
                assert!(!seen.overlaps(&range), "step {step}: {range:?} dispatched twice");
                for line in range.clone() {
                    assert!(m.line_for_display(line).is_placeholder(), "step {step}: {line}");
                }
                seen.insert(range);
            }
            // Let every other step complete so cached and pending lines mix.
            if step % 2 == 1 {
                settle(&mut m).await;
            }
        }
        settle(&mut m).await;

        let calls = source.calls();
        let total: usize = calls.iter().map(ExactSizeIterator::len).sum();
        let union: RangeSet = calls.into_iter().collect();
        assert_eq!(total, union.covered_len(), "some line was fetched twice");
    })
    .await;
}

#[tokio::test]
async fn identical_window_after_completion_dispatches_nothing() {
    local(async {
        let source = ScriptedSource::with_lines(1000);
        let mut m = manager(&source, config(10, 1000));
        let info = RenderInfo::new(100..150, 110..140);
        assert!(!m.request_rows(&info).is_empty());
        settle(&mut m).await;
        assert!(m.request_rows(&info).is_empty());
        assert_eq!(source.calls(), vec![90..160]);
    })
    .await;
}

#[tokio::test]
async fn window_past_the_end_is_clipped() {
    local(async {
        let source = ScriptedSource::with_lines(100);
        let mut m = manager(&source, config(20, 1000));
        let requests = m.request_rows(&RenderInfo::new(80..140, 90..130));
        assert_eq!(ranges_of(&requests), vec![60..100]);
        settle(&mut m).await;
        assert!(m.line_for_display(100).is_placeholder());
        assert_eq!(m.line_for_display(99).text(), "line 99");
    })
    .await;
}
