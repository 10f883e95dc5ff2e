// =====
// TESTS: 7
// =====
//
// Growth, failure recovery, change notification and teardown.

use logtail_rs::error::LogFetchError;
use logtail_rs::log_text::RenderInfo;
use logtail_rs::source::LogSource as _;
use pretty_assertions::assert_eq;
use std::cell::Cell;
use std::rc::Rc;

use crate::helpers::{ScriptedSource, config, local, manager, settle};

#[tokio::test]
async fn growth_under_the_window_notifies_and_fetches_new_rows() {
    local(async {
        let source = ScriptedSource::with_lines(100);
        let changes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&changes);
        let mut m = manager(&source, config(0, 1000)).with_change_sink(move || {
            counter.set(counter.get() + 1);
        });

        // Window reaches past the current end, as in follow mode.
        m.request_rows(&RenderInfo::new(80..130, 80..130));
        settle(&mut m).await;
        let after_first = changes.get();
        assert_eq!(after_first, 1);

        source.append(50);
        let info = source.log_info("build").await.unwrap();
        m.set_log_num_lines(info.num_lines);
        assert_eq!(m.num_lines(), 150);
        assert_eq!(changes.get(), after_first + 1);

        let requests = m.request_rows(&RenderInfo::new(80..130, 80..130));
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].range, 100..130);
        settle(&mut m).await;
        assert_eq!(m.line_for_display(129).text(), "line 129");
    })
    .await;
}

#[tokio::test]
async fn shrinking_length_is_ignored() {
    local(async {
        let source = ScriptedSource::with_lines(500);
        let mut m = manager(&source, config(0, 1000));
        m.set_log_num_lines(200);
        assert_eq!(m.num_lines(), 500);
    })
    .await;
}

#[tokio::test]
async fn failed_fetch_leaves_placeholders_and_is_retried() {
    local(async {
        let source = ScriptedSource::with_lines(1000);
        let mut m = manager(&source, config(0, 1000));
        source.set_failing(true);

        let info = RenderInfo::new(0..20, 0..20);
        m.request_rows(&info);
        let completion = m.next_completion().await.unwrap();
        let err = m.apply_completion(completion).unwrap_err();
        assert!(matches!(err, LogFetchError::Remote { .. }));
        assert!(err.is_fetch_failure());
        assert!(m.pending_ranges().is_empty());
        assert!(m.line_for_display(5).is_placeholder());

        source.set_failing(false);
        assert_eq!(m.request_rows(&info).len(), 1);
        settle(&mut m).await;
        assert_eq!(m.line_for_display(5).text(), "line 5");
        assert_eq!(source.calls(), vec![0..20, 0..20]);
    })
    .await;
}

#[tokio::test]
async fn completions_outside_the_window_do_not_notify() {
    local(async {
        let source = ScriptedSource::with_lines(10_000);
        let changes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&changes);
        let mut m = manager(&source, config(0, 1000)).with_change_sink(move || {
            counter.set(counter.get() + 1);
        });

        m.request_rows(&RenderInfo::new(0..10, 0..10));
        // Scroll away before the fetch lands.
        m.request_rows(&RenderInfo::new(5000..5010, 5000..5010));
        let mut notified = Vec::new();
        while !m.pending_ranges().is_empty() {
            let completion = m.next_completion().await.unwrap();
            let range = completion.range.clone();
            let before = changes.get();
            m.apply_completion(completion).unwrap();
            notified.push((range, changes.get() > before));
        }
        notified.sort_by_key(|(range, _)| range.start);
        assert_eq!(notified, vec![(0..10, false), (5000..5010, true)]);
    })
    .await;
}

#[tokio::test]
async fn dispose_drops_in_flight_results() {
    local(async {
        let source = ScriptedSource::with_lines(1000);
        let changes = Rc::new(Cell::new(0));
        let counter = Rc::clone(&changes);
        let mut m = manager(&source, config(0, 1000)).with_change_sink(move || {
            counter.set(counter.get() + 1);
        });

        m.request_rows(&RenderInfo::new(0..50, 0..50));
        m.dispose();
        assert!(m.is_disposed());
        assert!(m.pending_ranges().is_empty());

        let completion = m.next_completion().await.unwrap();
        let err = m.apply_completion(completion).unwrap_err();
        assert!(matches!(err, LogFetchError::Disposed { .. }));
        assert_eq!(m.cached_line_count(), 0);
        assert_eq!(changes.get(), 0);
        assert!(m.request_rows(&RenderInfo::new(0..50, 0..50)).is_empty());
    })
    .await;
}

#[tokio::test]
async fn repeated_completion_is_idempotent() {
    local(async {
        let source = ScriptedSource::with_lines(100);
        let mut m = manager(&source, config(0, 1000));
        m.request_rows(&RenderInfo::new(10..30, 10..30));
        let completion = m.next_completion().await.unwrap();
        let replay = logtail_rs::log_text::FetchCompletion {
            epoch: completion.epoch,
            range: completion.range.clone(),
            result: Ok((10..30).map(|i| format!("line {i}")).collect()),
        };
        m.apply_completion(completion).unwrap();
        m.apply_completion(replay).unwrap();
        assert_eq!(m.cached_line_count(), 20);
        assert_eq!(m.line_for_display(10).text(), "line 10");
    })
    .await;
}

#[tokio::test]
async fn adjacent_fetches_merge_into_one_cached_run() {
    local(async {
        let source = ScriptedSource::with_lines(1000);
        let mut m = manager(&source, config(0, 1000));
        m.request_rows(&RenderInfo::new(0..10, 0..10));
        settle(&mut m).await;
        m.request_rows(&RenderInfo::new(10..20, 10..20));
        settle(&mut m).await;
        assert!(m.is_range_cached(0..20));
        assert_eq!(m.cached_line_count(), 20);
    })
    .await;
}
