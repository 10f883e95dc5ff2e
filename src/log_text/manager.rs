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
use super::fetch::{FetchCoordinator, FetchRequest, LogTextConfig};
use super::line::{LogIdentity, LogLine};
use super::ranges::{self, RangeSet};
use super::selection::SelectionGuard;
use super::viewport::{RenderInfo, ViewportTracker};
use crate::error::LogFetchError;
use crate::source::LogSource;
use std::ops::Range;
use std::rc::Rc;
use tokio::sync::mpsc;

/// Invoked after cached content that touches mounted rows changes.
pub type ChangeSink = Box<dyn FnMut()>;

/// Result of one fetch task, tagged with the epoch it was dispatched under.
#[derive(Debug)]
pub struct FetchCompletion {
    pub epoch: u64,
    pub range: Range<usize>,
    pub result: anyhow::Result<Vec<String>>,
}

/// What a row should show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayLine<'a> {
    Loaded(&'a LogLine),
    /// Not cached yet (or the fetch failed); render a stand-in row.
    Placeholder,
}

impl<'a> DisplayLine<'a> {
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    #[must_use]
    pub fn text(&self) -> &'a str {
        match *self {
            Self::Loaded(line) => &line.text,
            Self::Placeholder => "",
        }
    }
}

/// Windowed line cache for one log.
///
/// Owns the chunk store, the in-flight request set, the last reported render
/// window and the selection guard. Fetches run as `spawn_local` tasks and
/// report back over a channel; nothing is merged until the owner hands the
/// completion to [`LogTextManager::apply_completion`], so all state changes
/// happen on the owner's turn of the event loop.
pub struct LogTextManager {
    log: LogIdentity,
    source: Rc<dyn LogSource>,
    num_lines: usize,
    store: ChunkStore,
    fetch: FetchCoordinator,
    viewport: ViewportTracker,
    selection: SelectionGuard,
    epoch: u64,
    disposed: bool,
    on_change: Option<ChangeSink>,
    completion_tx: mpsc::UnboundedSender<FetchCompletion>,
    completion_rx: mpsc::UnboundedReceiver<FetchCompletion>,
}

impl LogTextManager {
    #[must_use]
    pub fn new(log: LogIdentity, source: Rc<dyn LogSource>, config: LogTextConfig) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            log,
            source,
            num_lines: 0,
            store: ChunkStore::new(),
            fetch: FetchCoordinator::new(config),
            viewport: ViewportTracker::default(),
            selection: SelectionGuard::default(),
            epoch: 0,
            disposed: false,
            on_change: None,
            completion_tx,
            completion_rx,
        }
    }

    #[must_use]
    pub fn with_change_sink(mut self, sink: impl FnMut() + 'static) -> Self {
        self.on_change = Some(Box::new(sink));
        self
    }

    #[must_use]
    pub fn log(&self) -> &LogIdentity {
        &self.log
    }

    #[must_use]
    pub fn num_lines(&self) -> usize {
        self.num_lines
    }

    #[must_use]
    pub fn config(&self) -> &LogTextConfig {
        self.fetch.config()
    }

    /// Accept a new log length. Logs only grow, so a smaller value is ignored.
    pub fn set_log_num_lines(&mut self, num_lines: usize) {
        if num_lines < self.num_lines {
            tracing::warn!(
                log = self.log.id(),
                known = self.num_lines,
                reported = num_lines,
                "ignoring shrinking line count"
            );
            return;
        }
        if num_lines == self.num_lines {
            return;
        }
        let previous = std::mem::replace(&mut self.num_lines, num_lines);
        tracing::debug!(log = self.log.id(), previous, num_lines, "log grew");
        // Rows past the old end just came into existence under the mounted window.
        if self.viewport.render().end > previous {
            self.notify();
        }
    }

    /// The list mounted a new window: remember it and fetch what it needs.
    /// Returns the requests that were dispatched, in dispatch order.
    pub fn request_rows(&mut self, info: &RenderInfo) -> Vec<FetchRequest> {
        if self.disposed {
            return Vec::new();
        }
        let window = self.fetch_window(&info.overscan);
        self.viewport.update(info);
        let mut requests = self.fetch.plan(&window, &info.visible, self.num_lines, &self.store);
        for request in &requests {
            self.dispatch(request);
        }
        // Pinned rows far from the window are fetched on their own, unpadded.
        if let Some(span) = self.selection.span().cloned() {
            let pinned = self.fetch.plan_span(&span, &info.visible, self.num_lines, &self.store);
            for request in &pinned {
                self.dispatch(request);
            }
            requests.extend(pinned);
        }
        if !requests.is_empty() {
            tracing::debug!(
                log = self.log.id(),
                count = requests.len(),
                first = ?requests.first().map(|r| &r.range),
                "dispatched line fetches"
            );
        }
        requests
    }

    /// Record the window the list computed before any selection widening.
    pub fn on_cell_range_rendered(&mut self, overscan_start: usize, overscan_stop: usize) {
        self.viewport.record_baseline(overscan_start..overscan_stop);
    }

    /// Override hook called by the list before it mounts rows.
    #[must_use]
    pub fn range_to_render_override(&mut self, info: RenderInfo) -> RenderInfo {
        self.on_cell_range_rendered(info.overscan.start, info.overscan.end);
        let overscan = self.widened(&info.overscan);
        RenderInfo { overscan, visible: info.visible }
    }

    fn widened(&self, overscan: &Range<usize>) -> Range<usize> {
        ranges::clip(self.selection.widen(overscan.clone()), self.num_lines)
    }

    /// Window the download pad is applied to. When `overscan` is the widened
    /// form of the recorded baseline, the baseline is used instead so the
    /// rows between the viewport and the selection are never downloaded.
    fn fetch_window(&self, overscan: &Range<usize>) -> Range<usize> {
        match self.viewport.baseline() {
            Some(baseline) if self.widened(baseline) == *overscan => {
                ranges::clip(baseline.clone(), self.num_lines)
            }
            _ => overscan.clone(),
        }
    }

    #[must_use]
    pub fn line_for_display(&self, index: usize) -> DisplayLine<'_> {
        if index >= self.num_lines {
            return DisplayLine::Placeholder;
        }
        self.store.get_line(index).map_or(DisplayLine::Placeholder, DisplayLine::Loaded)
    }

    /// Pointer-driven toggle. Activation pins whatever is mounted right now.
    pub fn set_is_selection_active(&mut self, active: bool) {
        if active {
            let span = self.viewport.render().clone();
            self.selection.activate(span);
        } else {
            self.selection.deactivate();
        }
    }

    /// Pin exactly `span` (the rows the selection touches), or release with `None`.
    pub fn set_selection_span(&mut self, span: Option<Range<usize>>) {
        match span {
            Some(span) => self.selection.activate(span),
            None => self.selection.deactivate(),
        }
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionGuard {
        &self.selection
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportTracker {
        &self.viewport
    }

    #[must_use]
    pub fn pending_ranges(&self) -> &RangeSet {
        self.fetch.pending()
    }

    #[must_use]
    pub fn is_range_cached(&self, range: Range<usize>) -> bool {
        self.store.has_range(range)
    }

    #[must_use]
    pub fn cached_line_count(&self) -> usize {
        self.store.cached_line_count()
    }

    /// Wait for the next fetch task to finish. Never resolves while nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<FetchCompletion> {
        self.completion_rx.recv().await
    }

    /// Merge a finished fetch into the cache.
    ///
    /// Errors describe what was dropped. They are already logged and never
    /// leave the manager in a bad state, so callers may ignore them.
    pub fn apply_completion(&mut self, completion: FetchCompletion) -> Result<(), LogFetchError> {
        let FetchCompletion { epoch, range, result } = completion;
        if self.disposed || epoch != self.epoch {
            tracing::trace!(epoch, current = self.epoch, ?range, "discarding stale completion");
            return Err(LogFetchError::Disposed { epoch });
        }
        self.fetch.complete(range.clone());

        let mut lines = match result {
            Ok(lines) => lines,
            Err(err) => {
                let error = LogFetchError::Remote { range, message: format!("{err:#}") };
                tracing::warn!(log = self.log.id(), "{error}");
                return Err(error);
            }
        };

        let expected = range.len();
        let received = lines.len();
        let mut outcome = Ok(());
        if received < expected {
            outcome = Err(LogFetchError::ShortRead { range: range.clone(), expected, received });
        } else if received > expected {
            tracing::debug!(?range, received, "source returned extra lines, truncating");
            lines.truncate(expected);
        }
        let limit = self.num_lines.saturating_sub(range.start);
        if lines.len() > limit {
            lines.truncate(limit);
            outcome =
                Err(LogFetchError::StaleRange { range: range.clone(), num_lines: self.num_lines });
        }

        if !lines.is_empty() {
            let merged = range.start..range.start + lines.len();
            let log_type = self.log.log_type();
            let decoded = lines.into_iter().map(|raw| LogLine::decode(raw, log_type)).collect();
            self.store.merge(merged.start, decoded);
            tracing::debug!(
                log = self.log.id(),
                ?merged,
                cached = self.store.cached_line_count(),
                "merged lines"
            );
            if ranges::intersects(&merged, self.viewport.render()) {
                self.notify();
            }
        }

        if let Err(ref error) = outcome {
            tracing::warn!(log = self.log.id(), "{error}");
        }
        outcome
    }

    /// Tear down. In-flight tasks keep running but their results are dropped.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.epoch += 1;
        self.fetch.clear();
        self.selection.deactivate();
        self.on_change = None;
        tracing::debug!(log = self.log.id(), epoch = self.epoch, "log text manager disposed");
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn dispatch(&mut self, request: &FetchRequest) {
        self.fetch.mark_pending(request.range.clone());
        let source = Rc::clone(&self.source);
        let log = self.log.clone();
        let completion_tx = self.completion_tx.clone();
        let epoch = self.epoch;
        let range = request.range.clone();
        tokio::task::spawn_local(async move {
            let result = source.fetch_lines(&log, range.clone()).await;
            // The receiver lives as long as the manager; a closed channel means it was dropped.
            let _ = completion_tx.send(FetchCompletion { epoch, range, result });
        });
    }

    fn notify(&mut self) {
        if let Some(sink) = self.on_change.as_mut() {
            sink();
        }
    }
}

impl Drop for LogTextManager {
    fn drop(&mut self) {
        self.dispose();
    }
}
