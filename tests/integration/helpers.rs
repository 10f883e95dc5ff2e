use logtail_rs::log_text::{LogIdentity, LogTextConfig, LogTextManager, LogType};
use logtail_rs::source::{LogInfo, LogSource};
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::ops::Range;
use std::rc::Rc;

/// In-memory log that records every fetch it serves.
#[derive(Default)]
pub struct ScriptedSource {
    lines: RefCell<Vec<String>>,
    calls: RefCell<Vec<Range<usize>>>,
    failing: Cell<bool>,
}

impl ScriptedSource {
    pub fn with_lines(count: usize) -> Rc<Self> {
        let source = Rc::new(Self::default());
        source.append(count);
        source
    }

    pub fn append(&self, count: usize) {
        let mut lines = self.lines.borrow_mut();
        let start = lines.len();
        lines.extend((start..start + count).map(|i| format!("line {i}")));
    }

    pub fn calls(&self) -> Vec<Range<usize>> {
        self.calls.borrow().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }
}

#[async_trait::async_trait(?Send)]
impl LogSource for ScriptedSource {
    async fn log_info(&self, id: &str) -> anyhow::Result<LogInfo> {
        Ok(LogInfo {
            id: id.to_owned(),
            name: format!("{id}.log"),
            log_type: LogType::Text,
            num_lines: self.lines.borrow().len(),
        })
    }

    async fn fetch_lines(
        &self,
        _log: &LogIdentity,
        range: Range<usize>,
    ) -> anyhow::Result<Vec<String>> {
        self.calls.borrow_mut().push(range.clone());
        if self.failing.get() {
            anyhow::bail!("503 Service Unavailable");
        }
        let lines = self.lines.borrow();
        let end = range.end.min(lines.len());
        Ok(lines.get(range.start..end).map(<[String]>::to_vec).unwrap_or_default())
    }
}

pub fn config(download_overscan: usize, max_chunk_lines: usize) -> LogTextConfig {
    LogTextConfig { download_overscan, max_chunk_lines, coalesce_gap: 0 }
}

/// Manager over `source` that already knows the source's current length.
pub fn manager(source: &Rc<ScriptedSource>, config: LogTextConfig) -> LogTextManager {
    let num_lines = source.lines.borrow().len();
    let dyn_source: Rc<dyn LogSource> = Rc::clone(source) as Rc<dyn LogSource>;
    let mut manager =
        LogTextManager::new(LogIdentity::new("build", LogType::Text), dyn_source, config);
    manager.set_log_num_lines(num_lines);
    manager
}

/// Apply completions until nothing is in flight. Returns how many were applied.
pub async fn settle(manager: &mut LogTextManager) -> usize {
    let mut applied = 0;
    while !manager.pending_ranges().is_empty() {
        let Some(completion) = manager.next_completion().await else {
            break;
        };
        let _ = manager.apply_completion(completion);
        applied += 1;
    }
    applied
}

/// Run `future` inside a `LocalSet` so `spawn_local` fetches can make progress.
pub async fn local<F: Future>(future: F) -> F::Output {
    tokio::task::LocalSet::new().run_until(future).await
}
