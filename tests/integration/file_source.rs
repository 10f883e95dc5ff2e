// =====
// TESTS: 4
// =====
//
// The manager driven end to end over a local file.

use logtail_rs::error::AppError;
use logtail_rs::log_text::{LineStream, LogTextConfig, LogTextManager, LogType, RenderInfo};
use logtail_rs::source::{FileLogSource, LogSource};
use pretty_assertions::assert_eq;
use std::io::Write as _;
use std::rc::Rc;

use crate::helpers::{local, settle};

fn numbered_file(count: usize) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for i in 0..count {
        writeln!(file, "line {i}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn scrolled_window_loads_from_disk() {
    local(async {
        let file = numbered_file(5000);
        let source: Rc<dyn LogSource> = Rc::new(FileLogSource::new(file.path(), LogType::Text));
        let info = source.log_info("disk").await.unwrap();
        assert_eq!(info.num_lines, 5000);

        let config = LogTextConfig { download_overscan: 50, max_chunk_lines: 100, coalesce_gap: 0 };
        let mut m = LogTextManager::new(info.identity(), source, config);
        m.set_log_num_lines(info.num_lines);

        let requests = m.request_rows(&RenderInfo::new(1200..1260, 1210..1250));
        assert_eq!(requests.len(), 2);
        settle(&mut m).await;
        assert!(m.is_range_cached(1150..1310));
        assert_eq!(m.line_for_display(1234).text(), "line 1234");
        assert!(m.line_for_display(1100).is_placeholder());
    })
    .await;
}

#[tokio::test]
async fn stdio_file_lines_are_decoded() {
    local(async {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "hbuilding\nocompiling foo\neerror: oops\n").unwrap();
        file.flush().unwrap();
        let source: Rc<dyn LogSource> = Rc::new(FileLogSource::new(file.path(), LogType::Stdio));
        let info = source.log_info("stdio").await.unwrap();

        let mut m = LogTextManager::new(info.identity(), source, LogTextConfig::default());
        m.set_log_num_lines(info.num_lines);
        m.request_rows(&RenderInfo::new(0..3, 0..3));
        settle(&mut m).await;

        let streams: Vec<_> = (0..3)
            .map(|i| match m.line_for_display(i) {
                logtail_rs::log_text::DisplayLine::Loaded(line) => Some(line.stream),
                logtail_rs::log_text::DisplayLine::Placeholder => None,
            })
            .collect();
        assert_eq!(
            streams,
            vec![Some(LineStream::Header), Some(LineStream::Stdout), Some(LineStream::Stderr)]
        );
        assert_eq!(m.line_for_display(2).text(), "error: oops");
    })
    .await;
}

#[tokio::test]
async fn line_written_in_two_parts_is_cached_whole() {
    local(async {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "one\ntw").unwrap();
        file.flush().unwrap();
        let source = Rc::new(FileLogSource::new(file.path(), LogType::Text));
        let dyn_source: Rc<dyn LogSource> = Rc::clone(&source) as Rc<dyn LogSource>;
        let info = source.log_info("growing").await.unwrap();

        let mut m = LogTextManager::new(info.identity(), dyn_source, LogTextConfig::default());
        m.set_log_num_lines(info.num_lines);
        let window = RenderInfo::new(0..10, 0..10);
        m.request_rows(&window);
        settle(&mut m).await;
        assert_eq!(m.line_for_display(0).text(), "one");
        assert!(m.line_for_display(1).is_placeholder());

        write!(file, "o\nthree\n").unwrap();
        file.flush().unwrap();
        m.set_log_num_lines(source.log_info("growing").await.unwrap().num_lines);
        m.request_rows(&window);
        settle(&mut m).await;
        assert_eq!(m.num_lines(), 3);
        assert_eq!(m.line_for_display(1).text(), "two");
        assert_eq!(m.line_for_display(2).text(), "three");
    })
    .await;
}

#[tokio::test]
async fn missing_file_reports_log_not_found() {
    let source = FileLogSource::new("/nonexistent/build.log", LogType::Text);
    let err = source.log_info("missing").await.unwrap_err();
    let app_error = err.chain().find_map(|cause| cause.downcast_ref::<AppError>());
    assert_eq!(app_error, Some(&AppError::LogNotFound));
}
