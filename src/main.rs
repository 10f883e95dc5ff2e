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

use clap::Parser;
use logtail_rs::Cli;
use logtail_rs::error::AppError;
use logtail_rs::source::{FileLogSource, HttpLogSource, LogSource};
use std::fs::OpenOptions;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[allow(clippy::exit)]
fn main() {
    if let Err(err) = run() {
        if let Some(app_error) = extract_app_error(&err) {
            eprintln!("{}", app_error.user_message());
            eprintln!("{err:#}");
            std::process::exit(app_error.exit_code());
        }
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let Some(log_id) = cli.log_key() else {
        return Err(anyhow::Error::new(AppError::InvalidArguments)
            .context("no log given: pass a file path or --log-id"));
    };

    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let local_set = tokio::task::LocalSet::new();

    rt.block_on(local_set.run_until(async move {
        let source = build_source(&cli)?;

        let info_started = Instant::now();
        let info = source.log_info(&log_id).await?;
        tracing::info!(
            "Loaded log info in {:?}: {} ({}, {} lines)",
            info_started.elapsed(),
            info.name,
            info.log_type,
            info.num_lines
        );

        let mut app = logtail_rs::app::create_app(&cli, &info, Rc::clone(&source));
        logtail_rs::app::start_length_polling(
            &app,
            source,
            log_id,
            Duration::from_millis(cli.poll_interval_ms),
        );
        logtail_rs::app::run_tui(&mut app).await
    }))
}

fn build_source(cli: &Cli) -> anyhow::Result<Rc<dyn LogSource>> {
    if let Some(path) = &cli.file {
        return Ok(Rc::new(FileLogSource::new(path, cli.log_type)));
    }
    match (&cli.url, &cli.log_id) {
        (Some(url), Some(_)) => {
            let source = HttpLogSource::new(url, Duration::from_secs(cli.timeout_secs))?;
            Ok(Rc::new(source))
        }
        (None, _) => Err(anyhow::Error::new(AppError::InvalidArguments)
            .context("--log-id needs --url (or LOGTAIL_URL)")),
        (Some(_), None) => Err(anyhow::Error::new(AppError::InvalidArguments)
            .context("--url needs --log-id")),
    }
}

fn extract_app_error(err: &anyhow::Error) -> Option<AppError> {
    err.chain().find_map(|cause| cause.downcast_ref::<AppError>().cloned())
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let Some(path) = cli.log_file.as_ref() else {
        if std::env::var_os("RUST_LOG").is_some() {
            eprintln!(
                "RUST_LOG is set, but tracing is disabled without --log-file <PATH>. \
Use --log-file to enable diagnostics."
            );
        }
        return Ok(());
    };

    let directives = cli
        .log_filter
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_owned());
    let filter = tracing_subscriber::EnvFilter::try_new(directives.as_str())
        .map_err(|e| anyhow::anyhow!("invalid tracing filter `{directives}`: {e}"))?;

    let mut options = OpenOptions::new();
    options.create(true).write(true);
    if cli.log_append {
        options.append(true);
    } else {
        options.truncate(true);
    }
    let file = options
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {e}"))?;

    tracing::info!(
        target: "diagnostics",
        version = env!("CARGO_PKG_VERSION"),
        log_file = %path.display(),
        log_filter = %directives,
        log_append = cli.log_append,
        "tracing enabled"
    );

    Ok(())
}
