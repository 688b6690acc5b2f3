//----------------------------------------------------------------------------------------- std lib
use std::io::Write;
use std::time::Instant;
//--------------------------------------------------------------------------------- other libraries
use log::info;
use once_cell::sync::Lazy;
use tracing_subscriber::{EnvFilter, Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

use crate::format_duration;

// This will get initialized below.
/// Returns the init [`Instant`]
pub static INIT_INSTANT: Lazy<Instant> = Lazy::new(Instant::now);

/// The crates whose logs are shown when `RUST_LOG` is not set.
const LOGGED_CRATES: [&str; 3] = [
    "discotheque_cli",
    "discotheque_core",
    "discotheque_storage",
];

/// Width of the source path column of a log line.
const PATH_WIDTH: usize = 37;
/// Width of the line number column of a log line.
const LINE_WIDTH: usize = 3;

/// The environment variable holding the filter for [`init_tracing`].
pub const TRACE_ENV: &str = "DISCOTHEQUE_TRACE";

//---------------------------------------------------------------------------------------------------- Logger init function
#[allow(clippy::module_name_repetitions)]
/// Initializes the logger.
///
/// This enables console logging on all the internals of `Discotheque`.
///
/// Functionality is provided by [`log`].
///
/// The levels are:
/// - ERROR
/// - WARN
/// - INFO
/// - DEBUG
/// - TRACE
///
/// If `RUST_LOG` is set it is used as is, otherwise only the discotheque crates log, at `filter`.
///
/// # Panics
/// This must only be called _once_.
#[cfg(not(tarpaulin_include))]
pub fn init_logger(filter: log::LevelFilter) {
    // Initialize timer.
    let now = Lazy::force(&INIT_INSTANT);

    let env = std::env::var("RUST_LOG").ok().filter(|e| !e.is_empty());

    let mut builder = env_logger::Builder::new();
    if let Some(env) = &env {
        builder.parse_filters(env);
    } else {
        builder.filter_level(log::LevelFilter::Off);
        for krate in LOGGED_CRATES {
            builder.filter_module(krate, filter);
        }
    }

    builder
        .format(move |buf, record| {
            let style = buf.default_level_style(record.level()).bold();
            let dimmed = env_logger::fmt::style::Style::new().dimmed();
            let level = match record.level() {
                log::Level::Debug => "D",
                log::Level::Trace => "T",
                log::Level::Info => "I",
                log::Level::Warn => "W",
                log::Level::Error => "E",
            };
            writeln!(
                buf,
                // Longest PATH in the repo: `storage/src/db/schemas/composition.rs` - `37` characters
                // Longest file in the repo: `cli/src/handlers/smoke_tests.rs` - `3` digits
                //
                //      Longest PATH ---|        |--- Longest file
                //                      |        |
                //                      v        v
                "| {style}{level}{style:#} | {dimmed}{}{dimmed:#} | {dimmed}{: >PATH_WIDTH$} @ {: <LINE_WIDTH$}{dimmed:#} | {}",
                format_duration(&now.elapsed()),
                record.file_static().unwrap_or("???"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .write_style(env_logger::WriteStyle::Auto)
        .init();

    match env {
        Some(env) => info!("Log Level (RUST_LOG) ... {env}"),
        None => info!("Log Level (Flag) ... {filter}"),
    }
}

/// Initializes the tracing layer.
///
/// Spans and events are written to stderr, filtered by the [`TRACE_ENV`] environment variable
/// (using the `RUST_LOG` syntax). Nothing is written when it is unset.
#[must_use]
pub fn init_tracing() -> impl tracing::Subscriber {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .with_env_var(TRACE_ENV)
        .from_env_lossy();

    tracing_subscriber::registry().with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(filter),
    )
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    fn source_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                source_files(&path, files)?;
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
        Ok(())
    }

    #[test]
    fn test_log_columns_fit_every_source_file() -> anyhow::Result<()> {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .ok_or_else(|| anyhow::anyhow!("core has no parent directory"))?;

        let mut files = Vec::new();
        for krate in LOGGED_CRATES {
            let dir = krate.trim_start_matches("discotheque_");
            source_files(&root.join(dir).join("src"), &mut files)?;
        }
        assert!(!files.is_empty());

        for file in files {
            let path = file.strip_prefix(root)?.display().to_string();
            let lines = std::fs::read_to_string(&file)?.lines().count();
            assert!(path.len() <= PATH_WIDTH, "{path} is longer than {PATH_WIDTH} characters");
            assert!(
                lines.to_string().len() <= LINE_WIDTH,
                "{path} has more than {LINE_WIDTH} digits worth of lines"
            );
        }
        Ok(())
    }
}
