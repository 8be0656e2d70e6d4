use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "blocksync.log";

/// Keeps the non-blocking writer alive; drop it last so buffered lines are flushed.
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Installs the global subscriber. Logs go to a daily rolling file under `log_dir`, or to
/// stderr when no directory is given.
pub fn init(log_dir: Option<&Path>) -> Option<LoggingGuard> {
    let (writer, guard, log_dir) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).ok()?;
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_NAME);
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            (writer, guard, Some(dir.to_path_buf()))
        }
        None => {
            let (writer, guard) = tracing_appender::non_blocking(io::stderr());
            (writer, guard, None)
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blocksync=info"));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    match &log_dir {
        Some(dir) => tracing::info!(log_dir = %dir.display(), "tracing initialized"),
        None => tracing::info!("tracing initialized on stderr"),
    }

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
