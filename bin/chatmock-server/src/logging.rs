//! Tracing subscriber setup.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "chatmock-server.log";

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. The returned guard flushes the
/// log file on drop and must live as long as the process.
pub fn init(cfg: &Config) -> Option<WorkerGuard> {
    let env_filter = build_filter(cfg.effective_log_level());

    let console = if cfg.log_json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer().with_target(true).with_thread_ids(true).boxed()
    };

    let (file, guard) = match &cfg.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    guard
}

fn build_filter(configured: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    match configured.parse::<EnvFilter>() {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!(
                "WARN: log level '{configured}' is not a valid tracing filter ({e}); \
                 falling back to 'info'"
            );
            EnvFilter::new("info")
        }
    }
}
