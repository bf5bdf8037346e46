use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{LogLevel, LoggingConfig};

/// Target the simulated e-mails are written to
pub const NOTIFY_TARGET: &str = "sqldraft::notify";

/// Build the filter for a configured level. `RUST_LOG` wins when set.
///
/// [`NOTIFY_TARGET`] never drops below `info`, so notifications show at the default level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(config.level)))
}

fn directives(level: LogLevel) -> String {
    match level {
        LogLevel::Warn | LogLevel::Error => format!("sqldraft={level},{NOTIFY_TARGET}=info"),
        _ => format!("sqldraft={level}"),
    }
}

/// Initialize the logging system.
///
/// Console output goes to stderr so scripts printed on stdout stay clean. The returned guard
/// flushes the log file on drop and must be kept alive for the life of the program.
pub fn init(config: &LoggingConfig) -> io::Result<Option<WorkerGuard>> {
    let console_layer = config
        .console_output
        .then(|| fmt::layer().with_writer(io::stderr).with_target(false));

    let (file_layer, guard) = if config.file_output {
        let path = Path::new(&config.file_path);
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path.file_name().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "log file path has no file name")
        })?;
        std::fs::create_dir_all(dir)?;

        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = fmt::layer().with_writer(writer).with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(guard)
}
