use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Default level for this crate when `RUST_LOG` is unset
/// * `verbose` - Force DEBUG regardless of `level`
/// * `log_file` - Optional path to a JSON log file. If None, logs only to stderr
pub fn init(level: &str, verbose: bool, log_file: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level, verbose)));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    if let Some(log_path) = log_file {
        let directory = log_path.parent().unwrap_or_else(|| Path::new("."));
        let _ = std::fs::create_dir_all(directory);

        let file_appender = tracing_appender::rolling::never(
            directory,
            log_path
                .file_name()
                .unwrap_or_else(|| std::ffi::OsStr::new("noteboard.log")),
        );

        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .json();

        // A subscriber may already be installed (tests, embedding apps)
        let _ = subscriber.with(file_layer).try_init();
    } else {
        let _ = subscriber.try_init();
    }
}

fn default_directive(level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { level };
    format!("noteboard={}", level)
}
