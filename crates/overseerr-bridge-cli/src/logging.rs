use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

// -v silences the per-connection chatter of hyper and reqwest's pool
const DEBUG_FILTER: &str = "debug,hyper=info,hyper_util=info,reqwest::connect=info";

fn env_filter(verbose_level: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    let default = match verbose_level {
        0 => "info",
        1 => DEBUG_FILTER,
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

fn json_requested() -> bool {
    std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| !io::stdout().is_terminal())
}

pub fn init_logging(verbose_level: u8, quiet: bool) -> Result<()> {
    let registry = Registry::default().with(env_filter(verbose_level, quiet));

    if json_requested() {
        registry
            .with(fmt::layer().json().with_timer(ChronoUtc::rfc_3339()).with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_timer(ChronoUtc::rfc_3339()).with_writer(io::stderr))
            .init();
    }

    Ok(())
}

/// Log to a daily-rotated file instead of stderr.
///
/// `overseerr-bridge.log` rotates into `overseerr-bridge.2026-01-17` and so on.
pub fn init_logging_to_file(verbose_level: u8, quiet: bool, log_path: &Path) -> Result<()> {
    let log_dir = log_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    std::fs::create_dir_all(log_dir)?;

    let prefix = log_path
        .file_stem()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename: {}", log_path.display()))?;
    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, prefix);

    let registry = Registry::default().with(env_filter(verbose_level, quiet));

    if json_requested() {
        registry
            .with(fmt::layer().json().with_timer(ChronoUtc::rfc_3339()).with_writer(appender))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(appender),
            )
            .init();
    }

    Ok(())
}
