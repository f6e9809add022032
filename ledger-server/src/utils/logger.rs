//! Logging Infrastructure
//!
//! Console output is always on. With a log directory configured, two daily
//! rotating files are added:
//! - `app/app.YYYY-MM-DD` for everything except the `security` target
//! - `security/security.YYYY-MM-DD` for authentication events only

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "ledger_server=info,tower_http=info";

/// Initialize the logger (console only)
pub fn init_logger() -> anyhow::Result<()> {
    init_logger_with_file(false, None)
}

/// Initialize the logger with optional JSON console output and file output
///
/// # Examples
/// ```no_run
/// // Development: console only
/// ledger_server::init_logger_with_file(false, None)?;
///
/// // Production: JSON console + rotating files
/// ledger_server::init_logger_with_file(true, Some("./data/logs"))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger_with_file(json_format: bool, log_dir: Option<&str>) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = if json_format {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().with_target(false).boxed()
    };

    let (app_layer, security_layer) = match log_dir {
        Some(dir) => {
            let log_dir = Path::new(dir);
            let app_dir = log_dir.join("app");
            let security_dir = log_dir.join("security");
            fs::create_dir_all(&app_dir)?;
            fs::create_dir_all(&security_dir)?;

            let app_log = RollingFileAppender::new(Rotation::DAILY, app_dir, "app");
            let app_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(app_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() != "security"
                }));

            let security_log =
                RollingFileAppender::new(Rotation::DAILY, security_dir, "security");
            let security_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(std::sync::Mutex::new(security_log))
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() == "security"
                }));

            (Some(app_layer), Some(security_layer))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(app_layer)
        .with(security_layer)
        .try_init()?;

    Ok(())
}
