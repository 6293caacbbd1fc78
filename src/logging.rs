use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

/// Log file name inside the data directory
pub const LOG_FILE: &str = "daylist.log";

/// Route `tracing` output to `<data_dir>/daylist.log`.
///
/// Stdout belongs to the TUI and to `--json` output, so nothing is ever
/// logged there. The filter comes from `DAYLIST_LOG`, then `RUST_LOG`,
/// defaulting to `info`. Calling this twice is harmless.
pub fn init(data_dir: &Path) {
    if std::fs::create_dir_all(data_dir).is_err() {
        return;
    }
    let filter = std::env::var("DAYLIST_LOG")
        .ok()
        .and_then(|v| EnvFilter::try_new(v).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(data_dir)
    {
        Ok(a) => a,
        Err(_) => return,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(appender)
        .with_ansi(false)
        .with_env_filter(filter)
        .try_init();
}
