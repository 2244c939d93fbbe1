//! File-backed tracing setup. The terminal itself belongs to the TUI, so log
//! events go to `~/.moodlog/moodlog.log` instead of stdout. Storage failures
//! in particular are only ever reported here; nothing surfaces to the user,
//! the session just continues in memory.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Log file name inside the application data directory.
const LOG_FILE_NAME: &str = "moodlog.log";
/// Environment variable consulted for the filter, e.g. `MOODLOG_LOG=debug`.
const LOG_ENV_VAR: &str = "MOODLOG_LOG";

/// Install the global tracing subscriber writing to the data-dir log file.
///
/// Every failure mode here is swallowed: observability is optional, and a
/// read-only home directory must not keep the journal from starting.
pub fn init_logging() {
    let Ok(dir) = crate::store::data_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
    else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
