//! Rolling file logging for planner processes.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend once per process, writing to
//!   `<log_dir>/lazyplan*.log`.
//! - Record startup metadata and panics as `event=... module=...` lines.
//!
//! # Invariants
//! - Repeating `init_logging` with the same level and directory is a no-op.
//! - Switching level or directory after start is refused, never applied.
//! - Nothing in here panics.
//!
//! Logging is optional: callers that never initialize it get the `log`
//! facade's silent default.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "lazyplan";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_PAYLOAD_CHARS: usize = 200;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Logging bootstrap failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// Level is not one of trace|debug|info|warn|error.
    UnsupportedLevel(String),
    /// Directory is blank or could not be resolved/created.
    InvalidDirectory(String),
    /// Logging is already running with a different level or directory.
    Conflict(String),
    /// `flexi_logger` refused to start.
    Backend(String),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDirectory(details) => write!(f, "invalid log directory: {details}"),
            Self::Conflict(details) => write!(f, "logging already initialized; {details}"),
            Self::Backend(details) => write!(f, "failed to start logger: {details}"),
        }
    }
}

impl Error for LoggingError {}

/// Starts file logging at `level` under `log_dir`.
///
/// Relative directories are resolved against the current working directory.
///
/// # Errors
/// - `UnsupportedLevel` for unknown level names.
/// - `InvalidDirectory` when the directory is blank or cannot be created.
/// - `Conflict` when already running with another level or directory.
/// - `Backend` when the logger itself fails to start.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    let log_dir = resolve_log_dir(log_dir.as_ref())?;

    let active = ACTIVE.get_or_try_init(|| start(level, &log_dir))?;
    if active.log_dir != log_dir {
        return Err(LoggingError::Conflict(format!(
            "running at `{}`, refusing `{}`",
            active.log_dir.display(),
            log_dir.display()
        )));
    }
    if active.level != level {
        return Err(LoggingError::Conflict(format!(
            "running at level `{}`, refusing `{level}`",
            active.level
        )));
    }
    Ok(())
}

fn start(level: &'static str, log_dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|err| {
        LoggingError::InvalidDirectory(format!("cannot create `{}`: {err}", log_dir.display()))
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();

    info!(
        "event=app_start module=logging status=ok platform={} version={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "event=logging_init module=logging status=ok level={level} log_dir={}",
        log_dir.display()
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

/// `(level, log_dir)` of the running logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(LoggingError::UnsupportedLevel(other.to_string())),
    }
}

fn resolve_log_dir(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    if log_dir.as_os_str().is_empty() || log_dir.to_string_lossy().trim().is_empty() {
        return Err(LoggingError::InvalidDirectory("path is empty".to_string()));
    }
    if log_dir.is_absolute() {
        return Ok(log_dir.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(log_dir))
        .map_err(|err| LoggingError::InvalidDirectory(format!("no working directory: {err}")))
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic_captured module=logging status=error location={location} payload={}",
            single_line(&payload, MAX_PANIC_PAYLOAD_CHARS)
        );
        previous(panic_info);
    }));
}

// Panic payloads may carry user text (titles, note content); keep them to one
// bounded line.
fn single_line(value: &str, max_chars: usize) -> String {
    let flattened = value.replace(['\n', '\r'], " ");
    let mut line = flattened.chars().take(max_chars).collect::<String>();
    if flattened.chars().count() > max_chars {
        line.push_str("...");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, logging_status, normalize_level, resolve_log_dir, single_line, LoggingError,
    };
    use std::path::Path;

    #[test]
    fn level_names_normalize() {
        assert_eq!(normalize_level(" WARNING ").unwrap(), "warn");
        assert_eq!(
            normalize_level("loud").unwrap_err(),
            LoggingError::UnsupportedLevel("loud".to_string())
        );
    }

    #[test]
    fn relative_directory_resolves_against_cwd() {
        let resolved = resolve_log_dir(Path::new("logs")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("logs"));
        assert!(resolve_log_dir(Path::new("  ")).is_err());
    }

    #[test]
    fn single_line_flattens_and_truncates() {
        let line = single_line("Pack boxes\nCall movers", 10);
        assert_eq!(line, "Pack boxes...");
    }

    #[test]
    fn init_is_idempotent_and_refuses_changes() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();

        init_logging("info", first.path()).unwrap();
        init_logging("INFO", first.path()).unwrap();
        assert!(matches!(
            init_logging("debug", first.path()),
            Err(LoggingError::Conflict(_))
        ));
        assert!(matches!(
            init_logging("info", second.path()),
            Err(LoggingError::Conflict(_))
        ));

        let (level, dir) = logging_status().unwrap();
        assert_eq!(level, "info");
        assert_eq!(dir, first.path());
    }
}
