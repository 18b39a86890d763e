//! File logging for the journal.
//!
//! # Responsibility
//! - Start one rolling log under `<root>/logs` per process.
//! - Record metadata only: ids, counts and outcomes. Item descriptions and
//!   panic payloads are never written.
//!
//! # Invariants
//! - Repeating `init_logging` with the same settings is a no-op.
//! - Switching directory or level after start is rejected.
//! - Records are written directly so nothing is lost when a short-lived
//!   command exits.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "bojo";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const KEPT_LOG_FILES: usize = 3;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Failure to start file logging. Callers treat this as non-fatal.
#[derive(Debug)]
pub enum LoggingError {
    InvalidLevel(String),
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Start(FlexiLoggerError),
    /// Logging already runs with different settings.
    Conflict {
        active_level: &'static str,
        active_dir: PathBuf,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(reason) => write!(f, "{reason}"),
            Self::CreateDir { path, source } => {
                write!(f, "cannot create log directory `{}`: {source}", path.display())
            }
            Self::Start(err) => write!(f, "cannot start logger: {err}"),
            Self::Conflict {
                active_level,
                active_dir,
            } => write!(
                f,
                "logging already active at `{}` with level `{active_level}`",
                active_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Start(err) => Some(err),
            Self::InvalidLevel(_) | Self::Conflict { .. } => None,
        }
    }
}

/// Starts rolling file logs in `log_dir` at `level`.
///
/// A relative `log_dir` is taken from the current directory.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), LoggingError> {
    let level = normalize_level(level).map_err(LoggingError::InvalidLevel)?;
    let log_dir = absolute(log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start(level, &log_dir))?;
    if active.level != level || active.log_dir != log_dir {
        return Err(LoggingError::Conflict {
            active_level: active.level,
            active_dir: active.log_dir.clone(),
        });
    }
    Ok(())
}

/// Returns `(level, log_dir)` once logging has started.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

/// `debug` for debug builds, `warn` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    }
}

pub(crate) fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" | "none" => Ok("off"),
        other => Err(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        )),
    }
}

fn absolute(dir: &Path) -> Result<PathBuf, LoggingError> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .map_err(|source| LoggingError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}

fn start(level: &'static str, log_dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(log_dir).map_err(|source| LoggingError::CreateDir {
        path: log_dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::try_with_str(level)
        .map_err(LoggingError::Start)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEPT_LOG_FILES),
        )
        .write_mode(WriteMode::Direct)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(LoggingError::Start)?;

    log_panics();
    info!(
        "event=logging_started module=core status=ok version={} pid={}",
        env!("CARGO_PKG_VERSION"),
        std::process::id()
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.to_path_buf(),
        _handle: handle,
    })
}

// Called once, from inside the `ACTIVE` initializer.
fn log_panics() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!("event=panic module=core status=error location={location}");
        previous(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::{absolute, init_logging, logging_status, normalize_level, LoggingError};
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(suffix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "bojo-logging-{suffix}-{}-{nanos}",
            std::process::id()
        ))
    }

    #[test]
    fn levels_normalize_case_and_aliases() {
        assert_eq!(normalize_level("INFO").expect("INFO"), "info");
        assert_eq!(normalize_level(" warning ").expect("warning"), "warn");
        assert_eq!(normalize_level("none").expect("none"), "off");
        assert!(normalize_level("loud").is_err());
    }

    #[test]
    fn relative_dirs_are_anchored_at_cwd() {
        let resolved = absolute(Path::new("logs")).expect("cwd is readable");
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("logs"));
    }

    #[test]
    fn unknown_level_is_rejected_before_start() {
        let err = init_logging("loud", &unique_temp_dir("invalid")).expect_err("bad level");
        assert!(matches!(err, LoggingError::InvalidLevel(_)));
    }

    #[test]
    fn repeat_init_is_noop_and_changes_conflict() {
        let first = unique_temp_dir("active");
        let second = unique_temp_dir("other");

        init_logging("info", &first).expect("first init should succeed");
        init_logging("INFO", &first).expect("same settings should be accepted");

        let err = init_logging("debug", &first).expect_err("level change should fail");
        assert!(matches!(err, LoggingError::Conflict { active_level: "info", .. }));
        assert!(init_logging("info", &second).is_err());

        let (level, dir) = logging_status().expect("logging should be active");
        assert_eq!(level, "info");
        assert_eq!(dir, first);
        assert!(first.is_dir());
    }
}
