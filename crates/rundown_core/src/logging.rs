//! Core logging bootstrap and safety policy.
//!
//! # Responsibility
//! - Initialize logging exactly once per process, to stderr or to
//!   size-rotated files.
//! - Emit stable, single-line `key=value` diagnostic events.
//!
//! # Invariants
//! - Logging init is idempotent for the same level and destination.
//! - Logging initialization must not panic.
//! - Re-initialization with a different level or destination is rejected.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_FILE_BASENAME: &str = "rundown";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

/// Where log records go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Absolute directory holding rotated `rundown*.log` files.
    Directory(PathBuf),
}

impl Display for LogTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stderr => f.write_str("stderr"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

struct LoggingState {
    level: LevelFilter,
    target: LogTarget,
    _logger: LoggerHandle,
}

/// Initializes logging with `level`, writing to `log_dir` when given and to
/// stderr otherwise.
///
/// # Errors
/// - Returns an error when `level` is unsupported.
/// - Returns an error when `log_dir` is empty, non-absolute, or cannot be created.
/// - Returns an error when logging is already active with another level or
///   destination, or when the backend fails to start.
pub fn init_logging(level: &str, log_dir: Option<&str>) -> Result<(), String> {
    let level = parse_level(level)?;
    let target = match log_dir {
        Some(dir) => LogTarget::directory(dir)?,
        None => LogTarget::Stderr,
    };

    let state = LOGGING_STATE.get_or_try_init(|| start_logger(level, target.clone()))?;

    if state.target != target {
        return Err(format!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.target, target
        ));
    }
    if state.level != level {
        return Err(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        ));
    }

    Ok(())
}

/// Returns `(level, target)` when logging is active.
pub fn logging_status() -> Option<(LevelFilter, LogTarget)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.target.clone()))
}

/// Returns the default log level for current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: LevelFilter, target: LogTarget) -> Result<LoggingState, String> {
    let spec = level.as_str().to_ascii_lowercase();
    let logger = Logger::try_with_str(&spec)
        .map_err(|err| format!("invalid log level `{spec}`: {err}"))?;

    let logger = match &target {
        LogTarget::Stderr => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::detailed_format),
        LogTarget::Directory(dir) => {
            std::fs::create_dir_all(dir).map_err(|err| {
                format!("failed to create log directory `{}`: {err}", dir.display())
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
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
        }
    };

    let handle = logger
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook_once();

    info!(
        "event=app_start module=core status=ok platform={} build_mode={} version={}",
        std::env::consts::OS,
        build_mode(),
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "event=logging_init module=core status=ok level={} target={}",
        level, target
    );

    Ok(LoggingState {
        level,
        target,
        _logger: handle,
    })
}

/// Accepts the `log` level names (any case) plus `warning`; `off` is refused.
fn parse_level(level: &str) -> Result<LevelFilter, String> {
    let trimmed = level.trim();
    let name = if trimmed.eq_ignore_ascii_case("warning") {
        "warn"
    } else {
        trimmed
    };
    match LevelFilter::from_str(name) {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{trimmed}`; expected trace|debug|info|warn|error"
        )),
        Ok(filter) => Ok(filter),
    }
}

impl LogTarget {
    /// Validates a `--log-dir` value: non-empty and absolute.
    fn directory(raw: &str) -> Result<Self, String> {
        let path = Path::new(raw.trim());
        if path.as_os_str().is_empty() {
            return Err("log directory cannot be empty".to_string());
        }
        if path.is_relative() {
            return Err(format!(
                "log directory must be an absolute path, got `{}`",
                path.display()
            ));
        }
        Ok(Self::Directory(path.to_path_buf()))
    }
}

fn build_mode() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn install_panic_hook_once() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info.location().map_or_else(
                || "unknown".to_string(),
                |loc| format!("{}:{}", loc.file(), loc.line()),
            );
            let payload = panic_info
                .payload()
                .downcast_ref::<&str>()
                .copied()
                .or_else(|| panic_info.payload().downcast_ref::<String>().map(String::as_str))
                .unwrap_or("non-string panic payload");
            // Payload may echo story text; keep it on one line and capped.
            error!(
                "event=panic_captured module=core status=error location={} payload={}",
                location,
                one_line(payload, MAX_PANIC_PAYLOAD_CHARS)
            );
            previous_hook(panic_info);
        }));
    });
}

/// Replaces control chars with spaces and caps the length, marking cuts with `...`.
fn one_line(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let mut line: String = chars
        .by_ref()
        .take(max_chars)
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();
    if chars.next().is_some() {
        line.push_str("...");
    }
    line
}
