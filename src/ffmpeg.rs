//! FFmpeg native log-level control.
//!
//! FFmpeg has its own logging system, separate from the Rust `log` crate,
//! and prints warnings to stderr by default — noisy for library users and
//! tests. This thin wrapper exposes the level without requiring callers to
//! import `ffmpeg-next` directly. It controls FFmpeg's console output only;
//! Rust-side diagnostics go through the `log` crate as usual.

use ffmpeg_next::util::log::Level;

/// FFmpeg internal log verbosity, most quiet to most verbose.
///
/// Maps directly to FFmpeg's `AV_LOG_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Print nothing at all.
    Quiet,
    /// Unrecoverable conditions that abort the process.
    Panic,
    /// Unrecoverable errors (the context becomes invalid).
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Verbose informational messages.
    Verbose,
    /// Debugging messages.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

impl LogLevel {
    fn to_native(self) -> Level {
        match self {
            LogLevel::Quiet => Level::Quiet,
            LogLevel::Panic => Level::Panic,
            LogLevel::Fatal => Level::Fatal,
            LogLevel::Error => Level::Error,
            LogLevel::Warning => Level::Warning,
            LogLevel::Info => Level::Info,
            LogLevel::Verbose => Level::Verbose,
            LogLevel::Debug => Level::Debug,
            LogLevel::Trace => Level::Trace,
        }
    }

    fn from_native(level: Level) -> Self {
        match level {
            Level::Quiet => LogLevel::Quiet,
            Level::Panic => LogLevel::Panic,
            Level::Fatal => LogLevel::Fatal,
            Level::Error => LogLevel::Error,
            Level::Warning => LogLevel::Warning,
            Level::Info => LogLevel::Info,
            Level::Verbose => LogLevel::Verbose,
            Level::Debug => LogLevel::Debug,
            Level::Trace => LogLevel::Trace,
        }
    }

    /// Parse a level from its lowercase name (CLI input).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "quiet" => Some(LogLevel::Quiet),
            "panic" => Some(LogLevel::Panic),
            "fatal" => Some(LogLevel::Fatal),
            "error" => Some(LogLevel::Error),
            "warning" => Some(LogLevel::Warning),
            "info" => Some(LogLevel::Info),
            "verbose" => Some(LogLevel::Verbose),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Set the FFmpeg internal log verbosity level.
pub fn set_native_log_level(level: LogLevel) {
    ffmpeg_next::util::log::set_level(level.to_native());
}

/// Get the current FFmpeg internal log verbosity level.
///
/// Returns `None` if the current native level does not map to a known
/// variant.
pub fn native_log_level() -> Option<LogLevel> {
    ffmpeg_next::util::log::get_level()
        .ok()
        .map(LogLevel::from_native)
}
