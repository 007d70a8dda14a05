#![deny(missing_docs)]
//! Shared logging utilities for the gallery workspace.
//!
//! This crate provides the `engine_*` logging macros used across the codebase,
//! the [`EventLog`] capability injected into the run pipeline, and a minimal
//! test initializer for the global logger.

use std::error::Error;
use std::sync::Mutex;

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Logging capability handed to pipeline components.
///
/// Components never write log files themselves; the binary decides where
/// facade output ends up, and tests swap in [`MemoryLog`].
pub trait EventLog: Send + Sync {
    /// Records a progress message.
    fn info(&self, message: &str);
    /// Records a recoverable problem.
    fn warn(&self, message: &str);
    /// Records a failure, optionally with the error that caused it.
    fn error(&self, message: &str, detail: Option<&(dyn Error + 'static)>);
}

/// Renders an error and its `source()` chain as `outer: inner: root`.
pub fn render_error_chain(err: &(dyn Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        current = cause.source();
    }
    rendered
}

fn compose(message: &str, detail: Option<&(dyn Error + 'static)>) -> String {
    match detail {
        Some(err) => format!("{message}: {}", render_error_chain(err)),
        None => message.to_string(),
    }
}

/// [`EventLog`] that forwards to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct FacadeLog;

impl EventLog for FacadeLog {
    fn info(&self, message: &str) {
        engine_info!("{}", message);
    }

    fn warn(&self, message: &str) {
        engine_warn!("{}", message);
    }

    fn error(&self, message: &str, detail: Option<&(dyn Error + 'static)>) {
        engine_error!("{}", compose(message, detail));
    }
}

/// Severity of a recorded [`LogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Progress message.
    Info,
    /// Recoverable problem.
    Warn,
    /// Failure.
    Error,
}

/// One message captured by [`MemoryLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity.
    pub level: LogLevel,
    /// Message text, including the rendered error chain for errors.
    pub message: String,
}

/// [`EventLog`] that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all entries recorded so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// True if any entry at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.entries()
            .iter()
            .any(|entry| entry.level == level && entry.message.contains(needle))
    }

    fn push(&self, level: LogLevel, message: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(LogEntry { level, message });
        }
    }
}

impl EventLog for MemoryLog {
    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message.to_string());
    }

    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message.to_string());
    }

    fn error(&self, message: &str, detail: Option<&(dyn Error + 'static)>) {
        self.push(LogLevel::Error, compose(message, detail));
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
