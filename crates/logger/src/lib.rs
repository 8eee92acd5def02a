//! Logging infrastructure for teditor.
//!
//! Provides a thread-safe logger with file output and in-memory storage of
//! recent entries. It is installed as the backend of the `log` facade, so
//! every crate logs with the regular `log::info!` family of macros.

use chrono::Local;
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write as IoWrite;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

/// Log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Timestamp in HH:MM:SS format
    pub timestamp: String,
    /// Message level
    pub level: LogLevel,
    /// Message text
    pub message: String,
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Convert log level to string
    pub fn to_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Most verbose `log` filter that still passes this level
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            // Trace is folded into Debug
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

/// Global logger state
#[derive(Debug)]
struct Logger {
    /// Debug log (last N messages)
    entries: VecDeque<LogEntry>,
    /// Maximum number of entries in log
    max_entries: usize,
    /// Minimum log level to record
    min_level: LogLevel,
    /// Log file path
    file_path: PathBuf,
}

impl Logger {
    /// Create new logger instance
    fn new(file_path: PathBuf, max_entries: usize, min_level: LogLevel) -> Self {
        // Create parent directory if it doesn't exist
        if let Some(parent) = file_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        // Clear log file on startup
        if let Ok(mut file) = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
        {
            let _ = writeln!(file, "=== teditor log start ===");
        }

        Self {
            entries: VecDeque::new(),
            max_entries,
            min_level,
            file_path,
        }
    }

    /// Add entry to log
    fn add_entry(&mut self, level: LogLevel, message: String) {
        // Filter by minimum level
        if level < self.min_level {
            return;
        }

        let timestamp = Local::now().format("%H:%M:%S").to_string();

        // Write to file (create if deleted)
        if let Ok(mut file) = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.file_path)
        {
            let _ = writeln!(file, "[{}] {}: {}", timestamp, level.to_str(), message);
        }

        self.entries.push_back(LogEntry {
            timestamp,
            level,
            message,
        });

        // Limit queue size
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Get all log entries
    fn get_entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }
}

/// Global logger instance that persists for the application lifetime.
static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

/// Bridge from the `log` facade to the global logger.
struct Facade;

static FACADE: Facade = Facade;

impl log::Log for Facade {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        LOGGER
            .get()
            .and_then(|logger| logger.lock().ok())
            .is_some_and(|logger| LogLevel::from(metadata.level()) >= logger.min_level)
    }

    fn log(&self, record: &log::Record<'_>) {
        if let Some(Ok(mut logger)) = LOGGER.get().map(Mutex::lock) {
            logger.add_entry(record.level().into(), record.args().to_string());
        }
    }

    fn flush(&self) {}
}

/// Initialize the global logger and install it behind the `log` macros.
///
/// Must be called once at application startup.
/// Subsequent calls will be ignored.
///
/// # Arguments
///
/// * `file_path` - Path to the log file
/// * `max_entries` - Maximum number of log entries to keep in memory
/// * `min_level` - Minimum log level to record (Debug, Info, Warn, Error)
pub fn init(file_path: PathBuf, max_entries: usize, min_level: LogLevel) {
    if LOGGER
        .set(Mutex::new(Logger::new(file_path, max_entries, min_level)))
        .is_err()
    {
        return;
    }
    if log::set_logger(&FACADE).is_ok() {
        log::set_max_level(min_level.to_level_filter());
    }
}

/// Set minimum log level dynamically
///
/// Updates the minimum log level filter.
/// Logs below this level will be ignored.
pub fn set_min_level(level: LogLevel) {
    if let Some(Ok(mut logger)) = LOGGER.get().map(Mutex::lock) {
        logger.min_level = level;
        log::set_max_level(level.to_level_filter());
    }
}

/// Get all log entries
///
/// Returns a snapshot of the entries currently stored in memory,
/// or nothing when the logger was never initialized.
pub fn entries() -> Vec<LogEntry> {
    match LOGGER.get().map(Mutex::lock) {
        Some(Ok(logger)) => logger.get_entries(),
        _ => Vec::new(),
    }
}
