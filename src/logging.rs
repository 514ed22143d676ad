/// Structured logging for the site workability monitor
///
/// Provides context-rich logging with site identifiers, timestamps, and
/// severity levels. Supports both console output and file-based logging
/// for the dashboard refresh process. Nothing is emitted until
/// `init_logger` has been called, so library callers that never configure
/// logging get silent, side-effect-free calculations.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Engine Components
// ---------------------------------------------------------------------------

/// Which part of the engine produced a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Ledger,
    Saturation,
    Forecast,
    Classifier,
    Alerts,
    Config,
    Database,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Ledger => write!(f, "LEDGER"),
            Component::Saturation => write!(f, "API"),
            Component::Forecast => write!(f, "FCST"),
            Component::Classifier => write!(f, "CLASS"),
            Component::Alerts => write!(f, "ALERT"),
            Component::Config => write!(f, "CFG"),
            Component::Database => write!(f, "DB"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    fn log(&self, level: LogLevel, component: Component, site_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let log_entry = format_entry(&timestamp.to_string(), level, component, site_id, message);
        let site_part = site_id.map(|s| format!(" [{}]", s)).unwrap_or_default();

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, site_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, site_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

/// Formats one log line as written to the log file.
fn format_entry(
    timestamp: &str,
    level: LogLevel,
    component: Component,
    site_id: Option<&str>,
    message: &str,
) -> String {
    let site_part = site_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
    format!("{} {} {}{}: {}", timestamp, level, component, site_part, message)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    let logger = Logger {
        min_level,
        log_file: log_file.map(String::from),
        console_timestamps,
    };
    // A poisoned lock only means another thread panicked mid-log; the
    // slot itself is still usable.
    let mut slot = LOGGER.lock().unwrap_or_else(|e| e.into_inner());
    *slot = Some(logger);
}

fn dispatch(level: LogLevel, component: Component, site_id: Option<&str>, message: &str) {
    let guard = LOGGER.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(logger) = guard.as_ref() {
        logger.log(level, component, site_id, message);
    }
}

/// Log a general informational message
pub fn info(component: Component, site_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, component, site_id, message);
}

/// Log a warning message
pub fn warn(component: Component, site_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, component, site_id, message);
}

/// Log an error message
pub fn error(component: Component, site_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, component, site_id, message);
}

/// Log a debug message
pub fn debug(component: Component, site_id: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, component, site_id, message);
}

// ---------------------------------------------------------------------------
// Ledger Load Summary
// ---------------------------------------------------------------------------

/// Log a summary of a ledger load: how many rows were usable as-is, how
/// many had unusable rainfall (counted as 0), and how many were dropped.
pub fn log_ledger_summary(site_id: Option<&str>, total: usize, degraded: usize, skipped: usize) {
    let message = format!(
        "Ledger loaded: {}/{} rows clean, {} with missing rainfall, {} skipped",
        total.saturating_sub(degraded + skipped),
        total,
        degraded,
        skipped
    );

    if degraded == 0 && skipped == 0 {
        info(Component::Ledger, site_id, &message);
    } else if total > 0 && skipped == total {
        error(Component::Ledger, site_id, &message);
    } else {
        warn(Component::Ledger, site_id, &message);
    }
}
