/// PrecipitationRecord, WorkabilityState, SiteSnapshot, Alert, error enums
/// core data structures and error handling
///
/// Core data types for the construction-site workability monitor.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no computation and no I/O, only types and the small parsing
/// helpers that turn raw upstream fields into them.

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Precipitation records
// ---------------------------------------------------------------------------

/// One day of observed rainfall for the site.
///
/// `rainfall_in` is `None` when the upstream field was missing or could not
/// be parsed. Such a record still occupies its date in the ledger but
/// contributes nothing to the saturation index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationRecord {
    pub date: NaiveDate,
    pub rainfall_in: Option<f64>,
}

impl PrecipitationRecord {
    pub fn new(date: NaiveDate, rainfall_in: f64) -> Self {
        Self {
            date,
            rainfall_in: sanitize_rainfall(rainfall_in),
        }
    }

    /// Builds a record from a raw text field, e.g. a CSV cell or a string
    /// value in a JSON row. Blank, `"null"`, non-numeric, non-finite and
    /// negative values all become `None`.
    pub fn from_raw(date: NaiveDate, raw: &str) -> Self {
        let trimmed = raw.trim();
        let rainfall_in = if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
            None
        } else {
            trimmed.parse::<f64>().ok().and_then(sanitize_rainfall)
        };
        Self { date, rainfall_in }
    }

    /// Rainfall amount used by the calculator: missing values count as 0.
    pub fn amount(&self) -> f64 {
        self.rainfall_in.unwrap_or(0.0)
    }
}

/// Rainfall must be a finite, non-negative number of inches.
pub fn sanitize_rainfall(value: f64) -> Option<f64> {
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Workability states
// ---------------------------------------------------------------------------

/// Site workability tiers, in ascending order of severity.
///
/// The API boundaries between tiers live in `config::WorkabilityThresholds`;
/// the text attached to each tier is fixed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkabilityState {
    Optimal,
    Saturated,
    Critical,
    Restricted,
}

impl WorkabilityState {
    /// All states, lowest severity first.
    pub const ALL: [WorkabilityState; 4] = [
        WorkabilityState::Optimal,
        WorkabilityState::Saturated,
        WorkabilityState::Critical,
        WorkabilityState::Restricted,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WorkabilityState::Optimal => "OPTIMAL",
            WorkabilityState::Saturated => "SATURATED",
            WorkabilityState::Critical => "CRITICAL",
            WorkabilityState::Restricted => "RESTRICTED",
        }
    }

    /// Dashboard colour for the status card.
    pub fn color(&self) -> &'static str {
        match self {
            WorkabilityState::Optimal => "green",
            WorkabilityState::Saturated => "yellow",
            WorkabilityState::Critical => "orange",
            WorkabilityState::Restricted => "red",
        }
    }

    /// Operational notice shown alongside the state.
    pub fn directive(&self) -> &'static str {
        match self {
            WorkabilityState::Optimal => {
                "Site conditions are optimal. Ground stability is sufficient for full production."
            }
            WorkabilityState::Saturated => {
                "Soil moisture is elevated. Limit heavy traffic to stabilized haul roads \
                 to prevent subgrade damage."
            }
            WorkabilityState::Critical => {
                "High rutting risk detected. Mass grading operations should be restricted \
                 to protect soil structure integrity."
            }
            WorkabilityState::Restricted => {
                "OFFICIAL NOTICE: Soil saturation exceeds trafficability limits. \
                 All earthwork is suspended to prevent non-compliant soil disturbance."
            }
        }
    }

    /// Recommended actions for the tier, most important first.
    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            WorkabilityState::Optimal => &[
                "Full operations authorized",
                "Proceed with scheduled grading and compaction",
                "Maintain routine erosion-control inspections",
            ],
            WorkabilityState::Saturated => &[
                "Limit heavy equipment to stabilized haul roads",
                "Increase stabilization of exposed soil",
                "Inspect silt fence and inlet protection",
            ],
            WorkabilityState::Critical => &[
                "Restrict mass grading operations",
                "Perform daily soil moisture checks",
                "Keep equipment off unstabilized subgrade",
            ],
            WorkabilityState::Restricted => &[
                "Stop all earthwork",
                "Secure and stabilize disturbed areas",
                "Document conditions for compliance records",
            ],
        }
    }
}

impl std::fmt::Display for WorkabilityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Sensor snapshot
// ---------------------------------------------------------------------------

/// Current site conditions supplied by the ingestion layer.
///
/// Every field defaults to a value that cannot trigger an alert, so a
/// snapshot built from partial data never raises an alarm on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteSnapshot {
    pub wind_gust_mph: f64,
    /// Sustained wind, used for crane go/stop. Falls back to 0 when unknown.
    pub wind_speed_mph: f64,
    pub lightning_strikes: u32,
    pub basin_capacity_pct: f64,
    pub temperature_f: Option<f64>,
    pub rainfall_24h_in: f64,
    /// Forecast rainfall, one entry per future day.
    pub forecast_rainfall_in: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Danger,
}

impl std::fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertSeverity::Warning => write!(f, "warning"),
            AlertSeverity::Danger => write!(f, "danger"),
        }
    }
}

/// A safety or compliance alert produced by one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Invalid engine configuration. Always fatal, always raised at load time.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// The API window must cover at least one day.
    InvalidWindow(usize),
    /// Decay factor must lie strictly between 0 and 1.
    InvalidDecay(f64),
    /// Thresholds must be finite, non-negative and strictly increasing.
    InvalidThresholds(String),
    /// The config file could not be read.
    Io(String),
    /// The config file is not valid TOML or has wrongly typed keys.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidWindow(n) => write!(f, "Invalid window size: {} (must be >= 1)", n),
            ConfigError::InvalidDecay(d) => {
                write!(f, "Invalid decay factor: {} (must be in (0, 1))", d)
            }
            ConfigError::InvalidThresholds(msg) => write!(f, "Invalid thresholds: {}", msg),
            ConfigError::Io(msg) => write!(f, "Config read error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while building or loading the precipitation ledger.
/// The calculation path itself never returns these.
#[derive(Debug, PartialEq)]
pub enum LedgerError {
    /// A record for this date already exists.
    DuplicateDate(NaiveDate),
    /// Appending would break date-ascending order.
    OutOfOrder { last: NaiveDate, new: NaiveDate },
    /// The row payload could not be deserialized at all.
    ParseError(String),
    /// The backing table could not be queried.
    Database(String),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::DuplicateDate(date) => write!(f, "Duplicate record for {}", date),
            LedgerError::OutOfOrder { last, new } => {
                write!(f, "Record for {} is older than latest record {}", new, last)
            }
            LedgerError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            LedgerError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
