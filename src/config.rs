/// Engine configuration loading and validation.
///
/// Configuration is read once from a TOML file (see `sitemon.toml`) and
/// validated before any calculation runs. An invalid window, decay factor or
/// threshold set breaks the saturation model, so it is rejected here and
/// never surfaces per call.
///
/// Example:
///
/// ```toml
/// [site]
/// name = "J&J LMDS"
/// location = "Wilson, NC"
///
/// [engine]
/// window_days = 5
/// decay = 0.85
///
/// [engine.thresholds]
/// optimal = 0.30
/// saturated = 0.60
/// critical = 0.85
/// ```

use std::fs;

use serde::Deserialize;

use crate::logging::{self, Component};
use crate::model::ConfigError;

pub const DEFAULT_WINDOW_DAYS: usize = 5;
pub const DEFAULT_DECAY: f64 = 0.85;
pub const DEFAULT_OPTIMAL_LIMIT: f64 = 0.30;
pub const DEFAULT_SATURATED_LIMIT: f64 = 0.60;
pub const DEFAULT_CRITICAL_LIMIT: f64 = 0.85;

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Inclusive lower bounds on API for the three elevated workability tiers.
///
/// `[0, optimal)` is OPTIMAL, `[optimal, saturated)` SATURATED,
/// `[saturated, critical)` CRITICAL and `[critical, ∞)` RESTRICTED.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkabilityThresholds {
    optimal: f64,
    saturated: f64,
    critical: f64,
}

impl WorkabilityThresholds {
    pub fn new(optimal: f64, saturated: f64, critical: f64) -> Result<Self, ConfigError> {
        for (name, value) in [("optimal", optimal), ("saturated", saturated), ("critical", critical)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidThresholds(format!(
                    "{} limit must be finite and > 0, got {}",
                    name, value
                )));
            }
        }
        if !(optimal < saturated && saturated < critical) {
            return Err(ConfigError::InvalidThresholds(format!(
                "limits must be strictly increasing, got {} / {} / {}",
                optimal, saturated, critical
            )));
        }
        Ok(Self {
            optimal,
            saturated,
            critical,
        })
    }

    pub fn optimal(&self) -> f64 {
        self.optimal
    }

    pub fn saturated(&self) -> f64 {
        self.saturated
    }

    pub fn critical(&self) -> f64 {
        self.critical
    }
}

impl Default for WorkabilityThresholds {
    fn default() -> Self {
        Self {
            optimal: DEFAULT_OPTIMAL_LIMIT,
            saturated: DEFAULT_SATURATED_LIMIT,
            critical: DEFAULT_CRITICAL_LIMIT,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine config
// ---------------------------------------------------------------------------

/// Validated parameters shared by every engine component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    window_days: usize,
    decay: f64,
    thresholds: WorkabilityThresholds,
}

impl EngineConfig {
    pub fn new(
        window_days: usize,
        decay: f64,
        thresholds: WorkabilityThresholds,
    ) -> Result<Self, ConfigError> {
        if window_days == 0 {
            return Err(ConfigError::InvalidWindow(window_days));
        }
        if !decay.is_finite() || decay <= 0.0 || decay >= 1.0 {
            return Err(ConfigError::InvalidDecay(decay));
        }
        Ok(Self {
            window_days,
            decay,
            thresholds,
        })
    }

    pub fn window_days(&self) -> usize {
        self.window_days
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    pub fn thresholds(&self) -> &WorkabilityThresholds {
        &self.thresholds
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            decay: DEFAULT_DECAY,
            thresholds: WorkabilityThresholds::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Site metadata
// ---------------------------------------------------------------------------

/// Descriptive metadata for the monitored site. Not used by the engine's
/// math; carried through so the dashboard can label its output.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub name: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// USGS station providing the site's rain gauge.
    pub rain_gauge_station: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "J&J LMDS".to_string(),
            location: "Wilson, NC".to_string(),
            latitude: 35.7413,
            longitude: -77.9938,
            rain_gauge_station: "02091500".to_string(), // Contentnea Creek at Wilson
        }
    }
}

/// Full contents of a config file after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub engine: EngineConfig,
}

// ---------------------------------------------------------------------------
// TOML layer
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    site: SiteInfo,
    #[serde(default)]
    engine: EngineSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct EngineSection {
    window_days: usize,
    decay: f64,
    thresholds: ThresholdSection,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            decay: DEFAULT_DECAY,
            thresholds: ThresholdSection::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ThresholdSection {
    optimal: f64,
    saturated: f64,
    critical: f64,
}

impl Default for ThresholdSection {
    fn default() -> Self {
        Self {
            optimal: DEFAULT_OPTIMAL_LIMIT,
            saturated: DEFAULT_SATURATED_LIMIT,
            critical: DEFAULT_CRITICAL_LIMIT,
        }
    }
}

/// Parses and validates a TOML config document. Missing tables and keys
/// fall back to the defaults.
pub fn parse_config(contents: &str) -> Result<SiteConfig, ConfigError> {
    let file: ConfigFile =
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

    let t = &file.engine.thresholds;
    let thresholds = WorkabilityThresholds::new(t.optimal, t.saturated, t.critical)?;
    let engine = EngineConfig::new(file.engine.window_days, file.engine.decay, thresholds)?;

    Ok(SiteConfig {
        site: file.site,
        engine,
    })
}

/// Reads and validates the config file at `path`.
pub fn load_config(path: &str) -> Result<SiteConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(format!("{}: {}", path, e)))?;
    let config = parse_config(&contents).inspect_err(|e| {
        logging::error(Component::Config, None, &format!("{}: {}", path, e));
    })?;

    logging::info(
        Component::Config,
        Some(&config.site.name),
        &format!(
            "Loaded config: window={} decay={} limits={}/{}/{}",
            config.engine.window_days(),
            config.engine.decay(),
            config.engine.thresholds().optimal(),
            config.engine.thresholds().saturated(),
            config.engine.thresholds().critical(),
        ),
    );
    Ok(config)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
