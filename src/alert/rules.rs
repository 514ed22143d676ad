//! Safety and compliance alert rules.
//!
//! Every rule is evaluated independently against the current snapshot, so
//! several alerts may fire at once. Alerts are returned in a fixed rule
//! order (wind, lightning, soil state, basin) rather than sorted by
//! severity, which keeps the output stable for the dashboard and tests.
//! An empty list means nothing fired; rendering an "all clear" card is the
//! caller's job.

use serde_json::Value;

use crate::logging::{self, Component};
use crate::model::{Alert, AlertSeverity, SiteSnapshot, WorkabilityState};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Rule limits. Each rule fires when its reading is strictly above the limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertLimits {
    pub wind_gust_mph: f64,
    pub lightning_strikes: u32,
    pub basin_capacity_pct: f64,
}

impl Default for AlertLimits {
    fn default() -> Self {
        Self {
            wind_gust_mph: 25.0,
            lightning_strikes: 0,
            basin_capacity_pct: 80.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlertEngine {
    limits: AlertLimits,
}

impl AlertEngine {
    pub fn new(limits: AlertLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &AlertLimits {
        &self.limits
    }

    /// Evaluates all rules. `api` is used only in message text.
    pub fn evaluate(&self, snapshot: &SiteSnapshot, state: WorkabilityState, api: f64) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if snapshot.wind_gust_mph > self.limits.wind_gust_mph {
            alerts.push(Alert {
                severity: AlertSeverity::Danger,
                title: "High Wind".to_string(),
                message: format!(
                    "Wind gusts at {:.0} mph exceed the {:.0} mph limit. Suspend all crane lifts.",
                    snapshot.wind_gust_mph, self.limits.wind_gust_mph
                ),
            });
        }

        if snapshot.lightning_strikes > self.limits.lightning_strikes {
            alerts.push(Alert {
                severity: AlertSeverity::Warning,
                title: "Lightning Detected".to_string(),
                message: format!(
                    "{} lightning strike(s) within the monitoring radius. \
                     Prepare evacuation protocol.",
                    snapshot.lightning_strikes
                ),
            });
        }

        match state {
            WorkabilityState::Restricted => alerts.push(Alert {
                severity: AlertSeverity::Danger,
                title: "Soil Restricted".to_string(),
                message: format!(
                    "Saturation index {:.2} exceeds trafficability limits. Cease all grading.",
                    api
                ),
            }),
            WorkabilityState::Critical => alerts.push(Alert {
                severity: AlertSeverity::Warning,
                title: "Soil Critical".to_string(),
                message: format!(
                    "Saturation index {:.2} indicates high rutting risk. Minimize earthwork.",
                    api
                ),
            }),
            WorkabilityState::Optimal | WorkabilityState::Saturated => {}
        }

        if snapshot.basin_capacity_pct > self.limits.basin_capacity_pct {
            alerts.push(Alert {
                severity: AlertSeverity::Warning,
                title: "Sediment Basin Near Capacity".to_string(),
                message: format!(
                    "Basin at {:.0}% capacity. Coordinate pump-out before the next rain event.",
                    snapshot.basin_capacity_pct
                ),
            });
        }

        for alert in &alerts {
            logging::debug(
                Component::Alerts,
                None,
                &format!("{} [{}]: {}", alert.title, alert.severity, alert.message),
            );
        }
        alerts
    }
}

// ---------------------------------------------------------------------------
// Snapshot parsing
// ---------------------------------------------------------------------------

impl SiteSnapshot {
    /// Builds a snapshot from the ingestion layer's keyed bag of values.
    ///
    /// Recognised keys: `wind_gust`, `wind_speed`, `lightning_strikes`,
    /// `basin_capacity`, `temperature`, `rain_24h`, `forecast_rainfall`.
    /// Missing, null, non-numeric or negative values fall back to 0 (or
    /// `None` for temperature), so absent data never raises an alert.
    pub fn from_json(bag: &Value) -> Self {
        let number = |key: &str| -> Option<f64> {
            let v = match bag.get(key)? {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }?;
            v.is_finite().then_some(v)
        };
        let non_negative = |key: &str| number(key).filter(|v| *v >= 0.0).unwrap_or(0.0);

        let forecast_rainfall_in = bag
            .get("forecast_rainfall")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .map(crate::analysis::forecast::forecast_amount)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            wind_gust_mph: non_negative("wind_gust"),
            wind_speed_mph: non_negative("wind_speed"),
            lightning_strikes: non_negative("lightning_strikes").min(u32::MAX as f64) as u32,
            basin_capacity_pct: non_negative("basin_capacity"),
            temperature_f: number("temperature"),
            rainfall_24h_in: non_negative("rain_24h"),
            forecast_rainfall_in,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(wind: f64, lightning: u32, basin: f64) -> SiteSnapshot {
        SiteSnapshot {
            wind_gust_mph: wind,
            lightning_strikes: lightning,
            basin_capacity_pct: basin,
            ..SiteSnapshot::default()
        }
    }

    #[test]
    fn test_high_wind_only() {
        let alerts =
            AlertEngine::default().evaluate(&snapshot(30.0, 0, 50.0), WorkabilityState::Optimal, 0.1);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Danger);
        assert_eq!(alerts[0].title, "High Wind");
        assert!(alerts[0].message.contains("Suspend all crane lifts"));
    }

    #[test]
    fn test_quiet_day_has_no_alerts() {
        let alerts =
            AlertEngine::default().evaluate(&SiteSnapshot::default(), WorkabilityState::Saturated, 0.4);
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_limits_are_strict() {
        let alerts =
            AlertEngine::default().evaluate(&snapshot(25.0, 0, 80.0), WorkabilityState::Optimal, 0.0);
        assert!(alerts.is_empty(), "values exactly at the limit must not alert");
    }

    #[test]
    fn test_all_rules_fire_in_rule_order() {
        let alerts = AlertEngine::default().evaluate(
            &snapshot(40.0, 3, 95.0),
            WorkabilityState::Restricted,
            1.234,
        );
        let titles: Vec<_> = alerts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "High Wind",
                "Lightning Detected",
                "Soil Restricted",
                "Sediment Basin Near Capacity"
            ]
        );
        let severities: Vec<_> = alerts.iter().map(|a| a.severity).collect();
        assert_eq!(
            severities,
            vec![
                AlertSeverity::Danger,
                AlertSeverity::Warning,
                AlertSeverity::Danger,
                AlertSeverity::Warning
            ]
        );
        assert!(alerts[1].message.starts_with("3 lightning"));
        assert!(alerts[2].message.contains("1.23"));
        assert!(alerts[3].message.contains("95%"));
    }

    #[test]
    fn test_critical_state_is_a_warning() {
        let alerts =
            AlertEngine::default().evaluate(&SiteSnapshot::default(), WorkabilityState::Critical, 0.7);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, AlertSeverity::Warning);
        assert!(alerts[0].message.contains("0.70"));
        assert!(alerts[0].message.contains("Minimize earthwork"));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let engine = AlertEngine::default();
        let snap = snapshot(26.0, 1, 81.0);
        let first = engine.evaluate(&snap, WorkabilityState::Critical, 0.61);
        let second = engine.evaluate(&snap, WorkabilityState::Critical, 0.61);
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_custom_limits() {
        let engine = AlertEngine::new(AlertLimits {
            wind_gust_mph: 35.0,
            lightning_strikes: 2,
            basin_capacity_pct: 90.0,
        });
        let alerts = engine.evaluate(&snapshot(30.0, 2, 85.0), WorkabilityState::Optimal, 0.0);
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_snapshot_from_full_bag() {
        let bag = json!({
            "wind_gust": 31,
            "wind_speed": "18",
            "lightning_strikes": 2,
            "basin_capacity": 64.5,
            "temperature": 33.0,
            "rain_24h": 0.4,
            "forecast_rainfall": [0.1, "0.2", "storms", null],
            "humidity": 80
        });
        let snap = SiteSnapshot::from_json(&bag);
        assert_eq!(snap.wind_gust_mph, 31.0);
        assert_eq!(snap.wind_speed_mph, 18.0);
        assert_eq!(snap.lightning_strikes, 2);
        assert_eq!(snap.basin_capacity_pct, 64.5);
        assert_eq!(snap.temperature_f, Some(33.0));
        assert_eq!(snap.rainfall_24h_in, 0.4);
        assert_eq!(snap.forecast_rainfall_in, vec![0.1, 0.2, 0.0, 0.0]);
    }

    #[test]
    fn test_snapshot_missing_and_bad_keys_default_to_zero() {
        let bag = json!({
            "wind_gust": "gusty",
            "lightning_strikes": -4,
            "basin_capacity": null
        });
        let snap = SiteSnapshot::from_json(&bag);
        assert_eq!(snap, SiteSnapshot::default());
        assert_eq!(SiteSnapshot::from_json(&json!("not an object")), SiteSnapshot::default());
        let alerts = AlertEngine::default().evaluate(&snap, WorkabilityState::Optimal, 0.0);
        assert!(alerts.is_empty());
    }
}
