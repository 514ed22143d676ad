/// Forward projection of the saturation index over a rainfall forecast.
///
/// Each forecast day decays the accumulated index and adds that day's
/// rainfall at full weight:
///
/// ```text
/// API_next = d * API_prev + rainfall_next
/// ```
///
/// starting from the current API. The projection is produced lazily, one
/// value per forecast day.

use serde_json::Value;

use crate::config::EngineConfig;
use crate::logging::{self, Component};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastProjector {
    decay: f64,
}

impl ForecastProjector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            decay: config.decay(),
        }
    }

    /// Projects `current_api` across `forecast`, yielding one value per day.
    /// Negative or non-finite rainfall counts as 0; a negative or NaN
    /// starting API is clamped to 0, the same reading the classifier uses.
    pub fn project<'a>(&self, current_api: f64, forecast: &'a [f64]) -> Projection<'a> {
        let start = if current_api > 0.0 { current_api } else { 0.0 };
        Projection {
            decay: self.decay,
            state: start,
            remaining: forecast.iter(),
        }
    }

    /// Projects over raw forecast entries from an upstream JSON payload.
    /// Anything that is not a number (or numeric string) is treated as a
    /// dry day.
    pub fn project_raw(&self, current_api: f64, forecast: &[Value]) -> Vec<f64> {
        let amounts: Vec<f64> = forecast.iter().map(forecast_amount).collect();
        self.project(current_api, &amounts).collect()
    }
}

/// Rainfall for one forecast entry, 0 when unusable.
pub fn forecast_amount(entry: &Value) -> f64 {
    let parsed = match entry {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => {
            logging::debug(
                Component::Forecast,
                None,
                &format!("forecast entry {} unusable, treated as 0", entry),
            );
            0.0
        }
    }
}

/// Lazy projected API sequence. Finite: ends with the forecast.
#[derive(Debug, Clone)]
pub struct Projection<'a> {
    decay: f64,
    state: f64,
    remaining: std::slice::Iter<'a, f64>,
}

impl Iterator for Projection<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let rain = *self.remaining.next()?;
        let rain = if rain.is_finite() && rain > 0.0 { rain } else { 0.0 };
        self.state = self.decay * self.state + rain;
        Some(self.state)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.remaining.size_hint()
    }
}

impl ExactSizeIterator for Projection<'_> {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
