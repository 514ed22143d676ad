/// Antecedent precipitation index (API) calculation.
///
/// The API is a decayed sum of recent rainfall used as a proxy for soil
/// saturation. With window `N` and decay `d`, the value as of the most
/// recent day is
///
/// ```text
/// API = Σ_{i=0}^{min(N, len)-1} rainfall[last - i] * d^i
/// ```
///
/// The most recent day carries weight 1; older days are discounted
/// geometrically and anything older than `N` days is ignored. The result is
/// a heuristic, not a calibrated soil model.
///
/// Values are kept at full precision. Use `round3` only when displaying or
/// comparing against hand-computed figures.

use crate::analysis::ledger::PrecipitationLedger;
use crate::config::EngineConfig;
use crate::logging::{self, Component};

/// Computes scalar and series API values for a fixed window and decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationIndexCalculator {
    window_days: usize,
    decay: f64,
}

impl SaturationIndexCalculator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            window_days: config.window_days(),
            decay: config.decay(),
        }
    }

    pub fn window_days(&self) -> usize {
        self.window_days
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    /// API as of the last element of `rainfall` (most recent last).
    /// An empty slice yields 0.
    pub fn api(&self, rainfall: &[f64]) -> f64 {
        if rainfall.is_empty() {
            return 0.0;
        }
        self.api_at(rainfall, rainfall.len() - 1)
    }

    /// API as of every position in `rainfall`. Element `k` equals
    /// `self.api(&rainfall[..=k])` exactly.
    pub fn series(&self, rainfall: &[f64]) -> Vec<f64> {
        (0..rainfall.len()).map(|k| self.api_at(rainfall, k)).collect()
    }

    pub fn api_for_ledger(&self, ledger: &PrecipitationLedger) -> f64 {
        self.api(&ledger.rainfall_series())
    }

    pub fn series_for_ledger(&self, ledger: &PrecipitationLedger) -> Vec<f64> {
        self.series(&ledger.rainfall_series())
    }

    /// Trailing-window sum anchored at index `end`. Both the scalar and
    /// series forms go through here so they agree bit for bit.
    fn api_at(&self, rainfall: &[f64], end: usize) -> f64 {
        let mut total = 0.0;
        let mut weight = 1.0;
        for &amount in rainfall[..=end].iter().rev().take(self.window_days) {
            total += contribution(amount) * weight;
            weight *= self.decay;
        }
        total
    }
}

/// Bad upstream values (negative, NaN, infinite) contribute nothing.
fn contribution(amount: f64) -> f64 {
    if amount.is_finite() && amount >= 0.0 {
        amount
    } else {
        logging::debug(
            Component::Saturation,
            None,
            &format!("rainfall amount {} unusable, counted as 0", amount),
        );
        0.0
    }
}

/// Rounds to three decimal places for display.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkabilityThresholds;

    fn calc() -> SaturationIndexCalculator {
        SaturationIndexCalculator::new(&EngineConfig::default())
    }

    fn calc_with(window: usize, decay: f64) -> SaturationIndexCalculator {
        let cfg = EngineConfig::new(window, decay, WorkabilityThresholds::default()).unwrap();
        SaturationIndexCalculator::new(&cfg)
    }

    #[test]
    fn test_empty_history_is_zero() {
        assert_eq!(calc().api(&[]), 0.0);
        assert!(calc().series(&[]).is_empty());
    }

    #[test]
    fn test_only_most_recent_day_has_full_weight() {
        let api = calc().api(&[0.0, 0.0, 0.0, 0.0, 0.6]);
        assert_eq!(api, 0.6);
    }

    #[test]
    fn test_four_day_old_rain_is_decayed() {
        let api = calc().api(&[1.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(round3(api), 0.522);
        assert!((api - 0.85f64.powi(4)).abs() < 1e-12);
    }

    #[test]
    fn test_short_history_uses_what_exists() {
        // 0.4 * 0.85 + 0.2
        let api = calc().api(&[0.4, 0.2]);
        assert!((api - 0.54).abs() < 1e-12);
    }

    #[test]
    fn test_records_older_than_window_are_ignored() {
        let with_old = calc().api(&[9.0, 0.1, 0.1, 0.1, 0.1, 0.1]);
        let without_old = calc().api(&[0.1, 0.1, 0.1, 0.1, 0.1]);
        assert_eq!(with_old, without_old);
    }

    #[test]
    fn test_bad_values_contribute_zero() {
        let api = calc().api(&[f64::NAN, -2.0, f64::INFINITY, 0.5]);
        assert_eq!(api, 0.5);
    }

    #[test]
    fn test_series_matches_scalar_on_every_prefix() {
        let rain = [0.3, 0.0, 1.2, 0.05, 0.0, 0.0, 0.7, 0.1, 0.0, 2.4, 0.0, 0.33];
        for c in [calc(), calc_with(1, 0.5), calc_with(3, 0.9), calc_with(20, 0.2)] {
            let series = c.series(&rain);
            assert_eq!(series.len(), rain.len());
            for k in 0..rain.len() {
                assert_eq!(
                    series[k],
                    c.api(&rain[..=k]),
                    "series[{}] disagrees with scalar prefix (N={}, d={})",
                    k,
                    c.window_days(),
                    c.decay()
                );
            }
        }
    }

    #[test]
    fn test_more_rain_on_the_newest_day_never_lowers_api() {
        let history = [0.4, 1.1, 0.0, 0.6, 0.9, 0.2];
        let c = calc();
        let mut with_dry_day = history.to_vec();
        with_dry_day.push(0.0);
        let baseline = c.api(&with_dry_day);
        for extra in [0.01, 0.1, 0.5, 3.0] {
            let mut wet = history.to_vec();
            wet.push(extra);
            assert!(c.api(&wet) > baseline, "adding {} in should raise API", extra);
        }
    }

    #[test]
    fn test_more_rain_on_an_older_day_never_lowers_api() {
        let c = calc();
        let history = [0.4, 1.1, 0.0, 0.6, 0.9, 0.2];
        let baseline = c.api(&history);
        // Positions 1..=5 are inside the 5-day window; position 0 is outside.
        for position in 0..history.len() - 1 {
            for extra in [0.01, 0.25, 2.0] {
                let mut wetter = history;
                wetter[position] += extra;
                let api = c.api(&wetter);
                assert!(
                    api >= baseline,
                    "adding {} in at day {} lowered API from {} to {}",
                    extra,
                    position,
                    baseline,
                    api
                );
                if position > 0 {
                    assert!(api > baseline, "day {} is inside the window", position);
                } else {
                    assert_eq!(api, baseline, "day 0 is outside the window");
                }
            }
        }
    }

    #[test]
    fn test_dry_days_decay_to_zero() {
        let c = calc();
        let mut rain = vec![0.8, 0.4, 1.0];
        let mut previous = c.api(&rain);
        for _ in 0..c.window_days() {
            rain.push(0.0);
            let current = c.api(&rain);
            assert!(current < previous, "API must fall on a dry day");
            assert!(current <= previous * c.decay() + 1e-12);
            previous = current;
        }
        assert_eq!(previous, 0.0, "after a full dry window nothing remains");
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.52200625), 0.522);
        assert_eq!(round3(1.3070625), 1.307);
        assert_eq!(round3(0.0), 0.0);
    }
}
