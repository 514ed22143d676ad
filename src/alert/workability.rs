//! Workability classification.
//!
//! Maps a saturation index to one of four ordered tiers. The mapping is a
//! pure function of the API value; nothing about past classifications is
//! remembered. Thresholds are inclusive lower bounds, so a value exactly on
//! a boundary lands in the more severe tier.

use serde::Serialize;

use crate::config::WorkabilityThresholds;
use crate::model::WorkabilityState;

/// Result of classifying one API value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub state: WorkabilityState,
    /// The API actually classified, after clamping.
    pub api: f64,
    pub color: &'static str,
    pub directive: &'static str,
    pub recommendations: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkabilityClassifier {
    thresholds: WorkabilityThresholds,
}

impl WorkabilityClassifier {
    pub fn new(thresholds: WorkabilityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &WorkabilityThresholds {
        &self.thresholds
    }

    /// Tier for `api`. Negative or NaN input is read as 0.
    pub fn state_for(&self, api: f64) -> WorkabilityState {
        let api = clamp_api(api);
        let t = &self.thresholds;
        if api < t.optimal() {
            WorkabilityState::Optimal
        } else if api < t.saturated() {
            WorkabilityState::Saturated
        } else if api < t.critical() {
            WorkabilityState::Critical
        } else {
            WorkabilityState::Restricted
        }
    }

    pub fn classify(&self, api: f64) -> Classification {
        let api = clamp_api(api);
        let state = self.state_for(api);
        Classification {
            state,
            api,
            color: state.color(),
            directive: state.directive(),
            recommendations: state.recommendations().to_vec(),
        }
    }
}

impl Default for WorkabilityClassifier {
    fn default() -> Self {
        Self::new(WorkabilityThresholds::default())
    }
}

fn clamp_api(api: f64) -> f64 {
    if api > 0.0 { api } else { 0.0 }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
