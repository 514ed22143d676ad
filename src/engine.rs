/// Workability assessment: the single entry point the dashboard calls.
///
/// `WorkabilityEngine` owns no mutable state. One engine can be shared
/// across threads and called on every refresh; each call reads an
/// already-loaded ledger and snapshot and returns a fresh assessment.

use serde::Serialize;

use crate::alert::rules::{AlertEngine, AlertLimits};
use crate::alert::workability::{Classification, WorkabilityClassifier};
use crate::analysis::forecast::ForecastProjector;
use crate::analysis::ledger::PrecipitationLedger;
use crate::analysis::operations::{OperationsStatus, operations_status};
use crate::analysis::saturation::{SaturationIndexCalculator, round3};
use crate::config::EngineConfig;
use crate::logging::{self, Component};
use crate::model::{Alert, SiteSnapshot};

/// Everything the presentation layer needs for one refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteAssessment {
    /// Current API at full precision.
    pub api: f64,
    /// API as of each ledger day, oldest first.
    pub api_series: Vec<f64>,
    pub classification: Classification,
    pub alerts: Vec<Alert>,
    /// Projected API for each forecast day in the snapshot.
    pub projection: Vec<f64>,
    pub operations: OperationsStatus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkabilityEngine {
    calculator: SaturationIndexCalculator,
    projector: ForecastProjector,
    classifier: WorkabilityClassifier,
    alerts: AlertEngine,
}

impl WorkabilityEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_alert_limits(config, AlertLimits::default())
    }

    pub fn with_alert_limits(config: &EngineConfig, limits: AlertLimits) -> Self {
        Self {
            calculator: SaturationIndexCalculator::new(config),
            projector: ForecastProjector::new(config),
            classifier: WorkabilityClassifier::new(*config.thresholds()),
            alerts: AlertEngine::new(limits),
        }
    }

    pub fn calculator(&self) -> &SaturationIndexCalculator {
        &self.calculator
    }

    pub fn classifier(&self) -> &WorkabilityClassifier {
        &self.classifier
    }

    pub fn assess(&self, ledger: &PrecipitationLedger, snapshot: &SiteSnapshot) -> SiteAssessment {
        let rainfall = ledger.rainfall_series();
        let api_series = self.calculator.series(&rainfall);
        let api = api_series.last().copied().unwrap_or(0.0);

        let classification = self.classifier.classify(api);
        let alerts = self
            .alerts
            .evaluate(snapshot, classification.state, classification.api);
        let projection: Vec<f64> = self
            .projector
            .project(api, &snapshot.forecast_rainfall_in)
            .collect();

        logging::info(
            Component::Classifier,
            None,
            &format!(
                "API {} over {} day(s) -> {} ({} alert(s))",
                round3(api),
                ledger.len(),
                classification.state,
                alerts.len()
            ),
        );

        SiteAssessment {
            api,
            api_series,
            classification,
            alerts,
            projection,
            operations: operations_status(snapshot),
        }
    }
}

impl Default for WorkabilityEngine {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AlertSeverity, PrecipitationRecord, WorkabilityState};
    use chrono::NaiveDate;

    fn ledger(amounts: &[f64]) -> PrecipitationLedger {
        let start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let records = amounts
            .iter()
            .enumerate()
            .map(|(i, &a)| PrecipitationRecord::new(start + chrono::Duration::days(i as i64), a))
            .collect();
        PrecipitationLedger::from_records(records).unwrap()
    }

    #[test]
    fn test_empty_ledger_is_optimal_and_quiet() {
        let result = WorkabilityEngine::default().assess(&PrecipitationLedger::new(), &SiteSnapshot::default());
        assert_eq!(result.api, 0.0);
        assert!(result.api_series.is_empty());
        assert_eq!(result.classification.state, WorkabilityState::Optimal);
        assert!(result.alerts.is_empty());
        assert!(result.projection.is_empty());
    }

    #[test]
    fn test_api_equals_last_series_value() {
        let engine = WorkabilityEngine::default();
        let l = ledger(&[0.2, 0.0, 0.9, 0.1]);
        let result = engine.assess(&l, &SiteSnapshot::default());
        assert_eq!(result.api, engine.calculator().api_for_ledger(&l));
        assert_eq!(result.api_series.len(), 4);
    }

    #[test]
    fn test_boundary_value_lands_in_critical() {
        let result = WorkabilityEngine::default()
            .assess(&ledger(&[0.0, 0.0, 0.0, 0.0, 0.6]), &SiteSnapshot::default());
        assert_eq!(result.api, 0.6);
        assert_eq!(result.classification.state, WorkabilityState::Critical);
        assert_eq!(result.alerts.len(), 1);
        assert_eq!(result.alerts[0].severity, AlertSeverity::Warning);
    }

    #[test]
    fn test_projection_starts_from_current_api() {
        let snapshot = SiteSnapshot {
            forecast_rainfall_in: vec![0.0, 1.0],
            ..SiteSnapshot::default()
        };
        let result = WorkabilityEngine::default().assess(&ledger(&[0.5]), &snapshot);
        assert_eq!(result.projection.len(), 2);
        assert!((result.projection[0] - 0.425).abs() < 1e-12);
        assert!((result.projection[1] - (0.425 * 0.85 + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WorkabilityEngine>();
        assert_send_sync::<PrecipitationLedger>();
    }

    #[test]
    fn test_assessment_serializes_for_dashboard() {
        let result = WorkabilityEngine::default()
            .assess(&ledger(&[1.0, 1.0]), &SiteSnapshot::default());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["classification"]["state"], "RESTRICTED");
        assert_eq!(json["alerts"][0]["severity"], "danger");
        assert_eq!(json["operations"]["crane"], "GO");
    }
}
