/// Derived operating status for individual trades on site.
///
/// These are the secondary dashboard cards: crane go/stop, concrete
/// cold-weather protection, and stormwater (SWPPP) risk. They summarise the
/// snapshot for crews and never add entries to the alert list.

use serde::Serialize;

use crate::model::SiteSnapshot;

/// Sustained wind at or above this stops crane picks.
pub const CRANE_WIND_LIMIT_MPH: f64 = 25.0;
/// Below this, fresh concrete needs insulated blankets.
pub const CONCRETE_BLANKET_TEMP_F: f64 = 35.0;
/// 24-hour rainfall above this raises stormwater risk.
pub const SWPPP_RAIN_LIMIT_IN: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CraneStatus {
    Go,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConcreteStatus {
    Optimal,
    Caution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StormwaterRisk {
    Low,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationsStatus {
    pub crane: CraneStatus,
    pub concrete: ConcreteStatus,
    pub blankets_required: bool,
    pub stormwater_risk: StormwaterRisk,
}

pub fn crane_status(wind_speed_mph: f64) -> CraneStatus {
    if wind_speed_mph < CRANE_WIND_LIMIT_MPH || wind_speed_mph.is_nan() {
        CraneStatus::Go
    } else {
        CraneStatus::Stop
    }
}

/// Blankets are required only when a temperature is known and below the
/// limit.
pub fn blankets_required(temperature_f: Option<f64>) -> bool {
    matches!(temperature_f, Some(t) if t < CONCRETE_BLANKET_TEMP_F)
}

pub fn stormwater_risk(rainfall_24h_in: f64) -> StormwaterRisk {
    if rainfall_24h_in > SWPPP_RAIN_LIMIT_IN {
        StormwaterRisk::High
    } else {
        StormwaterRisk::Low
    }
}

pub fn operations_status(snapshot: &SiteSnapshot) -> OperationsStatus {
    let blankets = blankets_required(snapshot.temperature_f);
    OperationsStatus {
        crane: crane_status(snapshot.wind_speed_mph),
        concrete: if blankets {
            ConcreteStatus::Caution
        } else {
            ConcreteStatus::Optimal
        },
        blankets_required: blankets,
        stormwater_risk: stormwater_risk(snapshot.rainfall_24h_in),
    }
}
