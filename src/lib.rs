//! Construction-site workability monitor.
//!
//! Derives a soil-saturation proxy (the antecedent precipitation index)
//! from the site's daily rainfall ledger, classifies site workability, and
//! raises wind, lightning, soil and sediment-basin alerts. Fetching weather
//! data and rendering the dashboard happen elsewhere; this crate is the
//! decision engine between them.

pub mod alert;
pub mod analysis;
pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;

pub use engine::{SiteAssessment, WorkabilityEngine};
