//! Workability decisions and alerting.
//!
//! Submodules:
//! - `workability`: API → workability tier classification.
//! - `rules`: wind, lightning, soil and basin alert rules.
//! - `stalenesses`: detects a ledger the ingestion job has stopped feeding.

pub mod rules;
pub mod stalenesses;
pub mod workability;
