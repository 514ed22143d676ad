/// Saturation computations for the site workability monitor.
///
/// Everything here is a pure function of already-loaded data: no I/O,
/// no shared mutable state.
///
/// Submodules:
/// - `ledger`: the append-only daily rainfall history.
/// - `saturation`: antecedent precipitation index, scalar and series.
/// - `forecast`: forward projection of the index over forecast rainfall.
/// - `operations`: crane, concrete and stormwater status cards.

pub mod forecast;
pub mod ledger;
pub mod operations;
pub mod saturation;
