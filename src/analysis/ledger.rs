/// Precipitation ledger: the site's append-only daily rainfall history.
///
/// The ledger is the only durable input to the engine. Records are kept in
/// date-ascending order with at most one record per date; once appended they
/// are never changed or removed. Calculations read it through
/// `rainfall_series`, which yields amounts most-recent-last with missing
/// values already mapped to 0.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde_json::Value;

use crate::logging::{self, Component};
use crate::model::{LedgerError, PrecipitationRecord, sanitize_rainfall};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecipitationLedger {
    records: Vec<PrecipitationRecord>,
}

impl PrecipitationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a ledger from records in any order. Fails on duplicate dates.
    pub fn from_records(mut records: Vec<PrecipitationRecord>) -> Result<Self, LedgerError> {
        records.sort_by_key(|r| r.date);
        if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(LedgerError::DuplicateDate(pair[1].date));
        }
        Ok(Self { records })
    }

    /// Appends a record. The date must be strictly later than every date
    /// already in the ledger.
    pub fn append(&mut self, record: PrecipitationRecord) -> Result<(), LedgerError> {
        if let Some(last) = self.latest_date() {
            if record.date == last {
                return Err(LedgerError::DuplicateDate(record.date));
            }
            if record.date < last {
                return Err(LedgerError::OutOfOrder {
                    last,
                    new: record.date,
                });
            }
        }
        self.records.push(record);
        Ok(())
    }

    pub fn records(&self) -> &[PrecipitationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Rainfall amounts in date order, most recent last. Missing amounts are 0.
    pub fn rainfall_series(&self) -> Vec<f64> {
        self.records.iter().map(PrecipitationRecord::amount).collect()
    }

    /// Loads a ledger from a JSON array of row objects.
    ///
    /// Each row needs a `date` (`YYYY-MM-DD`) and a `rainfall` value, which
    /// may be a number, a numeric string, or null. Other keys are ignored.
    /// Rows with an unusable date are skipped; rows with an unusable
    /// rainfall value are kept with a missing amount. When a date appears
    /// more than once (e.g. the ingestion job ran twice in a day) the first
    /// row wins and later ones are skipped. Only a payload that is not a
    /// JSON array at all is an error.
    pub fn from_json_rows(payload: &str) -> Result<Self, LedgerError> {
        let rows: Vec<Value> =
            serde_json::from_str(payload).map_err(|e| LedgerError::ParseError(e.to_string()))?;

        let total = rows.len();
        let mut degraded = 0;
        let mut skipped = 0;
        let mut records = Vec::with_capacity(total);
        let mut seen = HashSet::with_capacity(total);

        for (i, row) in rows.iter().enumerate() {
            let date = row
                .get("date")
                .and_then(Value::as_str)
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok());
            let Some(date) = date else {
                logging::warn(
                    Component::Ledger,
                    None,
                    &format!("row {}: missing or invalid date, skipped", i),
                );
                skipped += 1;
                continue;
            };
            if !seen.insert(date) {
                logging::warn(
                    Component::Ledger,
                    None,
                    &format!("row {}: duplicate record for {}, skipped", i, date),
                );
                skipped += 1;
                continue;
            }

            let record = match row.get("rainfall") {
                Some(Value::Number(n)) => PrecipitationRecord {
                    date,
                    rainfall_in: n.as_f64().and_then(sanitize_rainfall),
                },
                Some(Value::String(s)) => PrecipitationRecord::from_raw(date, s),
                _ => PrecipitationRecord {
                    date,
                    rainfall_in: None,
                },
            };
            if record.rainfall_in.is_none() {
                logging::warn(
                    Component::Ledger,
                    None,
                    &format!("{}: rainfall missing or unparseable, counted as 0", date),
                );
                degraded += 1;
            }
            records.push(record);
        }

        logging::log_ledger_summary(None, total, degraded, skipped);
        Self::from_records(records)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
