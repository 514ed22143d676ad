/// PostgreSQL persistence for the precipitation ledger.
///
/// The ingestion job appends one row per site per day to
/// `site_weather.daily_rainfall`:
///
/// ```sql
/// CREATE TABLE site_weather.daily_rainfall (
///     site_id      TEXT NOT NULL,
///     obs_date     DATE NOT NULL,
///     rainfall_in  DOUBLE PRECISION,
///     PRIMARY KEY (site_id, obs_date)
/// );
/// ```
///
/// The engine only reads. `append_record` exists for the ingestion side and
/// never overwrites an existing day.

use chrono::NaiveDate;
use postgres::{Client, NoTls};
use std::env;

use crate::analysis::ledger::PrecipitationLedger;
use crate::logging::{self, Component};
use crate::model::{LedgerError, PrecipitationRecord, sanitize_rainfall};

/// Connects using `DATABASE_URL` from the environment (or `.env`).
pub fn connect() -> Result<Client, LedgerError> {
    dotenv::dotenv().ok();
    let url = env::var("DATABASE_URL")
        .map_err(|_| LedgerError::Database("DATABASE_URL must be set".to_string()))?;
    Client::connect(&url, NoTls).map_err(|e| {
        logging::error(Component::Database, None, &format!("connect failed: {}", e));
        LedgerError::Database(e.to_string())
    })
}

/// Loads the full rainfall history for `site_id`, oldest first.
///
/// Null or negative rainfall values are kept as missing amounts.
pub fn load_ledger(client: &mut Client, site_id: &str) -> Result<PrecipitationLedger, LedgerError> {
    let rows = client
        .query(
            "SELECT obs_date, rainfall_in
             FROM site_weather.daily_rainfall
             WHERE site_id = $1
             ORDER BY obs_date ASC",
            &[&site_id],
        )
        .map_err(|e| LedgerError::Database(e.to_string()))?;

    let total = rows.len();
    let mut degraded = 0;
    let mut records = Vec::with_capacity(total);
    for row in rows {
        let date: NaiveDate = row.get(0);
        let rainfall: Option<f64> = row.get(1);
        let rainfall_in = rainfall.and_then(sanitize_rainfall);
        if rainfall_in.is_none() {
            degraded += 1;
        }
        records.push(PrecipitationRecord { date, rainfall_in });
    }

    logging::log_ledger_summary(Some(site_id), total, degraded, 0);
    PrecipitationLedger::from_records(records)
}

/// Inserts one day's record. Returns `false` if that day already existed.
pub fn append_record(
    client: &mut Client,
    site_id: &str,
    record: &PrecipitationRecord,
) -> Result<bool, LedgerError> {
    let inserted = client
        .execute(
            "INSERT INTO site_weather.daily_rainfall (site_id, obs_date, rainfall_in)
             VALUES ($1, $2, $3)
             ON CONFLICT (site_id, obs_date) DO NOTHING",
            &[&site_id, &record.date, &record.rainfall_in],
        )
        .map_err(|e| LedgerError::Database(e.to_string()))?;

    if inserted == 0 {
        logging::debug(
            Component::Database,
            Some(site_id),
            &format!("{} already recorded, left unchanged", record.date),
        );
    }
    Ok(inserted > 0)
}

/// Returns the first and last recorded dates for a site, if any.
pub fn get_data_range(
    client: &mut Client,
    site_id: &str,
) -> Result<Option<(NaiveDate, NaiveDate)>, LedgerError> {
    let row = client
        .query_one(
            "SELECT MIN(obs_date), MAX(obs_date)
             FROM site_weather.daily_rainfall
             WHERE site_id = $1",
            &[&site_id],
        )
        .map_err(|e| LedgerError::Database(e.to_string()))?;

    let min: Option<NaiveDate> = row.get(0);
    let max: Option<NaiveDate> = row.get(1);

    match (min, max) {
        (Some(start), Some(end)) => Ok(Some((start, end))),
        _ => Ok(None),
    }
}
