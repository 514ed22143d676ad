/// Precipitation ledger staleness detection.
///
/// The ingestion job appends one rainfall record per day. If it stops
/// running, the saturation index silently decays toward OPTIMAL as if the
/// site had dried out, which is the unsafe direction. This module lets the
/// dashboard flag a ledger that has fallen behind.
///
/// # Clock injection
/// `is_ledger_stale_at` takes `today: NaiveDate` rather than reading the
/// clock, so staleness is deterministic in tests.

use chrono::NaiveDate;

use crate::analysis::ledger::PrecipitationLedger;

// ---------------------------------------------------------------------------
// Staleness check
// ---------------------------------------------------------------------------

/// Returns `true` if the newest record is more than `max_age_days` older
/// than `today`. An empty ledger is always stale.
///
/// Staleness is strictly greater than the threshold:
///   age > max_age_days  →  stale
///   age == max_age_days →  not stale
///
/// A record dated after `today` (clock skew on the ingestion host) counts
/// as age 0.
pub fn is_ledger_stale_at(ledger: &PrecipitationLedger, max_age_days: u64, today: NaiveDate) -> bool {
    match ledger.latest_date() {
        None => true,
        Some(latest) => {
            let age_days = (today - latest).num_days().max(0) as u64;
            age_days > max_age_days
        }
    }
}

/// Convenience wrapper that uses today's UTC date.
/// Use `is_ledger_stale_at` in tests to keep them deterministic.
pub fn is_ledger_stale(ledger: &PrecipitationLedger, max_age_days: u64) -> bool {
    is_ledger_stale_at(ledger, max_age_days, chrono::Utc::now().date_naive())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrecipitationRecord;

    fn ledger_ending(date: NaiveDate) -> PrecipitationLedger {
        PrecipitationLedger::from_records(vec![
            PrecipitationRecord::new(date - chrono::Duration::days(1), 0.2),
            PrecipitationRecord::new(date, 0.0),
        ])
        .unwrap()
    }

    /// A fixed "today" used across all tests: 2025-06-10.
    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    #[test]
    fn test_record_from_today_is_not_stale() {
        let ledger = ledger_ending(fixed_today());
        assert!(!is_ledger_stale_at(&ledger, 1, fixed_today()));
    }

    #[test]
    fn test_age_equal_to_threshold_is_not_stale() {
        let ledger = ledger_ending(NaiveDate::from_ymd_opt(2025, 6, 8).unwrap());
        assert!(
            !is_ledger_stale_at(&ledger, 2, fixed_today()),
            "2-day-old ledger should not be stale with a 2-day threshold; \
             staleness is strictly greater than, not >=",
        );
    }

    #[test]
    fn test_one_day_past_threshold_is_stale() {
        let ledger = ledger_ending(NaiveDate::from_ymd_opt(2025, 6, 7).unwrap());
        assert!(is_ledger_stale_at(&ledger, 2, fixed_today()));
    }

    #[test]
    fn test_empty_ledger_is_stale() {
        assert!(is_ledger_stale_at(&PrecipitationLedger::new(), 365, fixed_today()));
    }

    #[test]
    fn test_future_dated_record_is_not_stale() {
        let ledger = ledger_ending(NaiveDate::from_ymd_opt(2025, 6, 12).unwrap());
        assert!(!is_ledger_stale_at(&ledger, 0, fixed_today()));
    }

    #[test]
    fn test_same_ledger_stale_under_tight_threshold_not_under_loose() {
        let ledger = ledger_ending(NaiveDate::from_ymd_opt(2025, 6, 5).unwrap());
        assert!(is_ledger_stale_at(&ledger, 1, fixed_today()));
        assert!(!is_ledger_stale_at(&ledger, 7, fixed_today()));
    }
}
