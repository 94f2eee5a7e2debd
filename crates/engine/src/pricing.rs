//! Rental price derivation.
//!
//! Prices are computed once at booking creation and never mutated by later
//! status changes.

use chrono::NaiveDate;

/// Quotes a rental over `[start, end]` at `daily_rate_minor` per day.
///
/// `days = end - start` in whole days, with a minimum of one billable day so
/// a same-day rental is never free.
///
/// Fails closed on bad rate data: a missing or non-positive daily rate
/// quotes `0` instead of erroring. Callers must treat a zero quote as a
/// data-quality signal, not as a legitimate free rental.
#[must_use]
pub fn quote(daily_rate_minor: i64, start: NaiveDate, end: NaiveDate) -> i64 {
    if daily_rate_minor <= 0 {
        return 0;
    }

    let days = (end - start).num_days().max(1);
    days * daily_rate_minor
}
