//! Calendar availability math.
//!
//! Pure computation over a set of existing bookings; no side effects. The
//! engine ops feed this module with rows scoped to one item.
//!
//! Two different range semantics live here on purpose:
//!
//! - conflict testing is **half-open**: a booking ending on a day does not
//!   conflict with one starting that same day (same-day hand-off);
//! - day blocking is **inclusive on both ends**: a booking's last day is
//!   still physically occupied, so it shows as unavailable in a calendar.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{EngineError, ResultEngine};

/// Half-open overlap test between `[a_start, a_end)` and `[b_start, b_end)`.
///
/// Touching ranges, where one's end equals the other's start, do not
/// conflict.
#[must_use]
pub fn ranges_conflict(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// True if `date` falls inside `[start, end]`, both ends included.
#[must_use]
pub fn booking_covers(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

/// Individual days in `[range_start, range_end]` that cannot be booked.
///
/// The result is the sorted union of:
/// - every date strictly before `today`;
/// - every date inclusively covered by one of `bookings` (pairs of
///   `(start, end)` dates for non-cancelled bookings of the item).
pub fn blocked_dates(
    bookings: &[(NaiveDate, NaiveDate)],
    range_start: NaiveDate,
    range_end: NaiveDate,
    today: NaiveDate,
) -> ResultEngine<Vec<NaiveDate>> {
    if range_start > range_end {
        return Err(EngineError::InvalidRange(
            "range start must not be after range end".to_string(),
        ));
    }

    let mut blocked = BTreeSet::new();
    for date in range_start.iter_days().take_while(|d| *d <= range_end) {
        if date < today {
            blocked.insert(date);
            continue;
        }
        if bookings
            .iter()
            .any(|(start, end)| booking_covers(date, *start, *end))
        {
            blocked.insert(date);
        }
    }

    Ok(blocked.into_iter().collect())
}
