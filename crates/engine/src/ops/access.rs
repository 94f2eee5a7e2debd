//! Lookup helpers shared by the booking and payment ops.
//!
//! Generic over [`ConnectionTrait`] so read-only paths can run on the pool
//! while mutating paths pass their open transaction.

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{CALENDAR_HOLD, EngineError, ResultEngine, bookings, items, state::BookingStatus, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user_exists<C: ConnectionTrait>(
        &self,
        db: &C,
        username: &str,
    ) -> ResultEngine<()> {
        let exists = users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::KeyNotFound("user not exists".to_string()));
        }
        Ok(())
    }

    pub(super) async fn require_item<C: ConnectionTrait>(
        &self,
        db: &C,
        item_id: Uuid,
    ) -> ResultEngine<items::Model> {
        items::Entity::find_by_id(item_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("item not exists".to_string()))
    }

    pub(super) async fn require_booking<C: ConnectionTrait>(
        &self,
        db: &C,
        booking_id: Uuid,
    ) -> ResultEngine<bookings::Model> {
        bookings::Entity::find_by_id(booking_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("booking not exists".to_string()))
    }

    /// Half-open overlap test against the calendar-hold set (confirmed and
    /// active bookings). Pending requests do not hold the calendar.
    pub(super) async fn has_calendar_conflict<C: ConnectionTrait>(
        &self,
        db: &C,
        item_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ResultEngine<bool> {
        let holders: Vec<String> = CALENDAR_HOLD
            .iter()
            .map(|status| status.as_str().to_string())
            .collect();

        let conflicting = bookings::Entity::find()
            .filter(bookings::Column::ItemId.eq(item_id.to_string()))
            .filter(bookings::Column::Status.is_in(holders))
            .filter(bookings::Column::StartDate.lt(end_date))
            .filter(bookings::Column::EndDate.gt(start_date))
            .one(db)
            .await?;

        Ok(conflicting.is_some())
    }

    /// Non-cancelled bookings of `item_id` whose inclusive date range
    /// intersects `[range_start, range_end]`. Pending bookings are included
    /// on purpose: a requested day shows as occupied in the calendar even
    /// though it does not hold it for conflict purposes.
    pub(super) async fn occupying_bookings<C: ConnectionTrait>(
        &self,
        db: &C,
        item_id: Uuid,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> ResultEngine<Vec<bookings::Model>> {
        bookings::Entity::find()
            .filter(bookings::Column::ItemId.eq(item_id.to_string()))
            .filter(bookings::Column::Status.ne(BookingStatus::Cancelled.as_str()))
            .filter(bookings::Column::StartDate.lte(range_end))
            .filter(bookings::Column::EndDate.gte(range_start))
            .all(db)
            .await
            .map_err(Into::into)
    }
}
