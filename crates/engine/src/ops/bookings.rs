//! Booking creation and lifecycle ops.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    Booking, BookingStatus, EngineError, Item, ResultEngine, TransitionActor, availability,
    bookings, pricing,
    state::validate_transition,
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a booking request for `item_id` over `[start_date, end_date]`
    /// (inclusive) and persists it as `pending`.
    ///
    /// A pending booking does not hold the calendar: two concurrent requests
    /// for overlapping dates may both succeed here, and the race is settled
    /// at confirmation time (see [`Engine::update_booking_status`]).
    pub async fn create_booking(
        &self,
        renter_id: &str,
        item_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> ResultEngine<Booking> {
        if end_date < start_date {
            return Err(EngineError::InvalidRange(
                "end date must not be before start date".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, renter_id).await?;
            let item = Item::try_from(self.require_item(&db_tx, item_id).await?)?;

            if item.owner_id == renter_id {
                return Err(EngineError::SelfBooking(
                    "an owner cannot rent their own item".to_string(),
                ));
            }
            if !item.listed {
                return Err(EngineError::Unavailable(
                    "item is not listed for rental".to_string(),
                ));
            }
            if self
                .has_calendar_conflict(&db_tx, item_id, start_date, end_date)
                .await?
            {
                return Err(EngineError::Unavailable(
                    "item not available for these dates".to_string(),
                ));
            }

            let amount_minor = pricing::quote(item.daily_rate_minor, start_date, end_date);
            let booking = Booking::new(
                item_id,
                renter_id.to_string(),
                start_date,
                end_date,
                amount_minor,
                item.currency,
                Utc::now(),
            )?;
            bookings::ActiveModel::from(&booking).insert(&db_tx).await?;

            Ok(booking)
        })
    }

    /// Return a [`Booking`].
    pub async fn booking(&self, booking_id: Uuid) -> ResultEngine<Booking> {
        let model = self.require_booking(&self.database, booking_id).await?;
        Booking::try_from(model)
    }

    /// All bookings ever made for an item, ordered by start date.
    ///
    /// Bookings are never deleted; cancellation is a status, so this is the
    /// full history.
    pub async fn bookings_for_item(&self, item_id: Uuid) -> ResultEngine<Vec<Booking>> {
        self.require_item(&self.database, item_id).await?;

        let models = bookings::Entity::find()
            .filter(bookings::Column::ItemId.eq(item_id.to_string()))
            .order_by_asc(bookings::Column::StartDate)
            .all(&self.database)
            .await?;

        models.into_iter().map(Booking::try_from).collect()
    }

    /// Moves a booking to `target` on behalf of `acting_user_id`.
    ///
    /// Only the item's owner may decide a pending request, and decided
    /// bookings reject any further change through this path. Nothing but
    /// the status column is written.
    pub async fn update_booking_status(
        &self,
        booking_id: Uuid,
        target: BookingStatus,
        acting_user_id: &str,
    ) -> ResultEngine<Booking> {
        with_tx!(self, |db_tx| {
            let model = self.require_booking(&db_tx, booking_id).await?;
            let item = self.require_item(&db_tx, model.item_id_as_uuid()?).await?;

            self.transition_booking(
                &db_tx,
                model,
                target,
                TransitionActor::User {
                    acting_user_id,
                    owner_id: &item.owner_id,
                },
            )
            .await
        })
    }

    /// Days in `[range_start, range_end]` that cannot be booked for
    /// `item_id`: past days and days covered by any non-cancelled booking.
    ///
    /// `today` is passed in rather than read from a clock so callers (and
    /// tests) control what counts as the past.
    pub async fn unavailable_dates(
        &self,
        item_id: Uuid,
        range_start: NaiveDate,
        range_end: NaiveDate,
        today: NaiveDate,
    ) -> ResultEngine<Vec<NaiveDate>> {
        if range_start > range_end {
            return Err(EngineError::InvalidRange(
                "range start must not be after range end".to_string(),
            ));
        }
        self.require_item(&self.database, item_id).await?;

        let occupied: Vec<(NaiveDate, NaiveDate)> = self
            .occupying_bookings(&self.database, item_id, range_start, range_end)
            .await?
            .into_iter()
            .map(|model| (model.start_date, model.end_date))
            .collect();

        availability::blocked_dates(&occupied, range_start, range_end, today)
    }

    /// Validates and applies a transition inside the caller's transaction.
    ///
    /// A transition into the calendar-hold set re-runs the overlap check
    /// under the same transaction as the status write: the read-time check
    /// done at creation is advisory, and only the first of two racing
    /// confirmations for overlapping dates may commit. The second fails
    /// with `Unavailable` here.
    pub(super) async fn transition_booking(
        &self,
        db_tx: &DatabaseTransaction,
        model: bookings::Model,
        target: BookingStatus,
        actor: TransitionActor<'_>,
    ) -> ResultEngine<Booking> {
        let current = BookingStatus::try_from(model.status.as_str())?;
        validate_transition(current, target, actor)?;

        if target.holds_calendar()
            && self
                .has_calendar_conflict(
                    db_tx,
                    model.item_id_as_uuid()?,
                    model.start_date,
                    model.end_date,
                )
                .await?
        {
            return Err(EngineError::Unavailable(
                "item not available for these dates".to_string(),
            ));
        }

        let booking_active = bookings::ActiveModel {
            id: ActiveValue::Set(model.id.clone()),
            status: ActiveValue::Set(target.as_str().to_string()),
            ..Default::default()
        };
        booking_active.update(db_tx).await?;

        let mut updated = model;
        updated.status = target.as_str().to_string();
        Booking::try_from(updated)
    }
}

impl bookings::Model {
    fn item_id_as_uuid(&self) -> ResultEngine<Uuid> {
        Uuid::parse_str(&self.item_id)
            .map_err(|_| EngineError::KeyNotFound("item not exists".to_string()))
    }
}
