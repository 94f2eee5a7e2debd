//! Booking primitives.
//!
//! A `Booking` is a rental request for an item over an inclusive date
//! range. Rows are never deleted; cancellation is a status change, and the
//! history stays for audit.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BookingStatus, Currency, EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub item_id: Uuid,
    /// Username of the renter.
    pub renter_id: String,
    pub start_date: NaiveDate,
    /// Inclusive; `end_date >= start_date`.
    pub end_date: NaiveDate,
    pub status: BookingStatus,
    /// Computed at creation via the pricing rules; never mutated by status
    /// changes afterwards.
    pub amount_minor: i64,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        item_id: Uuid,
        renter_id: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        amount_minor: i64,
        currency: Currency,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if end_date < start_date {
            return Err(EngineError::InvalidRange(
                "end date must not be before start date".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            item_id,
            renter_id,
            start_date,
            end_date,
            status: BookingStatus::Pending,
            amount_minor,
            currency,
            created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub item_id: String,
    pub renter_id: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
    pub amount_minor: i64,
    pub currency: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::items::Entity",
        from = "Column::ItemId",
        to = "super::items::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Items,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RenterId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Renter,
    #[sea_orm(has_many = "super::payments::Entity")]
    PaymentIntents,
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentIntents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Booking> for ActiveModel {
    fn from(booking: &Booking) -> Self {
        Self {
            id: ActiveValue::Set(booking.id.to_string()),
            item_id: ActiveValue::Set(booking.item_id.to_string()),
            renter_id: ActiveValue::Set(booking.renter_id.clone()),
            start_date: ActiveValue::Set(booking.start_date),
            end_date: ActiveValue::Set(booking.end_date),
            status: ActiveValue::Set(booking.status.as_str().to_string()),
            amount_minor: ActiveValue::Set(booking.amount_minor),
            currency: ActiveValue::Set(booking.currency.code().to_string()),
            created_at: ActiveValue::Set(booking.created_at),
        }
    }
}

impl TryFrom<Model> for Booking {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("booking not exists".to_string()))?,
            item_id: Uuid::parse_str(&model.item_id)
                .map_err(|_| EngineError::KeyNotFound("item not exists".to_string()))?,
            renter_id: model.renter_id,
            start_date: model.start_date,
            end_date: model.end_date,
            status: BookingStatus::try_from(model.status.as_str())?,
            amount_minor: model.amount_minor,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            created_at: model.created_at,
        })
    }
}
