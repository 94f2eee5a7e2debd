//! Payment-intent primitives and the provider seam.
//!
//! A `PaymentIntent` mirrors an external provider's charge attempt for one
//! booking. Its lifecycle is independent of the booking row, but a
//! succeeded intent drives exactly one booking transition.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    Pending,
    Succeeded,
    Failed,
}

impl PaymentIntentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl TryFrom<&str> for PaymentIntentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            other => Err(EngineError::InvalidState(format!(
                "invalid payment intent status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PaymentIntent {
    pub id: Uuid,
    pub booking_id: Uuid,
    /// The provider's id for this intent; correlation key for confirmation.
    pub provider_intent_id: String,
    pub amount_minor: i64,
    pub currency: Currency,
    pub status: PaymentIntentStatus,
    pub created_at: DateTime<Utc>,
    /// Returned by the provider at creation so the client can complete the
    /// charge; never persisted and absent on later reads.
    pub client_secret: Option<String>,
}

impl PaymentIntent {
    pub fn new(
        booking_id: Uuid,
        provider_intent_id: String,
        amount_minor: i64,
        currency: Currency,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            booking_id,
            provider_intent_id,
            amount_minor,
            currency,
            status: PaymentIntentStatus::Pending,
            created_at,
            client_secret: None,
        }
    }
}

/// Status the provider reports for an intent.
///
/// Only the three named statuses change local state; everything else passes
/// through unmodified so a half-way charge (`processing`, 3DS challenges)
/// never flips a booking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderIntentStatus {
    Succeeded,
    RequiresPaymentMethod,
    Canceled,
    Other(String),
}

impl From<&str> for ProviderIntentStatus {
    fn from(value: &str) -> Self {
        match value {
            "succeeded" => Self::Succeeded,
            "requires_payment_method" => Self::RequiresPaymentMethod,
            "canceled" => Self::Canceled,
            other => Self::Other(other.to_string()),
        }
    }
}

/// What the provider returns when an intent is created.
#[derive(Clone, Debug)]
pub struct ProviderIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: ProviderIntentStatus,
}

/// Abstraction over an external payment-intent provider (Stripe-shaped).
///
/// Boxed-future methods keep the trait dyn-compatible so the server can
/// hold an `Arc<dyn PaymentProvider>`. Implementations must bound their
/// calls with a timeout and surface failures as [`EngineError::Provider`];
/// the engine attempts each call once per invocation and writes no local
/// state from a failed call.
pub trait PaymentProvider: Send + Sync {
    fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: Currency,
        booking_id: Uuid,
    ) -> Pin<Box<dyn Future<Output = ResultEngine<ProviderIntent>> + Send + '_>>;

    fn retrieve_payment_intent(
        &self,
        provider_intent_id: &str,
    ) -> Pin<Box<dyn Future<Output = ResultEngine<ProviderIntentStatus>> + Send + '_>>;
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payment_intents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub booking_id: String,
    pub provider_intent_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Bookings,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PaymentIntent> for ActiveModel {
    fn from(intent: &PaymentIntent) -> Self {
        Self {
            id: ActiveValue::Set(intent.id.to_string()),
            booking_id: ActiveValue::Set(intent.booking_id.to_string()),
            provider_intent_id: ActiveValue::Set(intent.provider_intent_id.clone()),
            amount_minor: ActiveValue::Set(intent.amount_minor),
            currency: ActiveValue::Set(intent.currency.code().to_string()),
            status: ActiveValue::Set(intent.status.as_str().to_string()),
            created_at: ActiveValue::Set(intent.created_at),
        }
    }
}

impl TryFrom<Model> for PaymentIntent {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("payment intent not exists".to_string()))?,
            booking_id: Uuid::parse_str(&model.booking_id)
                .map_err(|_| EngineError::KeyNotFound("booking not exists".to_string()))?,
            provider_intent_id: model.provider_intent_id,
            amount_minor: model.amount_minor,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            status: PaymentIntentStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
            client_secret: None,
        })
    }
}
