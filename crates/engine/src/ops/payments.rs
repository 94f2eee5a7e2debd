//! Payment-intent ops: bridging the external provider to the booking
//! lifecycle.
//!
//! Provider calls run outside any DB transaction. If the provider call
//! fails before a local write, no local state changes; if a local write has
//! committed, it stands and reconciliation is the operator's problem.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    BookingStatus, Currency, EngineError, PaymentIntent, PaymentIntentStatus, ResultEngine,
    TransitionActor,
    payments::{self, PaymentProvider, ProviderIntentStatus},
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a payment intent for a pending booking.
    ///
    /// Every call creates one provider intent and one local record; there
    /// is no idempotency key at this layer, so retrying after a failed
    /// charge legitimately yields a second intent for the same booking.
    pub async fn create_payment_intent(
        &self,
        provider: &dyn PaymentProvider,
        booking_id: Uuid,
        amount_minor: i64,
        currency: Currency,
    ) -> ResultEngine<PaymentIntent> {
        let booking = self.require_booking(&self.database, booking_id).await?;
        let status = BookingStatus::try_from(booking.status.as_str())?;
        if status != BookingStatus::Pending {
            return Err(EngineError::InvalidState(format!(
                "payment intent requires a pending booking, got {}",
                status.as_str()
            )));
        }

        let provider_intent = provider
            .create_payment_intent(amount_minor, currency, booking_id)
            .await?;

        let mut intent = PaymentIntent::new(
            booking_id,
            provider_intent.id,
            amount_minor,
            currency,
            Utc::now(),
        );
        payments::ActiveModel::from(&intent)
            .insert(&self.database)
            .await?;

        intent.client_secret = provider_intent.client_secret;
        Ok(intent)
    }

    /// Settles a local payment intent against the provider's current view.
    ///
    /// - `succeeded`: the local intent becomes `succeeded` and the linked
    ///   booking is driven to `confirmed` through the payment path — once.
    ///   A repeated confirm of an already-succeeded intent returns it
    ///   unchanged instead of transitioning the booking again.
    /// - `requires_payment_method` / `canceled`: the local intent becomes
    ///   `failed`, the booking stays `pending`, and the caller gets
    ///   [`EngineError::PaymentFailed`] so it can prompt a retry.
    /// - anything else: passed through with no local change.
    pub async fn confirm_payment(
        &self,
        provider: &dyn PaymentProvider,
        provider_intent_id: &str,
    ) -> ResultEngine<PaymentIntent> {
        let model = payments::Entity::find()
            .filter(payments::Column::ProviderIntentId.eq(provider_intent_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("payment intent not exists".to_string()))?;
        let mut intent = PaymentIntent::try_from(model.clone())?;

        let provider_status = provider.retrieve_payment_intent(provider_intent_id).await?;

        match provider_status {
            ProviderIntentStatus::Succeeded => with_tx!(self, |db_tx| {
                let already_settled = intent.status == PaymentIntentStatus::Succeeded;

                let intent_active = payments::ActiveModel {
                    id: ActiveValue::Set(model.id.clone()),
                    status: ActiveValue::Set(PaymentIntentStatus::Succeeded.as_str().to_string()),
                    ..Default::default()
                };
                intent_active.update(&db_tx).await?;

                if !already_settled {
                    let booking = self.require_booking(&db_tx, intent.booking_id).await?;
                    self.transition_booking(
                        &db_tx,
                        booking,
                        BookingStatus::Confirmed,
                        TransitionActor::PaymentProcessor,
                    )
                    .await?;
                }

                intent.status = PaymentIntentStatus::Succeeded;
                Ok(intent)
            }),
            ProviderIntentStatus::RequiresPaymentMethod | ProviderIntentStatus::Canceled => {
                let reason = match provider_status {
                    ProviderIntentStatus::Canceled => "payment was canceled",
                    _ => "payment requires a new payment method",
                };

                let marked: ResultEngine<()> = with_tx!(self, |db_tx| {
                    let intent_active = payments::ActiveModel {
                        id: ActiveValue::Set(model.id.clone()),
                        status: ActiveValue::Set(PaymentIntentStatus::Failed.as_str().to_string()),
                        ..Default::default()
                    };
                    intent_active.update(&db_tx).await?;
                    Ok(())
                });
                marked?;

                Err(EngineError::PaymentFailed(reason.to_string()))
            }
            ProviderIntentStatus::Other(_) => Ok(intent),
        }
    }
}
