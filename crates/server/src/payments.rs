//! Payment API endpoints

use api_types::payment::{
    PaymentConfirm, PaymentIntentNew, PaymentIntentStatus as ApiIntentStatus, PaymentIntentView,
};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, user};

fn map_intent_status(status: engine::PaymentIntentStatus) -> ApiIntentStatus {
    match status {
        engine::PaymentIntentStatus::Pending => ApiIntentStatus::Pending,
        engine::PaymentIntentStatus::Succeeded => ApiIntentStatus::Succeeded,
        engine::PaymentIntentStatus::Failed => ApiIntentStatus::Failed,
    }
}

fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Eur => api_types::Currency::Eur,
    }
}

fn map_currency_to_engine(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Eur => engine::Currency::Eur,
    }
}

fn view(intent: engine::PaymentIntent) -> PaymentIntentView {
    PaymentIntentView {
        id: intent.id,
        booking_id: intent.booking_id,
        provider_intent_id: intent.provider_intent_id,
        amount_minor: intent.amount_minor,
        currency: map_currency(intent.currency),
        status: map_intent_status(intent.status),
        client_secret: intent.client_secret,
    }
}

pub async fn intent_new(
    _: Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PaymentIntentNew>,
) -> Result<(StatusCode, Json<PaymentIntentView>), ServerError> {
    let currency = map_currency_to_engine(payload.currency.unwrap_or_default());
    let intent = state
        .engine
        .create_payment_intent(
            state.provider.as_ref(),
            payload.booking_id,
            payload.amount_minor,
            currency,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view(intent))))
}

pub async fn confirm(
    _: Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PaymentConfirm>,
) -> Result<Json<PaymentIntentView>, ServerError> {
    let intent = state
        .engine
        .confirm_payment(state.provider.as_ref(), &payload.provider_intent_id)
        .await?;

    Ok(Json(view(intent)))
}
