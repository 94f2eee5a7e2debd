//! Booking API endpoints

use api_types::booking::{
    BookingListResponse, BookingNew, BookingStatus as ApiStatus, BookingStatusUpdate, BookingView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_status(status: engine::BookingStatus) -> ApiStatus {
    match status {
        engine::BookingStatus::Pending => ApiStatus::Pending,
        engine::BookingStatus::Confirmed => ApiStatus::Confirmed,
        engine::BookingStatus::Cancelled => ApiStatus::Cancelled,
        engine::BookingStatus::Active => ApiStatus::Active,
        engine::BookingStatus::Completed => ApiStatus::Completed,
    }
}

fn map_status_to_engine(status: ApiStatus) -> engine::BookingStatus {
    match status {
        ApiStatus::Pending => engine::BookingStatus::Pending,
        ApiStatus::Confirmed => engine::BookingStatus::Confirmed,
        ApiStatus::Cancelled => engine::BookingStatus::Cancelled,
        ApiStatus::Active => engine::BookingStatus::Active,
        ApiStatus::Completed => engine::BookingStatus::Completed,
    }
}

fn map_currency(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Eur => api_types::Currency::Eur,
    }
}

fn view(booking: engine::Booking) -> BookingView {
    BookingView {
        id: booking.id,
        item_id: booking.item_id,
        renter_id: booking.renter_id,
        start_date: booking.start_date,
        end_date: booking.end_date,
        status: map_status(booking.status),
        amount_minor: booking.amount_minor,
        currency: map_currency(booking.currency),
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BookingNew>,
) -> Result<(StatusCode, Json<BookingView>), ServerError> {
    let booking = state
        .engine
        .create_booking(
            &user.username,
            payload.item_id,
            payload.start_date,
            payload.end_date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(view(booking))))
}

pub async fn update_status(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookingStatusUpdate>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state
        .engine
        .update_booking_status(id, map_status_to_engine(payload.status), &user.username)
        .await?;

    Ok(Json(view(booking)))
}

pub async fn list_for_item(
    _: Extension<user::Model>,
    State(state): State<ServerState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<BookingListResponse>, ServerError> {
    let bookings = state.engine.bookings_for_item(item_id).await?;

    Ok(Json(BookingListResponse {
        bookings: bookings.into_iter().map(view).collect(),
    }))
}
