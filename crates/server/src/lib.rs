use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod bookings;
mod calendar;
mod payments;
mod server;
mod user;

pub mod types {
    pub mod booking {
        pub use api_types::booking::{
            BookingListResponse, BookingNew, BookingStatus, BookingStatusUpdate, BookingView,
        };
        pub use engine::Booking;
    }

    pub mod calendar {
        pub use api_types::calendar::{CalendarQuery, UnavailableDatesResponse};
    }

    pub mod payment {
        pub use api_types::payment::{
            PaymentConfirm, PaymentIntentNew, PaymentIntentStatus, PaymentIntentView,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ForbiddenTransition(_) => StatusCode::FORBIDDEN,
        EngineError::IllegalTransition(_) | EngineError::Unavailable(_) => StatusCode::CONFLICT,
        EngineError::PaymentFailed(_) => StatusCode::PAYMENT_REQUIRED,
        EngineError::Provider(_) => StatusCode::BAD_GATEWAY,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::SelfBooking(_)
        | EngineError::InvalidRange(_)
        | EngineError::InvalidState(_)
        | EngineError::CurrencyMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_forbidden_transition_maps_to_403() {
        let res =
            ServerError::from(EngineError::ForbiddenTransition("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_illegal_transition_maps_to_409() {
        let res =
            ServerError::from(EngineError::IllegalTransition("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_unavailable_maps_to_409() {
        let res = ServerError::from(EngineError::Unavailable("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidRange("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(EngineError::SelfBooking("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn engine_payment_failed_maps_to_402() {
        let res = ServerError::from(EngineError::PaymentFailed("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn engine_provider_maps_to_502() {
        let res = ServerError::from(EngineError::Provider("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
