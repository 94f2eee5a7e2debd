use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
}

pub mod booking {
    use super::*;

    /// Lifecycle state of a booking as seen over the wire.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BookingStatus {
        Pending,
        Confirmed,
        Cancelled,
        Active,
        Completed,
    }

    /// Request body for creating a booking.
    ///
    /// The renter is the authenticated caller; the price is computed
    /// server-side from the item's daily rate.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingNew {
        pub item_id: Uuid,
        /// First rental day (inclusive), `YYYY-MM-DD`.
        pub start_date: NaiveDate,
        /// Last rental day (inclusive), `YYYY-MM-DD`.
        pub end_date: NaiveDate,
    }

    /// Request body for moving a booking to a new status.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingStatusUpdate {
        pub status: BookingStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingView {
        pub id: Uuid,
        pub item_id: Uuid,
        pub renter_id: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub status: BookingStatus,
        /// Total price in minor units (cents).
        pub amount_minor: i64,
        pub currency: Currency,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingListResponse {
        pub bookings: Vec<BookingView>,
    }
}

pub mod calendar {
    use super::*;

    /// Query parameters for the unavailable-dates endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CalendarQuery {
        /// First day of the window (inclusive), `YYYY-MM-DD`.
        pub from: NaiveDate,
        /// Last day of the window (inclusive), `YYYY-MM-DD`.
        pub to: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UnavailableDatesResponse {
        /// Sorted, deduplicated days the item cannot be rented.
        pub dates: Vec<NaiveDate>,
    }
}

pub mod payment {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentIntentStatus {
        Pending,
        Succeeded,
        Failed,
    }

    /// Request body for opening a charge attempt against a booking.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentIntentNew {
        pub booking_id: Uuid,
        /// Amount in minor units (cents).
        pub amount_minor: i64,
        pub currency: Option<Currency>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentIntentView {
        pub id: Uuid,
        pub booking_id: Uuid,
        pub provider_intent_id: String,
        pub amount_minor: i64,
        pub currency: Currency,
        pub status: PaymentIntentStatus,
        /// Provider-issued secret the client needs to complete the charge.
        ///
        /// Only present on creation; never stored or returned afterwards.
        pub client_secret: Option<String>,
    }

    /// Request body for settling an intent against the provider.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentConfirm {
        pub provider_intent_id: String,
    }
}
