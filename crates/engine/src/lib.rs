//! Booking lifecycle & availability engine for the Lenza rental
//! marketplace.
//!
//! The engine decides whether a rental request for an item over a date
//! range is allowed, which states a booking may move through, how a
//! simultaneous-request race is resolved, and how payment confirmation is
//! coupled to booking state. Everything else (auth, reviews, moderation,
//! photos) lives outside and talks to the engine through these ops.

pub use bookings::Booking;
pub use currency::Currency;
pub use error::EngineError;
pub use items::Item;
pub use ops::{Engine, EngineBuilder};
pub use payments::{
    PaymentIntent, PaymentIntentStatus, PaymentProvider, ProviderIntent, ProviderIntentStatus,
};
pub use state::{BookingStatus, CALENDAR_HOLD, TransitionActor, validate_transition};
pub use stripe::StripeGateway;

pub mod availability;
pub mod pricing;

mod bookings;
mod currency;
mod error;
mod items;
mod ops;
mod payments;
mod state;
mod stripe;
mod users;

type ResultEngine<T> = Result<T, EngineError>;
