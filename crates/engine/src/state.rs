//! Booking lifecycle states and the transition table.
//!
//! `PENDING` is the initial state. The owner decides `PENDING → CONFIRMED`
//! or `PENDING → CANCELLED`; once decided, this path re-decides nothing.
//! Payment confirmation is a distinct path that may drive `PENDING →
//! CONFIRMED` without the owner acting (paying is the owner's implicit
//! prior confirmation). `ACTIVE` and `COMPLETED` mark the operational tail
//! of the lifecycle; `CANCELLED` and `COMPLETED` are terminal.

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Active,
    Completed,
}

/// Statuses that hold the calendar: they count toward overlap conflicts for
/// new requests. `PENDING` deliberately does not hold it; multiple pending
/// requests for the same dates may coexist and only one can be confirmed.
pub const CALENDAR_HOLD: [BookingStatus; 2] = [BookingStatus::Confirmed, BookingStatus::Active];

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub fn holds_calendar(self) -> bool {
        CALENDAR_HOLD.contains(&self)
    }
}

impl TryFrom<&str> for BookingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::InvalidState(format!(
                "invalid booking status: {other}"
            ))),
        }
    }
}

/// Who is asking for a transition.
///
/// The actor is passed explicitly so the transition table stays
/// single-sourced and testable without persistence; call sites never embed
/// their own owner-equality checks.
#[derive(Clone, Copy, Debug)]
pub enum TransitionActor<'a> {
    /// A user acting through the status-update path. Only the item's owner
    /// is allowed to decide a pending request.
    User {
        acting_user_id: &'a str,
        owner_id: &'a str,
    },
    /// The payment-confirmation path; bypasses the owner check but is still
    /// only legal from `PENDING` and only toward `CONFIRMED`.
    PaymentProcessor,
}

/// Validates `current → target` for `actor`, without applying it.
pub fn validate_transition(
    current: BookingStatus,
    target: BookingStatus,
    actor: TransitionActor<'_>,
) -> ResultEngine<()> {
    if current != BookingStatus::Pending {
        return Err(EngineError::IllegalTransition(format!(
            "booking already decided ({})",
            current.as_str()
        )));
    }

    match actor {
        TransitionActor::User {
            acting_user_id,
            owner_id,
        } => {
            if acting_user_id != owner_id {
                return Err(EngineError::ForbiddenTransition(
                    "only the item owner may confirm or cancel a pending booking".to_string(),
                ));
            }
            match target {
                BookingStatus::Confirmed | BookingStatus::Cancelled => Ok(()),
                other => Err(EngineError::IllegalTransition(format!(
                    "a pending booking can only be confirmed or cancelled, not {}",
                    other.as_str()
                ))),
            }
        }
        TransitionActor::PaymentProcessor => match target {
            BookingStatus::Confirmed => Ok(()),
            other => Err(EngineError::IllegalTransition(format!(
                "payment confirmation can only confirm a booking, not {}",
                other.as_str()
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: TransitionActor<'static> = TransitionActor::User {
        acting_user_id: "alice",
        owner_id: "alice",
    };
    const RENTER: TransitionActor<'static> = TransitionActor::User {
        acting_user_id: "bob",
        owner_id: "alice",
    };

    #[test]
    fn owner_decides_pending() {
        validate_transition(BookingStatus::Pending, BookingStatus::Confirmed, OWNER).unwrap();
        validate_transition(BookingStatus::Pending, BookingStatus::Cancelled, OWNER).unwrap();
    }

    #[test]
    fn non_owner_is_forbidden() {
        let err =
            validate_transition(BookingStatus::Pending, BookingStatus::Confirmed, RENTER)
                .unwrap_err();
        assert!(matches!(err, EngineError::ForbiddenTransition(_)));
    }

    #[test]
    fn owner_cannot_skip_to_operational_states() {
        for target in [
            BookingStatus::Active,
            BookingStatus::Completed,
            BookingStatus::Pending,
        ] {
            let err = validate_transition(BookingStatus::Pending, target, OWNER).unwrap_err();
            assert!(matches!(err, EngineError::IllegalTransition(_)));
        }
    }

    #[test]
    fn decided_bookings_reject_everything() {
        for current in [
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Active,
            BookingStatus::Completed,
        ] {
            // Any actor, any target: already decided.
            let err = validate_transition(current, BookingStatus::Cancelled, OWNER).unwrap_err();
            assert!(matches!(err, EngineError::IllegalTransition(_)));
            let err = validate_transition(
                current,
                BookingStatus::Confirmed,
                TransitionActor::PaymentProcessor,
            )
            .unwrap_err();
            assert!(matches!(err, EngineError::IllegalTransition(_)));
        }
    }

    #[test]
    fn payment_path_skips_owner_check_but_only_confirms() {
        validate_transition(
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            TransitionActor::PaymentProcessor,
        )
        .unwrap();

        let err = validate_transition(
            BookingStatus::Pending,
            BookingStatus::Cancelled,
            TransitionActor::PaymentProcessor,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::IllegalTransition(_)));
    }

    #[test]
    fn calendar_hold_set() {
        assert!(BookingStatus::Confirmed.holds_calendar());
        assert!(BookingStatus::Active.holds_calendar());
        assert!(!BookingStatus::Pending.holds_calendar());
        assert!(!BookingStatus::Cancelled.holds_calendar());
        assert!(!BookingStatus::Completed.holds_calendar());
    }
}
