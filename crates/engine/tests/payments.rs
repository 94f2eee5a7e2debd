use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    BookingStatus, Currency, Engine, EngineError, PaymentIntentStatus, PaymentProvider,
    ProviderIntent, ProviderIntentStatus,
};
use migration::MigratorTrait;

/// In-memory provider whose reported intent status is set per test.
struct MockProvider {
    status: Mutex<&'static str>,
    created: AtomicUsize,
}

impl MockProvider {
    fn new() -> Self {
        Self {
            status: Mutex::new("requires_confirmation"),
            created: AtomicUsize::new(0),
        }
    }

    fn set_status(&self, status: &'static str) {
        *self.status.lock().unwrap() = status;
    }
}

impl PaymentProvider for MockProvider {
    fn create_payment_intent(
        &self,
        _amount_minor: i64,
        _currency: Currency,
        _booking_id: Uuid,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderIntent, EngineError>> + Send + '_>> {
        let n = self.created.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            Ok(ProviderIntent {
                id: format!("pi_{n}"),
                client_secret: Some(format!("pi_{n}_secret")),
                status: ProviderIntentStatus::Other("requires_confirmation".to_string()),
            })
        })
    }

    fn retrieve_payment_intent(
        &self,
        _provider_intent_id: &str,
    ) -> Pin<Box<dyn Future<Output = Result<ProviderIntentStatus, EngineError>> + Send + '_>> {
        let status = *self.status.lock().unwrap();
        Box::pin(async move { Ok(ProviderIntentStatus::from(status)) })
    }
}

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    for username in ["alice", "bob", "carol"] {
        db.execute(Statement::from_sql_and_values(
            backend,
            "INSERT INTO users (username, password) VALUES (?, ?)",
            vec![username.into(), "password".into()],
        ))
        .await
        .unwrap();
    }
    let engine = Engine::builder().database(db.clone()).build();
    (engine, db)
}

async fn seed_item(db: &DatabaseConnection, owner: &str, daily_rate_minor: i64) -> Uuid {
    let id = Uuid::new_v4();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO items (id, name, owner_id, daily_rate_minor, currency, listed) \
         VALUES (?, ?, ?, ?, ?, ?)",
        vec![
            id.to_string().into(),
            "Baitcasting reel".into(),
            owner.into(),
            daily_rate_minor.into(),
            "EUR".into(),
            true.into(),
        ],
    ))
    .await
    .unwrap();
    id
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, day).unwrap()
}

#[tokio::test]
async fn intent_for_pending_booking_returns_client_secret() {
    let (engine, db) = engine_with_db().await;
    let item_id = seed_item(&db, "alice", 100).await;
    let provider = MockProvider::new();

    let booking = engine
        .create_booking("bob", item_id, date(5), date(7))
        .await
        .unwrap();

    let intent = engine
        .create_payment_intent(&provider, booking.id, booking.amount_minor, Currency::Eur)
        .await
        .unwrap();

    assert_eq!(intent.booking_id, booking.id);
    assert_eq!(intent.status, PaymentIntentStatus::Pending);
    assert_eq!(intent.provider_intent_id, "pi_0");
    assert_eq!(intent.client_secret.as_deref(), Some("pi_0_secret"));
}

#[tokio::test]
async fn intent_requires_a_pending_booking() {
    let (engine, db) = engine_with_db().await;
    let item_id = seed_item(&db, "alice", 100).await;
    let provider = MockProvider::new();

    let err = engine
        .create_payment_intent(&provider, Uuid::new_v4(), 200, Currency::Eur)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let booking = engine
        .create_booking("bob", item_id, date(5), date(7))
        .await
        .unwrap();
    engine
        .update_booking_status(booking.id, BookingStatus::Cancelled, "alice")
        .await
        .unwrap();

    let err = engine
        .create_payment_intent(&provider, booking.id, booking.amount_minor, Currency::Eur)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
    assert_eq!(provider.created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn retries_create_separate_intents() {
    let (engine, db) = engine_with_db().await;
    let item_id = seed_item(&db, "alice", 100).await;
    let provider = MockProvider::new();

    let booking = engine
        .create_booking("bob", item_id, date(5), date(7))
        .await
        .unwrap();

    let first = engine
        .create_payment_intent(&provider, booking.id, booking.amount_minor, Currency::Eur)
        .await
        .unwrap();
    let second = engine
        .create_payment_intent(&provider, booking.id, booking.amount_minor, Currency::Eur)
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert_ne!(first.provider_intent_id, second.provider_intent_id);
}

#[tokio::test]
async fn succeeded_payment_confirms_the_booking() {
    let (engine, db) = engine_with_db().await;
    let item_id = seed_item(&db, "alice", 100).await;
    let provider = MockProvider::new();

    let booking = engine
        .create_booking("bob", item_id, date(5), date(7))
        .await
        .unwrap();
    let intent = engine
        .create_payment_intent(&provider, booking.id, booking.amount_minor, Currency::Eur)
        .await
        .unwrap();

    provider.set_status("succeeded");
    let settled = engine
        .confirm_payment(&provider, &intent.provider_intent_id)
        .await
        .unwrap();

    assert_eq!(settled.status, PaymentIntentStatus::Succeeded);
    let fetched = engine.booking(booking.id).await.unwrap();
    assert_eq!(fetched.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn repeated_confirmation_is_settled_once() {
    let (engine, db) = engine_with_db().await;
    let item_id = seed_item(&db, "alice", 100).await;
    let provider = MockProvider::new();

    let booking = engine
        .create_booking("bob", item_id, date(5), date(7))
        .await
        .unwrap();
    let intent = engine
        .create_payment_intent(&provider, booking.id, booking.amount_minor, Currency::Eur)
        .await
        .unwrap();

    provider.set_status("succeeded");
    engine
        .confirm_payment(&provider, &intent.provider_intent_id)
        .await
        .unwrap();

    // A webhook retry must not attempt the booking transition again.
    let settled = engine
        .confirm_payment(&provider, &intent.provider_intent_id)
        .await
        .unwrap();
    assert_eq!(settled.status, PaymentIntentStatus::Succeeded);

    let fetched = engine.booking(booking.id).await.unwrap();
    assert_eq!(fetched.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn canceled_payment_fails_and_leaves_booking_pending() {
    let (engine, db) = engine_with_db().await;
    let item_id = seed_item(&db, "alice", 100).await;
    let provider = MockProvider::new();

    let booking = engine
        .create_booking("bob", item_id, date(5), date(7))
        .await
        .unwrap();
    let intent = engine
        .create_payment_intent(&provider, booking.id, booking.amount_minor, Currency::Eur)
        .await
        .unwrap();

    provider.set_status("canceled");
    let err = engine
        .confirm_payment(&provider, &intent.provider_intent_id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::PaymentFailed(_)));

    let fetched = engine.booking(booking.id).await.unwrap();
    assert_eq!(fetched.status, BookingStatus::Pending);
}

#[tokio::test]
async fn requires_payment_method_fails_the_intent() {
    let (engine, db) = engine_with_db().await;
    let item_id = seed_item(&db, "alice", 100).await;
    let provider = MockProvider::new();

    let booking = engine
        .create_booking("bob", item_id, date(5), date(7))
        .await
        .unwrap();
    let intent = engine
        .create_payment_intent(&provider, booking.id, booking.amount_minor, Currency::Eur)
        .await
        .unwrap();

    provider.set_status("requires_payment_method");
    let err = engine
        .confirm_payment(&provider, &intent.provider_intent_id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::PaymentFailed(_)));

    // The renter can retry with a fresh intent.
    engine
        .create_payment_intent(&provider, booking.id, booking.amount_minor, Currency::Eur)
        .await
        .unwrap();
}

#[tokio::test]
async fn inconclusive_provider_status_changes_nothing() {
    let (engine, db) = engine_with_db().await;
    let item_id = seed_item(&db, "alice", 100).await;
    let provider = MockProvider::new();

    let booking = engine
        .create_booking("bob", item_id, date(5), date(7))
        .await
        .unwrap();
    let intent = engine
        .create_payment_intent(&provider, booking.id, booking.amount_minor, Currency::Eur)
        .await
        .unwrap();

    provider.set_status("processing");
    let unchanged = engine
        .confirm_payment(&provider, &intent.provider_intent_id)
        .await
        .unwrap();

    assert_eq!(unchanged.status, PaymentIntentStatus::Pending);
    let fetched = engine.booking(booking.id).await.unwrap();
    assert_eq!(fetched.status, BookingStatus::Pending);
}

#[tokio::test]
async fn unknown_provider_intent_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let provider = MockProvider::new();

    let err = engine
        .confirm_payment(&provider, "pi_missing")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn racing_paid_confirmations_settle_first_wins() {
    let (engine, db) = engine_with_db().await;
    let item_id = seed_item(&db, "alice", 100).await;
    let provider = MockProvider::new();

    let first = engine
        .create_booking("bob", item_id, date(5), date(10))
        .await
        .unwrap();
    let second = engine
        .create_booking("carol", item_id, date(8), date(12))
        .await
        .unwrap();

    let first_intent = engine
        .create_payment_intent(&provider, first.id, first.amount_minor, Currency::Eur)
        .await
        .unwrap();
    let second_intent = engine
        .create_payment_intent(&provider, second.id, second.amount_minor, Currency::Eur)
        .await
        .unwrap();

    provider.set_status("succeeded");
    engine
        .confirm_payment(&provider, &first_intent.provider_intent_id)
        .await
        .unwrap();

    // Both charges went through at the provider, but only the first may
    // take the calendar. The second confirmation rolls back whole.
    let err = engine
        .confirm_payment(&provider, &second_intent.provider_intent_id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unavailable(_)));

    let fetched = engine.booking(second.id).await.unwrap();
    assert_eq!(fetched.status, BookingStatus::Pending);
}
