//! Stripe-backed [`PaymentProvider`] implementation.
//!
//! Talks to the payment-intents API over HTTP with a bounded timeout. A
//! timeout or transport error surfaces as [`EngineError::Provider`] and is
//! retryable by the caller; the gateway never retries on its own.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;
use uuid::Uuid;

use crate::{
    Currency, EngineError, ResultEngine,
    payments::{PaymentProvider, ProviderIntent, ProviderIntentStatus},
};

const DEFAULT_BASE_URL: &str = "https://api.stripe.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct StripeGateway {
    client: reqwest::Client,
    secret_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct StripeIntent {
    id: String,
    client_secret: Option<String>,
    status: String,
}

impl StripeGateway {
    pub fn new(
        secret_key: String,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> ResultEngine<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
            .build()
            .map_err(|err| EngineError::Provider(format!("failed to build client: {err}")))?;

        Ok(Self {
            client,
            secret_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    async fn parse_intent(response: reqwest::Response) -> ResultEngine<StripeIntent> {
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Provider(format!(
                "provider returned {status}"
            )));
        }
        response
            .json::<StripeIntent>()
            .await
            .map_err(|err| EngineError::Provider(format!("invalid provider response: {err}")))
    }
}

fn provider_error(err: reqwest::Error) -> EngineError {
    if err.is_timeout() {
        EngineError::Provider("provider call timed out".to_string())
    } else {
        EngineError::Provider(format!("provider call failed: {err}"))
    }
}

impl PaymentProvider for StripeGateway {
    fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: Currency,
        booking_id: Uuid,
    ) -> Pin<Box<dyn Future<Output = ResultEngine<ProviderIntent>> + Send + '_>> {
        Box::pin(async move {
            let params = [
                ("amount", amount_minor.to_string()),
                ("currency", currency.code().to_ascii_lowercase()),
                ("metadata[booking_id]", booking_id.to_string()),
            ];

            let response = self
                .client
                .post(format!("{}/v1/payment_intents", self.base_url))
                .bearer_auth(&self.secret_key)
                .form(&params)
                .send()
                .await
                .map_err(provider_error)?;

            let intent = Self::parse_intent(response).await?;
            Ok(ProviderIntent {
                status: ProviderIntentStatus::from(intent.status.as_str()),
                id: intent.id,
                client_secret: intent.client_secret,
            })
        })
    }

    fn retrieve_payment_intent(
        &self,
        provider_intent_id: &str,
    ) -> Pin<Box<dyn Future<Output = ResultEngine<ProviderIntentStatus>> + Send + '_>> {
        let url = format!(
            "{}/v1/payment_intents/{provider_intent_id}",
            self.base_url
        );
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .bearer_auth(&self.secret_key)
                .send()
                .await
                .map_err(provider_error)?;

            let intent = Self::parse_intent(response).await?;
            Ok(ProviderIntentStatus::from(intent.status.as_str()))
        })
    }
}
