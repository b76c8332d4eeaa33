//! Remote sink for flushed log batches.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, StatusCode};
use serde::Serialize;
use url::Url;

use crate::error::log::DeliveryError;

/// Destination for flushed log payloads.
///
/// The pipeline only depends on this trait so tests can swap the HTTP client for an
/// in-memory recorder driven by a paused clock.
#[async_trait]
pub trait WebhookSink: Send + Sync {
    /// Delivers one payload to `url`.
    ///
    /// # Returns
    /// - `Ok(())` - The sink accepted the payload
    /// - `Err(DeliveryError::RateLimited)` - The sink asked to back off
    /// - `Err(_)` - Any other failure, the payload is considered lost
    async fn deliver(&self, url: &Url, content: &str) -> Result<(), DeliveryError>;
}

/// JSON body accepted by Discord webhooks.
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub content: &'a str,
}

/// Discord webhook sink over a shared `reqwest::Client`.
#[derive(Clone)]
pub struct DiscordWebhook {
    client: reqwest::Client,
}

impl DiscordWebhook {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WebhookSink for DiscordWebhook {
    async fn deliver(&self, url: &Url, content: &str) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(url.clone())
            .json(&WebhookPayload { content })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(parse_retry_after);

            return Err(DeliveryError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Rejected { status, body })
    }
}

/// Longest backoff a server can request, larger values are clamped to it.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60 * 60);

/// Parses a `Retry-After` value given in (possibly fractional) seconds.
///
/// Negative, NaN and non-numeric values are ignored. Values too large for a `Duration`
/// or above `MAX_RETRY_AFTER` are clamped.
fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds = value.trim().parse::<f64>().ok()?;
    if seconds.is_nan() || seconds < 0.0 {
        return None;
    }

    let delay = Duration::try_from_secs_f64(seconds).unwrap_or(MAX_RETRY_AFTER);
    Some(delay.min(MAX_RETRY_AFTER))
}
