//! Flush cycle of a single log channel.
//!
//! A cycle debounces, drains the channel's queue and sends the batch, then loops so
//! lines recorded during the send go out in the same cycle. It ends as soon as a
//! debounce finds the queue empty. Rate-limited sends put the unsent lines back at the
//! head of the queue and wait out a backoff; any other failure drops the batch.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::log::DeliveryError;
use crate::model::log::{ChannelPhase, FlushSettings, LogEntry};

use super::{channel::LogChannel, payload::split_batch, webhook::WebhookSink, PipelineInner};

/// Result of sending one drained batch.
enum BatchOutcome {
    Delivered,
    RateLimited {
        /// Entries of the throttled payload and every payload after it
        unsent: Vec<LogEntry>,
        retry_after: Option<Duration>,
    },
    Failed {
        dropped: usize,
        error: DeliveryError,
    },
}

pub(super) async fn run_cycle(inner: Arc<PipelineInner>, channel: Arc<LogChannel>, url: Url) {
    let settings = inner.settings;
    let mut rate_limited_attempts = 0u32;

    loop {
        if !wait(&inner.shutdown, settings.debounce).await {
            channel.finish();
            return;
        }

        let Some(batch) = channel.take_batch() else {
            return;
        };
        let count = batch.len();

        match send_batch(inner.sink.as_ref(), &url, batch, &settings).await {
            BatchOutcome::Delivered => {
                rate_limited_attempts = 0;
                tracing::info!(
                    channel = channel.name(),
                    "Delivered {} log lines to webhook",
                    count
                );
            }
            BatchOutcome::RateLimited {
                unsent,
                retry_after,
            } => {
                rate_limited_attempts += 1;

                if rate_limited_attempts > settings.max_retries {
                    tracing::error!(
                        channel = channel.name(),
                        "Dropping {} log lines after {} rate limited attempts",
                        unsent.len(),
                        rate_limited_attempts
                    );
                    rate_limited_attempts = 0;
                    continue;
                }

                let delay = retry_after
                    .map_or(settings.retry_backoff, |after| after.max(settings.retry_backoff));
                tracing::warn!(
                    channel = channel.name(),
                    "Webhook rate limited, retrying {} log lines in {:?}",
                    unsent.len(),
                    delay
                );

                channel.requeue_front(unsent);
                if !wait(&inner.shutdown, delay).await {
                    channel.finish();
                    return;
                }
                channel.set_phase(ChannelPhase::Flushing);
            }
            BatchOutcome::Failed { dropped, error } => {
                rate_limited_attempts = 0;
                tracing::error!(
                    channel = channel.name(),
                    "Failed to deliver logs to webhook, dropping {} lines: {}",
                    dropped,
                    error
                );
            }
        }
    }
}

/// Sends a batch as one or more payloads, stopping at the first failure.
async fn send_batch(
    sink: &dyn WebhookSink,
    url: &Url,
    batch: Vec<LogEntry>,
    settings: &FlushSettings,
) -> BatchOutcome {
    let mut payloads = split_batch(batch, settings.max_payload_chars).into_iter();

    while let Some(payload) = payloads.next() {
        let result = match timeout(settings.send_timeout, sink.deliver(url, &payload.content)).await
        {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::TimedOut(settings.send_timeout)),
        };

        match result {
            Ok(()) => {}
            Err(DeliveryError::RateLimited { retry_after }) => {
                let unsent = payload
                    .entries
                    .into_iter()
                    .chain(payloads.by_ref().flat_map(|rest| rest.entries))
                    .collect();

                return BatchOutcome::RateLimited {
                    unsent,
                    retry_after,
                };
            }
            Err(error) => {
                let dropped = payload.entries.len()
                    + payloads.by_ref().map(|rest| rest.entries.len()).sum::<usize>();

                return BatchOutcome::Failed { dropped, error };
            }
        }
    }

    BatchOutcome::Delivered
}

/// Sleeps for `duration` unless the pipeline shuts down first.
///
/// # Returns
/// - `true` - The full duration elapsed
/// - `false` - Shutdown was requested
async fn wait(shutdown: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = shutdown.cancelled() => false,
        _ = sleep(duration) => true,
    }
}
