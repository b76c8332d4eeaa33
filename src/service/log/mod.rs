//! Log delivery pipeline.
//!
//! Application code records lines into named log channels ("bot", "site"). Every line
//! is written synchronously to the per-run local log file. Channels configured with a
//! Discord webhook additionally queue the line and flush the queue in batches:
//!
//! - **Debounce** - a flush cycle waits briefly so bursts of records share one request
//! - **Single cycle** - a channel never has more than one flush cycle in flight
//! - **Rate limits** - a 429 puts the unsent lines back at the head of the queue and the
//!   cycle retries after a backoff
//! - **Failures** - any other delivery error is logged and the batch dropped
//!
//! Remote delivery errors never reach callers of `record`; only local sink failures do.
//!
//! # Channel states
//!
//! `Idle -> Flushing -> (Idle | RetryWait -> Flushing)`

mod channel;
mod flush;
pub mod local;
pub mod payload;
pub mod webhook;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::log::LogError;
use crate::model::log::{ChannelConfig, ChannelPhase, FlushSettings, LogEntry};

use self::{channel::LogChannel, local::LocalLog, webhook::WebhookSink};

/// Handle to a log delivery pipeline.
///
/// Cheap to clone; all clones share the same channels, local log and webhook sink.
#[derive(Clone)]
pub struct LogPipeline {
    inner: Arc<PipelineInner>,
}

pub(crate) struct PipelineInner {
    channels: HashMap<String, Arc<LogChannel>>,
    local: LocalLog,
    sink: Arc<dyn WebhookSink>,
    settings: FlushSettings,
    shutdown: CancellationToken,
}

impl LogPipeline {
    /// Creates a pipeline owning the given channels.
    ///
    /// # Arguments
    /// - `channels` - Channel names with their optional webhook URLs
    /// - `local` - Durable local sink receiving every recorded line
    /// - `sink` - Remote sink used by flush cycles
    /// - `settings` - Debounce, backoff, timeout and payload limits
    pub fn new(
        channels: Vec<ChannelConfig>,
        local: LocalLog,
        sink: Arc<dyn WebhookSink>,
        settings: FlushSettings,
    ) -> Self {
        let channels = channels
            .into_iter()
            .map(|config| (config.name.clone(), Arc::new(LogChannel::new(config))))
            .collect();

        Self {
            inner: Arc::new(PipelineInner {
                channels,
                local,
                sink,
                settings,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Records a message into a log channel.
    ///
    /// The message is timestamped and written to the local log before anything else. If
    /// the channel has a webhook the entry is queued and, when the channel is idle, a
    /// flush cycle is spawned on the current tokio runtime. Unknown channels and channels
    /// without a webhook only log locally.
    ///
    /// # Arguments
    /// - `channel` - Name of the log channel, e.g. `"bot"`
    /// - `message` - Message text, timestamped by this call
    ///
    /// # Returns
    /// - `Ok(())` - Line written locally (and queued for delivery if applicable)
    /// - `Err(LogError::LocalSinkWriteFailed)` - The local write failed, nothing was queued
    pub fn record(&self, channel: &str, message: impl AsRef<str>) -> Result<(), LogError> {
        let entry = LogEntry::now(message.as_ref());
        self.inner.local.append(channel, entry.line())?;

        let Some(log_channel) = self.inner.channels.get(channel) else {
            tracing::warn!("Recorded line for unknown log channel '{}'", channel);
            return Ok(());
        };

        let Some(url) = log_channel.webhook() else {
            return Ok(());
        };

        if self.inner.shutdown.is_cancelled() {
            return Ok(());
        }

        log_channel.push(entry, || {
            tokio::spawn(flush::run_cycle(
                self.inner.clone(),
                log_channel.clone(),
                url.clone(),
            ))
        });

        Ok(())
    }

    /// Current flush state of a channel, `None` for unknown channels.
    pub fn phase(&self, channel: &str) -> Option<ChannelPhase> {
        self.inner.channels.get(channel).map(|c| c.phase())
    }

    /// Number of entries waiting for delivery, `None` for unknown channels.
    pub fn pending_len(&self, channel: &str) -> Option<usize> {
        self.inner.channels.get(channel).map(|c| c.pending_len())
    }

    /// Names of all configured channels.
    pub fn channels(&self) -> Vec<&str> {
        self.inner.channels.keys().map(String::as_str).collect()
    }

    /// Path of the per-run local log file.
    pub fn log_path(&self) -> &Path {
        self.inner.local.path()
    }

    /// Stops all flush cycles.
    ///
    /// Cancels armed debounce and backoff waits, then waits for running cycles to exit.
    /// A send already in progress finishes (bounded by the send timeout). Pending entries
    /// stay queued and later records only write locally.
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();

        let cycles: Vec<_> = self
            .inner
            .channels
            .values()
            .filter_map(|channel| channel.take_cycle())
            .collect();

        for cycle in cycles {
            if let Err(e) = cycle.await {
                tracing::warn!("Flush cycle ended abnormally during shutdown: {}", e);
            }
        }

        for channel in self.inner.channels.values() {
            channel.finish();
        }
    }
}

#[cfg(test)]
mod test;
