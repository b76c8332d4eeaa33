use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};
use url::Url;

/// Log channel for the bot's own events.
pub const BOT_CHANNEL: &str = "bot";
/// Log channel for output of the supervised site process.
pub const SITE_CHANNEL: &str = "site";

/// Discord's limit on message content length, in characters.
pub const DISCORD_CONTENT_LIMIT: usize = 2000;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single timestamped log line.
///
/// Entries are immutable once created. The formatted line is computed up front so the
/// local file and the webhook payload always carry the exact same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    line: String,
}

impl LogEntry {
    /// Creates an entry stamped with the current local time.
    pub fn now(message: &str) -> Self {
        Self::at(Local::now(), message)
    }

    /// Creates an entry with an explicit timestamp.
    pub fn at(timestamp: DateTime<Local>, message: &str) -> Self {
        Self {
            line: format!("[{}] {}", timestamp.format(TIMESTAMP_FORMAT), message),
        }
    }

    /// Formatted line, `[YYYY-MM-DD HH:MM:SS] message`.
    pub fn line(&self) -> &str {
        &self.line
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

/// Startup configuration of one log channel.
///
/// A channel without a webhook still logs locally but never issues HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    pub name: String,
    pub webhook: Option<Url>,
}

impl ChannelConfig {
    pub fn new(name: impl Into<String>, webhook: Option<Url>) -> Self {
        Self {
            name: name.into(),
            webhook,
        }
    }
}

/// Timing and sizing of flush cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushSettings {
    /// Wait before draining the pending queue so near-simultaneous records coalesce
    pub debounce: Duration,
    /// Wait after a rate-limited send before the cycle runs again
    pub retry_backoff: Duration,
    /// Upper bound on a single webhook request
    pub send_timeout: Duration,
    /// Rate-limited attempts allowed for one batch before it is dropped
    pub max_retries: u32,
    /// Maximum characters per webhook payload
    pub max_payload_chars: usize,
}

impl Default for FlushSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            retry_backoff: Duration::from_secs(5),
            send_timeout: Duration::from_secs(10),
            max_retries: 5,
            max_payload_chars: DISCORD_CONTENT_LIMIT,
        }
    }
}

/// Flush state of a log channel.
///
/// Anything other than `Idle` means a flush cycle currently owns the channel and new
/// records only append to the pending queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPhase {
    Idle,
    Flushing,
    RetryWait,
}
