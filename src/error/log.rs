use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the local durable log sink.
///
/// These are the only log pipeline errors that reach callers of
/// `LogPipeline::record`, remote delivery problems are contained in the
/// flush cycle.
#[derive(Error, Debug)]
pub enum LogError {
    /// The per-run log file or its directory could not be created.
    #[error("Failed to open local log file {path}: {source}")]
    LocalSinkOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Appending a line to the per-run log file failed.
    #[error("Failed to write to local log file {path}: {source}")]
    LocalSinkWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to deliver one payload to a webhook.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// The webhook answered 429 Too Many Requests.
    ///
    /// Recovered by the flush cycle with a backoff retry.
    #[error("Webhook rate limited the request")]
    RateLimited {
        /// Delay requested by the `Retry-After` header, if any
        retry_after: Option<Duration>,
    },

    /// The webhook answered with a non-success status other than 429.
    #[error("Webhook rejected the request with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },

    /// The request never produced a response.
    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request did not complete within the send timeout.
    #[error("Webhook request timed out after {0:?}")]
    TimedOut(Duration),
}
