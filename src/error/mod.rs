//! Error types for the bot and its log delivery pipeline.
//!
//! `AppError` is the top-level error returned from startup and from `main`. Domain
//! specific errors live in their own modules and convert into it with `#[from]`.
//! Errors raised inside Discord event handlers or flush cycles are logged with
//! `tracing` and never propagated, so only startup failures reach `AppError`.

pub mod config;
pub mod log;

use thiserror::Error;

use crate::error::{config::ConfigError, log::LogError};

/// Top-level application error type.
///
/// Aggregates all errors that can abort startup or the bot's main loop. Most
/// variants use `#[from]` for automatic conversion with `?`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error while loading environment variables.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Local log sink could not be opened or written.
    ///
    /// Indicates a broken log directory or filesystem, the bot cannot run
    /// without its durable log.
    #[error(transparent)]
    LogErr(#[from] LogError),

    /// HTTP client construction error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// I/O error, e.g. while spawning the site process.
    #[error(transparent)]
    IoErr(#[from] std::io::Error),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
