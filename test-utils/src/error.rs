use thiserror::Error;

/// Errors that can occur while setting up or inspecting a test environment.
#[derive(Error, Debug)]
pub enum TestError {
    /// Temporary directory or log file access failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A recorded webhook request body was not valid JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A webhook helper was used on a context built without a mock server.
    ///
    /// Call `with_webhook_server()` or `with_webhook()` on the builder.
    #[error("Test context has no mock webhook server")]
    NoWebhookServer,

    /// The mock server was started with request recording disabled.
    #[error("Mock webhook server is not recording requests")]
    RecordingDisabled,

    /// A recorded webhook body had no string `content` field.
    #[error("Webhook request body has no content field: {0}")]
    MissingContent(String),
}
