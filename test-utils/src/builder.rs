use tempfile::TempDir;
use wiremock::MockServer;

use crate::{context::TestContext, error::TestError, webhook};

/// Canned webhook behaviour to mount once the mock server is running.
enum WebhookSetup {
    Status { channel: String, status: u16 },
    RateLimit { channel: String, times: u64 },
}

/// Builder for creating test contexts.
///
/// Every context gets a fresh temporary log directory. Adding any webhook setup also
/// starts a mock webhook server.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
///
/// let test = TestBuilder::new()
///     .with_webhook("bot", 204)
///     .with_rate_limit("bot", 1)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    webhook_server: bool,
    setups: Vec<WebhookSetup>,
}

impl TestBuilder {
    /// Creates a new builder without a webhook server.
    pub fn new() -> Self {
        Self {
            webhook_server: false,
            setups: Vec::new(),
        }
    }

    /// Starts a mock webhook server with no responses mounted.
    ///
    /// Unmatched requests get wiremock's default 404, which the pipeline treats as a
    /// delivery failure.
    pub fn with_webhook_server(mut self) -> Self {
        self.webhook_server = true;
        self
    }

    /// Answers every POST to the channel's webhook with `status`.
    ///
    /// # Arguments
    /// - `channel` - Log channel name, served at `/webhooks/<channel>`
    /// - `status` - HTTP status returned, e.g. 204 for Discord's success response
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_webhook(mut self, channel: &str, status: u16) -> Self {
        self.webhook_server = true;
        self.setups.push(WebhookSetup::Status {
            channel: channel.to_string(),
            status,
        });
        self
    }

    /// Answers the next `times` POSTs to the channel's webhook with 429.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_rate_limit(mut self, channel: &str, times: u64) -> Self {
        self.webhook_server = true;
        self.setups.push(WebhookSetup::RateLimit {
            channel: channel.to_string(),
            times,
        });
        self
    }

    /// Builds the test context.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Context with log directory and optional mock server
    /// - `Err(TestError::Io)` - The temporary log directory could not be created
    pub async fn build(self) -> Result<TestContext, TestError> {
        let log_dir = TempDir::new()?;

        let server = if self.webhook_server {
            let server = MockServer::start().await;
            for setup in &self.setups {
                match setup {
                    WebhookSetup::Status { channel, status } => {
                        webhook::mount_status(&server, channel, *status).await
                    }
                    WebhookSetup::RateLimit { channel, times } => {
                        webhook::mount_rate_limit(&server, channel, *times, None).await
                    }
                }
            }
            Some(server)
        } else {
            None
        };

        Ok(TestContext::new(log_dir, server))
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
