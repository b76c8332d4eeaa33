use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wiremock::MockServer;

use crate::{error::TestError, webhook::webhook_path};

/// Test environment with a temporary log directory and optional mock webhook server.
///
/// The log directory is removed when the context is dropped.
pub struct TestContext {
    log_dir: TempDir,
    server: Option<MockServer>,
}

impl TestContext {
    pub fn new(log_dir: TempDir, server: Option<MockServer>) -> Self {
        Self { log_dir, server }
    }

    /// Directory to create the per-run log file in.
    pub fn log_dir(&self) -> &Path {
        self.log_dir.path()
    }

    pub fn server(&self) -> Result<&MockServer, TestError> {
        self.server.as_ref().ok_or(TestError::NoWebhookServer)
    }

    /// Full webhook URL of a log channel on the mock server.
    pub fn webhook_url(&self, channel: &str) -> Result<String, TestError> {
        Ok(format!("{}{}", self.server()?.uri(), webhook_path(channel)))
    }

    /// `content` fields of every POST received on a channel's webhook, in arrival order.
    ///
    /// # Returns
    /// - `Ok(Vec<String>)` - Delivered payloads, empty if nothing arrived
    /// - `Err(TestError::NoWebhookServer)` - Context was built without a mock server
    /// - `Err(TestError::MissingContent)` - A request body had no `content` string
    pub async fn payloads(&self, channel: &str) -> Result<Vec<String>, TestError> {
        let requests = self
            .server()?
            .received_requests()
            .await
            .ok_or(TestError::RecordingDisabled)?;
        let expected_path = webhook_path(channel);

        requests
            .iter()
            .filter(|request| request.url.path() == expected_path)
            .map(|request| {
                let body: serde_json::Value = serde_json::from_slice(&request.body)?;
                body.get("content")
                    .and_then(|content| content.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| TestError::MissingContent(body.to_string()))
            })
            .collect()
    }

    /// Log files in the log directory, sorted by name.
    pub fn log_files(&self) -> Result<Vec<PathBuf>, TestError> {
        let mut files = fs::read_dir(self.log_dir())?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()?;
        files.retain(|path| path.extension().is_some_and(|ext| ext == "log"));
        files.sort();
        Ok(files)
    }

    /// Concatenated contents of every log file in the log directory.
    pub fn read_logs(&self) -> Result<String, TestError> {
        let mut contents = String::new();
        for file in self.log_files()? {
            contents.push_str(&fs::read_to_string(file)?);
        }
        Ok(contents)
    }
}
