//! Supervision of the secondary web server.
//!
//! The site runs as a child process started from `SITE_COMMAND`. Its stdout and stderr
//! are forwarded line by line into the `site` log channel, and its lifecycle (start,
//! exit, spawn failure) is reported on the `bot` channel. There is no restart policy:
//! once the process exits it stays down until the bot restarts.

use std::process::Stdio;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::model::log::{BOT_CHANNEL, SITE_CHANNEL};
use crate::model::site::SiteStatus;
use crate::service::log::LogPipeline;

/// Starts the site process and tracks its status.
///
/// Cheap to clone; clones share the same status.
#[derive(Clone)]
pub struct SiteSupervisor {
    pipeline: LogPipeline,
    status: Arc<RwLock<SiteStatus>>,
}

/// Handle to a running site process.
pub struct SiteHandle {
    watcher: JoinHandle<SiteStatus>,
}

impl SiteHandle {
    /// Waits for the process to exit and its output to be fully recorded.
    pub async fn wait(self) -> SiteStatus {
        match self.watcher.await {
            Ok(status) => status,
            Err(e) => SiteStatus::FailedToStart {
                reason: format!("site watcher task failed: {}", e),
            },
        }
    }
}

impl SiteSupervisor {
    pub fn new(pipeline: LogPipeline) -> Self {
        Self {
            pipeline,
            status: Arc::new(RwLock::new(SiteStatus::NotConfigured)),
        }
    }

    pub fn status(&self) -> SiteStatus {
        self.status.read().clone()
    }

    /// Spawns the site process through the platform shell.
    ///
    /// Output lines are recorded on the `site` channel as they arrive. When the process
    /// exits, remaining output is drained before the exit is recorded on the `bot`
    /// channel, so the exit line always comes last.
    ///
    /// # Arguments
    /// - `command_line` - Shell command line, e.g. `node site/index.js`
    ///
    /// # Returns
    /// - `Ok(SiteHandle)` - Process started, status is `Running`
    /// - `Err(AppError::IoErr)` - The process could not be spawned, status is `FailedToStart`
    pub fn start(&self, command_line: &str) -> Result<SiteHandle, AppError> {
        let mut command = shell_command(command_line);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                *self.status.write() = SiteStatus::FailedToStart {
                    reason: e.to_string(),
                };
                self.record_bot(&format!("Failed to start site process: {}", e));
                return Err(e.into());
            }
        };

        let pid = child.id();
        *self.status.write() = SiteStatus::Running {
            pid,
            since: Utc::now(),
        };
        match pid {
            Some(pid) => self.record_bot(&format!("Site process started (pid {})", pid)),
            None => self.record_bot("Site process started"),
        }

        let forwarders: Vec<JoinHandle<()>> = [
            child
                .stdout
                .take()
                .map(|stdout| tokio::spawn(forward_lines(self.pipeline.clone(), stdout))),
            child
                .stderr
                .take()
                .map(|stderr| tokio::spawn(forward_lines(self.pipeline.clone(), stderr))),
        ]
        .into_iter()
        .flatten()
        .collect();

        let supervisor = self.clone();
        let watcher = tokio::spawn(async move {
            let exit = child.wait().await;

            for forwarder in forwarders {
                if let Err(e) = forwarder.await {
                    tracing::warn!("Site output forwarder failed: {}", e);
                }
            }

            let code = match exit {
                Ok(exit) => exit.code(),
                Err(e) => {
                    tracing::error!("Failed to wait for site process: {}", e);
                    None
                }
            };
            let status = SiteStatus::Exited {
                code,
                at: Utc::now(),
            };

            *supervisor.status.write() = status.clone();
            supervisor.record_bot(&format!("Site process {}", status));

            status
        });

        Ok(SiteHandle { watcher })
    }

    fn record_bot(&self, message: &str) {
        if let Err(e) = self.pipeline.record(BOT_CHANNEL, message) {
            tracing::error!("Failed to record site lifecycle event: {}", e);
        }
    }
}

#[cfg(unix)]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line);
    command
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(command_line);
    command
}

/// Records every line read from `reader` on the `site` channel until EOF.
async fn forward_lines<R>(pipeline: LogPipeline, reader: R)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if let Err(e) = pipeline.record(SITE_CHANNEL, &line) {
                    tracing::error!("Failed to record site output: {}", e);
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Stopped reading site output: {}", e);
                break;
            }
        }
    }
}
