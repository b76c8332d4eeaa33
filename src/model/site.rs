use std::fmt;

use chrono::{DateTime, Utc};

/// Lifecycle of the supervised site process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteStatus {
    /// No `SITE_COMMAND` was configured
    NotConfigured,
    Running {
        pid: Option<u32>,
        since: DateTime<Utc>,
    },
    Exited {
        /// Exit code, `None` when the process was killed by a signal
        code: Option<i32>,
        at: DateTime<Utc>,
    },
    FailedToStart {
        reason: String,
    },
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "not configured"),
            Self::Running {
                pid: Some(pid),
                since,
            } => write!(f, "running (pid {}) since {}", pid, since.format("%Y-%m-%d %H:%M:%S UTC")),
            Self::Running { pid: None, since } => {
                write!(f, "running since {}", since.format("%Y-%m-%d %H:%M:%S UTC"))
            }
            Self::Exited { code: Some(code), at } => write!(
                f,
                "exited with code {} at {}",
                code,
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::Exited { code: None, at } => write!(
                f,
                "terminated by signal at {}",
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            Self::FailedToStart { reason } => write!(f, "failed to start: {}", reason),
        }
    }
}
