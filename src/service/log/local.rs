//! Per-run append-only log file.
//!
//! Every line recorded through the pipeline lands here before any remote delivery is
//! attempted. One file is created per process run and never rotated or truncated.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use crate::error::log::LogError;

const FILE_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Durable local sink writing to a file and echoing to the console.
pub struct LocalLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl LocalLog {
    /// Creates the log file for this run inside `dir`.
    ///
    /// The file name is derived from the current local time. The directory is created
    /// if it does not exist yet.
    ///
    /// # Arguments
    /// - `dir` - Directory holding the per-run log files
    ///
    /// # Returns
    /// - `Ok(LocalLog)` - Sink ready for appends
    /// - `Err(LogError::LocalSinkOpenFailed)` - Directory or file could not be created
    pub fn create(dir: &Path) -> Result<Self, LogError> {
        fs::create_dir_all(dir).map_err(|source| LogError::LocalSinkOpenFailed {
            path: dir.to_path_buf(),
            source,
        })?;

        let name = format!("{}.log", Local::now().format(FILE_NAME_FORMAT));
        Self::open(dir.join(name))
    }

    /// Opens an explicit file in append mode, creating it if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogError::LocalSinkOpenFailed {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line synchronously and echoes it to the console.
    ///
    /// # Returns
    /// - `Ok(())` - Line written to the file
    /// - `Err(LogError::LocalSinkWriteFailed)` - The write failed, nothing is echoed
    pub fn append(&self, channel: &str, line: &str) -> Result<(), LogError> {
        {
            let mut file = self.file.lock();
            let mut buf = String::with_capacity(line.len() + 1);
            buf.push_str(line);
            buf.push('\n');
            file.write_all(buf.as_bytes())
                .map_err(|source| LogError::LocalSinkWriteFailed {
                    path: self.path.clone(),
                    source,
                })?;
        }

        tracing::info!(target: "hookline::log", channel, "{}", line);

        Ok(())
    }
}
