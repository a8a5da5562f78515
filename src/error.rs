// src/error.rs

use std::{io, path::PathBuf};
use thiserror::Error;

/// Failures a pipeline stage can report to the driver.
///
/// `Fetch` and `MalformedResult` are recoverable: the driver degrades to an
/// empty table. `Write` is not.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("fetch failed after {attempts} attempts (last status: {}): {detail}", display_status(.status))]
    Fetch {
        attempts: u32,
        status: Option<u16>,
        detail: String,
    },

    #[error("malformed result envelope: {0}")]
    MalformedResult(#[from] serde_json::Error),

    #[error("writing {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    /// Whether the driver may substitute an empty table for this failure.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, PipelineError::Write { .. })
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PipelineError::Write {
            path: path.into(),
            source,
        }
    }
}

fn display_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

/// Invalid startup configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{var}: cannot parse {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(var: &'static str, value: &str, reason: impl ToString) -> Self {
        ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}
