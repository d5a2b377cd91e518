//! Error taxonomy shared by adapters, the contrast validator and the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single producer invocation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("Producer timed out")]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed producer output: {0}")]
    MalformedOutput(String),
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AdapterError::Timeout
        } else if err.is_decode() {
            AdapterError::MalformedOutput(err.to_string())
        } else {
            AdapterError::Transport(err.to_string())
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContrastError {
    #[error("Invalid color format: {0:?} (expected 6 hex digits, optional leading '#')")]
    InvalidColorFormat(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing required config value: {0}")]
    Missing(&'static str),

    #[error("Invalid config value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Analysis,
    Logos,
    Mockups,
    Imagery,
    Cancelled,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Analysis => "analysis",
            Phase::Logos => "logos",
            Phase::Mockups => "mockups",
            Phase::Imagery => "imagery",
            Phase::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineCause {
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Contrast(#[from] ContrastError),

    #[error("run was cancelled")]
    Cancelled,
}

/// A mandatory phase failed; no package is produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Pipeline failed in phase '{phase}': {cause}")]
pub struct PipelineError {
    pub phase: Phase,
    #[source]
    pub cause: PipelineCause,
}

impl PipelineError {
    pub fn new(phase: Phase, cause: impl Into<PipelineCause>) -> Self {
        Self {
            phase,
            cause: cause.into(),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            phase: Phase::Cancelled,
            cause: PipelineCause::Cancelled,
        }
    }

    /// The underlying adapter failure, if that is what ended the run.
    pub fn adapter_error(&self) -> Option<&AdapterError> {
        match &self.cause {
            PipelineCause::Adapter(e) => Some(e),
            _ => None,
        }
    }
}
