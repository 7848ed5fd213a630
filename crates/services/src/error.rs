//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use gateway::ApiError;

/// Errors emitted by the practice session controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("answer is incomplete")]
    IncompleteAnswer,
    #[error("a submission is already in flight")]
    SubmissionPending,
    #[error("session already completed")]
    Completed,
    #[error("no hearts left")]
    HeartsExhausted,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PracticeError {
    /// Collapses the backend's hearts refusal into the local variant.
    #[must_use]
    pub fn from_api(err: ApiError) -> Self {
        match err {
            ApiError::HeartsExhausted => Self::HeartsExhausted,
            other => Self::Api(other),
        }
    }
}

/// Errors emitted while loading `PracticeConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}
