//! Client error model.

use std::time::Duration;

use catalogdesk_core::DomainError;

/// Every way a catalog operation can fail. None of them is fatal: the
/// controller that returned it stays usable.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Local input problem; nothing was sent.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The operation needs a bearer credential and none is configured.
    #[error("not signed in: no bearer credential configured")]
    MissingCredential,
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    /// Well-formed response with `success: false`.
    #[error("rejected by backend: {0}")]
    Rejected(String),
    #[error("parse error: {0}")]
    Parse(String),
    /// Another submission/update is already running, or uploads are in flight.
    #[error("busy: {0}")]
    Busy(&'static str),
    /// The edited record changed upstream since the snapshot was taken.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("operation cancelled")]
    Cancelled,
    /// Required configuration is missing (e.g. image host settings).
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Remote failures (unreachable, timed out, HTTP error, rejected, garbled).
    ///
    /// These are all reported to the operator the same way.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_)
                | ClientError::Timeout(_)
                | ClientError::Api(..)
                | ClientError::Rejected(_)
                | ClientError::Parse(_)
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

impl From<DomainError> for ClientError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                ClientError::Validation(msg)
            }
            DomainError::Conflict(msg) => ClientError::Conflict(msg),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
