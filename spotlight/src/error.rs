use strum_macros::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    Validation,
    Provider,
}

/// Fatal outcome of a ranking run. No partial ranking accompanies it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bad subject or configuration. Raised before any request is made.
    #[error("{0}")]
    Validation(String),
    /// Enumeration failed or the consecutive error limit was hit.
    #[error("{message}")]
    Provider { message: String, status: Option<u16> },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Provider { .. } => ErrorKind::Provider,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Validation(_) => None,
            Error::Provider { status, .. } => *status,
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub(crate) fn provider(message: impl Into<String>, status: Option<u16>) -> Self {
        Error::Provider {
            message: message.into(),
            status,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn kind_and_status_test() {
    let err = Error::provider("Too many consecutive errors (3)", Some(502));
    assert_eq!(err.kind(), ErrorKind::Provider);
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.kind().to_string(), "provider");

    let err = Error::validation("limit must be between 1 and 100, got 0");
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.status(), None);
    assert_eq!(err.to_string(), "limit must be between 1 and 100, got 0");
}
