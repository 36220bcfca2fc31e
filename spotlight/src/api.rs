use async_trait::async_trait;
use derive_more::Constructor;
use serde::Serialize;
use thiserror::Error;

/// Failure reported by a [`Provider`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Status code of the underlying response, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct RepositorySummary {
    pub owner: String,
    pub name: String,
    pub full_name: String,
    pub fork: bool,
    pub archived: bool,
}

/// Views over the provider's reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Constructor)]
pub struct TrafficSample {
    pub count: u64,
    pub uniques: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Constructor)]
pub struct RankedEntry {
    pub name: String,
    pub views: u64,
    pub uniques: u64,
}

impl std::fmt::Display for RankedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "repo: {}\tviews: {}\tuniques: {}",
            self.name, self.views, self.uniques
        ))
    }
}

/// Source of repository listings and per-repository traffic.
///
/// Pagination is the implementation's concern: `list_repositories` returns every repository of
/// `subject` in listing order.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn list_repositories(&self, subject: &str) -> Result<Vec<RepositorySummary>>;

    async fn traffic(&self, owner: &str, name: &str) -> Result<TrafficSample>;
}

/// Fire-and-forget message sink used by the ranking engine.
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);

    fn warning(&self, message: &str);
}

#[test]
fn status_only_for_api_errors_test() {
    let api = Error::Api {
        status: 403,
        message: "Resource not accessible".to_string(),
    };
    assert_eq!(api.status(), Some(403));
    assert_eq!(api.to_string(), "Resource not accessible");
    assert_eq!(Error::Message("boom".to_string()).status(), None);
    assert_eq!(Error::Other(anyhow::anyhow!("io")).status(), None);
}

#[test]
fn ranked_entry_display_test() {
    let entry = RankedEntry::new("me/repo".to_string(), 12, 3);
    assert_eq!(entry.to_string(), "repo: me/repo\tviews: 12\tuniques: 3");
}
