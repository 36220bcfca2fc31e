//! Repository traffic spotlight
//!
//! # Overview
//!
//! Ranks the repositories of a user or organization by how often they were viewed.
//! The full repository list is fetched from a [`api::Provider`], forks and archived repositories are
//! dropped unless asked for, and the traffic of every remaining repository is requested one by one.
//! Requests are paced by a configurable delay, with a shorter jittered pause every 25 repositories
//! and an exponential backoff after a failed request.
//! Isolated traffic failures are skipped with a warning; three failures in a row abort the run.
//! Repositories below the minimum view count are dropped, the rest is sorted by views and cut to the
//! configured limit.

pub mod api;
pub mod config;
mod error;
#[cfg(feature = "ranker")]
mod ranker;
#[cfg(feature = "ranker")]
mod sink;
#[cfg(feature = "ranker")]
mod throttle;

pub use config::{validate_subject, Config, RawConfig};
pub use error::{Error, ErrorKind, Result};
#[cfg(feature = "ranker")]
pub use ranker::Ranker;
#[cfg(feature = "ranker")]
pub use sink::LogSink;
