use crate::error::{Error, Result};
use std::fmt::Display;
use std::num::IntErrorKind;
use std::time::Duration;

pub const DEFAULT_DELAY: u64 = 300;
pub const DEFAULT_LIMIT: usize = 6;
pub const DEFAULT_MIN_VIEWS: u64 = 0;

const DELAY_RANGE: (i128, i128) = (100, 5000);
const LIMIT_RANGE: (i128, i128) = (1, 100);

/// Settings of a single ranking run.
///
/// Only obtainable through [`Config::new`] or [`Config::parse`], so every value is within bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    delay: u64,
    limit: usize,
    min_views: u64,
    include_forks: bool,
    include_archived: bool,
}

/// Unvalidated configuration values as collected from flags, environment or pipeline inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    pub delay: Option<String>,
    pub limit: Option<String>,
    pub min_views: Option<String>,
    pub include_forks: bool,
    pub include_archived: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            delay: DEFAULT_DELAY,
            limit: DEFAULT_LIMIT,
            min_views: DEFAULT_MIN_VIEWS,
            include_forks: false,
            include_archived: false,
        }
    }
}

impl Config {
    pub fn new(delay: i64, limit: i64, min_views: i64, include_forks: bool, include_archived: bool) -> Result<Config> {
        Config::checked(delay.into(), limit.into(), min_views.into(), include_forks, include_archived)
    }

    /// Validates raw values, substituting defaults for the missing ones.
    pub fn parse(raw: &RawConfig) -> Result<Config> {
        let delay = parse_number(raw.delay.as_deref(), DEFAULT_DELAY.into(), "delay")?;
        let limit = parse_number(raw.limit.as_deref(), DEFAULT_LIMIT as i128, "limit")?;
        let min_views = parse_number(raw.min_views.as_deref(), DEFAULT_MIN_VIEWS.into(), "minViews")?;
        Config::checked(delay, limit, min_views, raw.include_forks, raw.include_archived)
    }

    fn checked(delay: i128, limit: i128, min_views: i128, include_forks: bool, include_archived: bool) -> Result<Config> {
        let delay = number_in_range(delay, DELAY_RANGE.0, DELAY_RANGE.1, "delay")?;
        let limit = number_in_range(limit, LIMIT_RANGE.0, LIMIT_RANGE.1, "limit")?;
        if min_views < 0 {
            return Err(Error::validation(format!(
                "minViews must be at least 0, got {}",
                min_views
            )));
        }
        let min_views = u64::try_from(min_views).map_err(|_| {
            Error::validation(format!("minViews must be at most {}, got {}", u64::MAX, min_views))
        })?;
        Ok(Config {
            delay: delay as u64,
            limit: limit as usize,
            min_views,
            include_forks,
            include_archived,
        })
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay)
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn min_views(&self) -> u64 {
        self.min_views
    }

    pub fn include_forks(&self) -> bool {
        self.include_forks
    }

    pub fn include_archived(&self) -> bool {
        self.include_archived
    }
}

/// Rejects an empty user or organization name. Callers use the trimmed name afterwards.
pub fn validate_subject(subject: &str) -> Result<()> {
    if subject.trim().is_empty() {
        return Err(Error::validation("Subject (user or organization) is required"));
    }
    Ok(())
}

fn parse_number(value: Option<&str>, default: i128, name: &str) -> Result<i128> {
    match value {
        None => Ok(default),
        Some(value) => value.trim().parse::<i128>().map_err(|err| match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                Error::validation(format!("{} is out of range, got {}", name, value.trim()))
            }
            _ => Error::validation(format!("Invalid number for {}: {}", name, value)),
        }),
    }
}

fn number_in_range<T>(value: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + Display + Copy,
{
    if value < min || value > max {
        return Err(Error::validation(format!(
            "{} must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(value)
}
