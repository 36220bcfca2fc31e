use crate::payload::RateLimitResource;
use crate::{Error, Result};
use chrono::Utc;
use derive_more::Constructor;
use log::{debug, info};
use reqwest::header::{HeaderMap, HeaderValue};
use std::str::FromStr;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Constructor, Debug, Clone, PartialEq)]
pub struct RateLimit {
    limit: u32,
    remaining: u32,
    reset: i64,
}

impl RateLimit {
    /// Budget for servers with rate limiting disabled.
    pub fn unlimited() -> Self {
        RateLimit::new(u32::MAX, u32::MAX, 0)
    }
}

impl From<&RateLimitResource> for RateLimit {
    fn from(resource: &RateLimitResource) -> Self {
        RateLimit::new(resource.limit, resource.remaining, resource.reset)
    }
}

/// Request budget tracker fed by the `x-ratelimit-*` response headers.
pub struct RateLimiter {
    limit: Mutex<RateLimit>,
}

impl RateLimiter {
    pub fn new(limit: RateLimit) -> Self {
        RateLimiter {
            limit: Mutex::new(limit),
        }
    }

    /// Blocks until the budget allows another request.
    pub(crate) async fn wait(&self) {
        while let Some(delay) = self.time_to_wait(Utc::now().timestamp()).await {
            info!("Rate limit exhausted, waiting {} sec", delay.as_secs());
            tokio::time::sleep(delay).await;
        }
    }

    async fn time_to_wait(&self, now: i64) -> Option<Duration> {
        let mut rate_limit = self.limit.lock().await;
        if rate_limit.remaining > 0 {
            debug!("Remaining limit {}. Not waiting.", rate_limit.remaining);
            rate_limit.remaining -= 1;
            return None;
        }
        if rate_limit.reset < now {
            debug!("Rate limit window passed. Restoring remaining to limit.");
            rate_limit.remaining = rate_limit.limit.saturating_sub(1);
            return None;
        }
        Some(Duration::from_secs((rate_limit.reset - now) as u64 + 1))
    }

    pub(crate) async fn update(&self, headers: &HeaderMap<HeaderValue>) -> Result<()> {
        let limit = read_header::<u32>(headers, "x-ratelimit-limit")?;
        let remaining = read_header::<u32>(headers, "x-ratelimit-remaining")?;
        let reset = read_header::<i64>(headers, "x-ratelimit-reset")?;

        let mut rate_limit = self.limit.lock().await;
        rate_limit.limit = limit;
        if reset > rate_limit.reset {
            rate_limit.reset = reset;
            rate_limit.remaining = remaining;
        } else {
            rate_limit.remaining = std::cmp::min(remaining, rate_limit.remaining);
        }
        debug!("Updated limits: {:?}", rate_limit);
        Ok(())
    }

    #[cfg(test)]
    async fn current(&self) -> RateLimit {
        self.limit.lock().await.clone()
    }
}

fn read_header<T>(headers: &HeaderMap<HeaderValue>, header: &str) -> Result<T>
where
    T: FromStr,
{
    let value = headers
        .get(header)
        .ok_or_else(|| Error::Header(format!("Header {} not found", header)))?
        .to_str()
        .map_err(|err| Error::Header(format!("Header {} is not readable: {}", header, err)))?;
    value
        .parse::<T>()
        .map_err(|_| Error::Header(format!("Header {} has invalid value {}", header, value)))
}
