//! GitHub REST implementation of [`spotlight::api::Provider`].

mod builder;
mod limiter;
mod payload;

pub use builder::GithubClientBuilder;
pub use limiter::{RateLimit, RateLimiter};

use async_trait::async_trait;
use log::debug;
use payload::{ErrorBody, TrafficViews};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use spotlight::api::{Provider, RepositorySummary, TrafficSample};
use thiserror::Error;
use url::Url;

pub(crate) const MAX_REPOS_PAGE: usize = 100;
const FIRST_PAGE_NUMBER: u32 = 1;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("API URL {0} cannot be used as a base")]
    BaseUrl(String),
    #[error("Invalid header value: {0}")]
    HeaderValue(#[from] reqwest::header::InvalidHeaderValue),
    #[error("{0}")]
    Header(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for spotlight::api::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Api { status, message } => spotlight::api::Error::Api { status, message },
            Error::Request(err) => match err.status() {
                Some(status) => spotlight::api::Error::Api {
                    status: status.as_u16(),
                    message: err.to_string(),
                },
                None => spotlight::api::Error::Message(err.to_string()),
            },
            err => spotlight::api::Error::Message(err.to_string()),
        }
    }
}

pub struct GithubClient {
    client: Client,
    github_url: Url,
    limiter: RateLimiter,
}

impl GithubClient {
    /// Every repository owned by `subject`, following pages until a short one.
    pub async fn list_repositories(&self, subject: &str) -> Result<Vec<RepositorySummary>> {
        let url = self.endpoint(&["users", subject, "repos"])?;
        let mut repos = Vec::new();
        let mut page_no = FIRST_PAGE_NUMBER;
        loop {
            let page = self
                .get::<Vec<payload::Repo>>(
                    url.clone(),
                    &[
                        ("type", "owner".to_string()),
                        ("per_page", MAX_REPOS_PAGE.to_string()),
                        ("page", page_no.to_string()),
                    ],
                )
                .await?;
            debug!("Found {} repositories on page {}", page.len(), page_no);
            let last = page.len() < MAX_REPOS_PAGE;
            repos.extend(page.into_iter().map(RepositorySummary::from));
            if last {
                return Ok(repos);
            }
            page_no += 1;
        }
    }

    pub async fn traffic(&self, owner: &str, name: &str) -> Result<TrafficSample> {
        let url = self.endpoint(&["repos", owner, name, "traffic", "views"])?;
        let views = self.get::<TrafficViews>(url, &[]).await?;
        Ok(views.into())
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        self.limiter.wait().await;
        let response = self.client.get(url).query(query).send().await?;
        if let Err(err) = self.limiter.update(response.headers()).await {
            debug!("Rate limit not updated: {}", err);
        }
        read_response(response).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.github_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::BaseUrl(self.github_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl Provider for GithubClient {
    async fn list_repositories(&self, subject: &str) -> spotlight::api::Result<Vec<RepositorySummary>> {
        Ok(GithubClient::list_repositories(self, subject).await?)
    }

    async fn traffic(&self, owner: &str, name: &str) -> spotlight::api::Result<TrafficSample> {
        Ok(GithubClient::traffic(self, owner, name).await?)
    }
}

/// Deserializes a success body, or turns an error status into [`Error::Api`].
pub(crate) async fn read_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
    };
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}
