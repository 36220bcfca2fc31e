use crate::limiter::{RateLimit, RateLimiter};
use crate::payload::RateLimitBody;
use crate::{Error, GithubClient, Result};
use log::debug;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

pub struct GithubClientBuilder {
    client_builder: ClientBuilder,
    github_url: String,
    headers: HeaderMap,
}

impl Default for GithubClientBuilder {
    fn default() -> Self {
        let mut headers = HeaderMap::default();
        headers.insert(header::USER_AGENT, HeaderValue::from_static("repo-spotlight"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));
        Self {
            client_builder: ClientBuilder::default(),
            github_url: "https://api.github.com".to_string(),
            headers,
        }
    }
}

impl GithubClientBuilder {
    pub fn try_with_token(mut self, token: SecretString) -> Result<GithubClientBuilder> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
        value.set_sensitive(true);
        self.headers.insert(header::AUTHORIZATION, value);
        Ok(self)
    }

    pub fn try_with_user_agent<STR: AsRef<str>>(self, user_agent: STR) -> Result<GithubClientBuilder> {
        self.try_with_header(header::USER_AGENT, user_agent)
    }

    pub fn with_github_url<STR: AsRef<str>>(mut self, url: STR) -> GithubClientBuilder {
        self.github_url = url.as_ref().to_string();
        self
    }

    fn try_with_header(mut self, key: HeaderName, val: impl AsRef<str>) -> Result<GithubClientBuilder> {
        let val = HeaderValue::from_str(val.as_ref())?;
        self.headers.insert(key, val);
        Ok(self)
    }

    /// Builds the client, seeding its rate limiter from `GET /rate_limit`.
    pub async fn build(self) -> Result<GithubClient> {
        let client = self.client_builder.default_headers(self.headers).build()?;
        let github_url = base_url(&self.github_url)?;
        let rate_limit = rate_limit(&client, &github_url).await?;
        Ok(GithubClient {
            client,
            github_url,
            limiter: RateLimiter::new(rate_limit),
        })
    }
}

fn base_url(github_url: &str) -> Result<Url> {
    let url = Url::parse(github_url)?;
    if url.cannot_be_a_base() {
        return Err(Error::BaseUrl(github_url.to_string()));
    }
    Ok(url)
}

async fn rate_limit(client: &Client, github_url: &Url) -> Result<RateLimit> {
    let mut request_url = github_url.clone();
    request_url
        .path_segments_mut()
        .map_err(|_| Error::BaseUrl(github_url.to_string()))?
        .pop_if_empty()
        .push("rate_limit");
    let response = client.get(request_url).send().await?;
    match crate::read_response::<RateLimitBody>(response).await {
        Ok(body) => Ok(RateLimit::from(&body.resources.core)),
        // GitHub Enterprise answers 404 when rate limiting is disabled
        Err(Error::Api { status: 404, .. }) => {
            debug!("Rate limiting disabled on {}", github_url);
            Ok(RateLimit::unlimited())
        }
        Err(err) => Err(err),
    }
}
