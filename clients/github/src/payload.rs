use serde::Deserialize;
use spotlight::api::{RepositorySummary, TrafficSample};

#[derive(Deserialize, Debug)]
pub struct Repo {
    pub name: String,
    pub full_name: String,
    pub owner: RepoOwner,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Deserialize, Debug)]
pub struct RepoOwner {
    pub login: String,
}

impl From<Repo> for RepositorySummary {
    fn from(repo: Repo) -> Self {
        RepositorySummary::new(repo.owner.login, repo.name, repo.full_name, repo.fork, repo.archived)
    }
}

/// `GET /repos/{owner}/{repo}/traffic/views`. Daily breakdown is ignored.
#[derive(Deserialize, Debug)]
pub struct TrafficViews {
    pub count: u64,
    pub uniques: u64,
}

impl From<TrafficViews> for TrafficSample {
    fn from(views: TrafficViews) -> Self {
        TrafficSample::new(views.count, views.uniques)
    }
}

#[derive(Deserialize, Debug)]
pub struct RateLimitBody {
    pub resources: RateLimitResources,
}

#[derive(Deserialize, Debug)]
pub struct RateLimitResources {
    pub core: RateLimitResource,
}

#[derive(Deserialize, Debug)]
pub struct RateLimitResource {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
}

#[derive(Deserialize, Debug)]
pub struct ErrorBody {
    pub message: String,
}
