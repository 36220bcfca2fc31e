mod args;
mod logging;

pub use args::{Args, Settings, DEFAULT_API_URL};
pub use logging::{init_logger, running_in_actions};

use github_client::GithubClientBuilder;
use spotlight::api::RankedEntry;
use spotlight::Ranker;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("GitHub token is required. Set GH_SPOTLIGHT_TOKEN or use --token")]
    MissingToken,
    #[error(transparent)]
    Spotlight(#[from] spotlight::Error),
    #[error("GitHub client error: {0}")]
    Client(#[from] github_client::Error),
    #[error("Failed to write step output: {0}")]
    Output(#[from] std::io::Error),
    #[error("Failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Resolves settings, ranks the subject's repositories and, when `GITHUB_OUTPUT` is set, publishes
/// them as the `repos` step output.
pub async fn run<ENV>(args: Args, env: ENV) -> Result<Vec<RankedEntry>, AppError>
where
    ENV: Fn(&str) -> Option<String>,
{
    let settings = args.resolve(&env)?;
    let ranked = spotlight_repos(settings).await?;
    if let Some(output) = env("GITHUB_OUTPUT").filter(|path| !path.is_empty()) {
        write_output(Path::new(&output), &ranked)?;
    }
    Ok(ranked)
}

pub async fn spotlight_repos(settings: Settings) -> Result<Vec<RankedEntry>, AppError> {
    spotlight::validate_subject(&settings.subject)?;

    let client = GithubClientBuilder::default()
        .with_github_url(&settings.api_url)
        .try_with_token(settings.token)?
        .build()
        .await
        .map_err(rate_limit_error)?;

    let ranker = Ranker::new(client);
    Ok(ranker.rank(&settings.subject, &settings.config).await?)
}

/// Transport and status failures of the rate limit prefetch belong to the provider taxonomy so the
/// status stays available to callers.
fn rate_limit_error(err: github_client::Error) -> AppError {
    match err {
        err @ (github_client::Error::Api { .. } | github_client::Error::Request(_)) => {
            let err = spotlight::api::Error::from(err);
            AppError::Spotlight(spotlight::Error::Provider {
                message: format!("Failed to fetch rate limit: {}", err),
                status: err.status(),
            })
        }
        err => AppError::Client(err),
    }
}

fn write_output(path: &Path, ranked: &[RankedEntry]) -> Result<(), AppError> {
    let json = serde_json::to_string(ranked)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "repos={}", json)?;
    Ok(())
}
