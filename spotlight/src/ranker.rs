use crate::api::{Logger, Provider, RankedEntry, RepositorySummary};
use crate::config::{validate_subject, Config};
use crate::error::{Error, Result};
use crate::sink::LogSink;
use crate::throttle::{Pace, Strike, Throttle};

/// Ranks the repositories of a subject by traffic views.
pub struct Ranker<PROVIDER, LOGGER = LogSink>
where
    PROVIDER: Provider,
    LOGGER: Logger,
{
    provider: PROVIDER,
    logger: LOGGER,
}

impl<PROVIDER> Ranker<PROVIDER, LogSink>
where
    PROVIDER: Provider,
{
    pub fn new(provider: PROVIDER) -> Self {
        Ranker {
            provider,
            logger: LogSink,
        }
    }
}

impl<PROVIDER, LOGGER> Ranker<PROVIDER, LOGGER>
where
    PROVIDER: Provider,
    LOGGER: Logger,
{
    pub fn with_logger(provider: PROVIDER, logger: LOGGER) -> Self {
        Ranker { provider, logger }
    }

    /// Returns at most `config.limit()` repositories of `subject`, most viewed first.
    ///
    /// Repositories with equal views keep their listing order. Traffic failures are skipped with a
    /// warning until three occur in a row, which aborts the run.
    pub async fn rank(&self, subject: &str, config: &Config) -> Result<Vec<RankedEntry>> {
        validate_subject(subject)?;
        let subject = subject.trim();
        self.log_settings(subject, config);

        let repos = self.provider.list_repositories(subject).await.map_err(|err| {
            Error::provider(format!("Failed to fetch repositories: {}", err), err.status())
        })?;

        let mut ranked = self.collect(&repos, config).await?;
        if ranked.is_empty() {
            self.logger.warning("No repositories met the view criteria.");
            return Ok(ranked);
        }

        // stable, so ties stay in listing order
        ranked.sort_by(|a, b| b.views.cmp(&a.views));
        ranked.truncate(config.limit());
        self.log_summary(&ranked);
        Ok(ranked)
    }

    async fn collect(&self, repos: &[RepositorySummary], config: &Config) -> Result<Vec<RankedEntry>> {
        let total = repos.len();
        let mut throttle = Throttle::new(config.delay_ms());
        let mut ranked = Vec::new();

        for (index, repo) in repos.iter().enumerate() {
            if !included(repo, config) {
                continue;
            }

            match throttle.pace(index) {
                Pace::Periodic(pause) => {
                    self.logger.info(&format!(
                        "Auto delay ({}ms) [repo {}/{}]",
                        pause.as_millis(),
                        index,
                        total
                    ));
                    tokio::time::sleep(pause).await;
                }
                Pace::Base(delay) => tokio::time::sleep(delay).await,
            }

            match self.provider.traffic(&repo.owner, &repo.name).await {
                Ok(sample) => {
                    throttle.record_success();
                    if sample.count >= config.min_views() {
                        ranked.push(RankedEntry::new(repo.full_name.clone(), sample.count, sample.uniques));
                    }
                }
                Err(err) => match throttle.record_failure() {
                    Strike::Trip(errors) => {
                        return Err(Error::provider(
                            format!("Too many consecutive errors ({})", errors),
                            err.status(),
                        ));
                    }
                    Strike::Backoff(backoff) => {
                        self.logger.warning(&format!("Skipped {}: {}", repo.full_name, err));
                        tokio::time::sleep(backoff).await;
                    }
                },
            }
        }
        Ok(ranked)
    }

    fn log_settings(&self, subject: &str, config: &Config) {
        self.logger.info(&format!("Fetching repositories for {}...", subject));
        self.logger.info(&format!("Delay between traffic API calls: {}ms", config.delay_ms()));
        self.logger.info(&format!("Limit: {}", config.limit()));
        self.logger.info(&format!("Minimum views: {}", config.min_views()));
        self.logger.info(&format!("Include forks: {}", config.include_forks()));
        self.logger.info(&format!("Include archived: {}", config.include_archived()));
    }

    fn log_summary(&self, ranked: &[RankedEntry]) {
        let lines: Vec<String> = ranked
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{}. {} - {} views ({} unique)", i + 1, entry.name, entry.views, entry.uniques))
            .collect();
        self.logger.info(&format!(
            "Top {} repositories by views:\n{}",
            ranked.len(),
            lines.join("\n")
        ));
    }
}

fn included(repo: &RepositorySummary, config: &Config) -> bool {
    (config.include_archived() || !repo.archived) && (config.include_forks() || !repo.fork)
}
