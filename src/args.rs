use crate::AppError;
use clap::Parser;
use secrecy::SecretString;
use spotlight::{Config, RawConfig};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Prefix of explicit environment overrides, e.g. `SPOTLIGHT_DELAY`.
const OVERRIDE_PREFIX: &str = "SPOTLIGHT_";
/// Prefix GitHub Actions uses to expose workflow inputs, e.g. `INPUT_DELAY`.
const INPUT_PREFIX: &str = "INPUT_";

const TOKEN_VARS: [&str; 3] = ["GH_SPOTLIGHT_TOKEN", "GITHUB_TOKEN", "INPUT_TOKEN"];
const SUBJECT_FALLBACK_VARS: [&str; 2] = ["GITHUB_ACTOR", "GITHUB_USER"];

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// User or organization whose repositories are ranked
    #[clap(short, long)]
    pub user: Option<String>,

    /// GitHub API token
    #[clap(long)]
    pub token: Option<SecretString>,

    /// Repository API URL [default: https://api.github.com]
    #[clap(long)]
    pub api_url: Option<String>,

    /// Delay between traffic API calls in milliseconds (100..5000) [default: 300]
    #[clap(short, long)]
    pub delay: Option<String>,

    /// Max repositories to show (1..100) [default: 6]
    #[clap(short, long)]
    pub limit: Option<String>,

    /// Skip repositories with fewer views [default: 0]
    #[clap(short, long)]
    pub min_views: Option<String>,

    /// Include forked repositories
    #[clap(long)]
    pub include_forks: bool,

    /// Include archived repositories
    #[clap(long)]
    pub include_archived: bool,
}

/// Everything a run needs, resolved from flags and environment.
#[derive(Debug)]
pub struct Settings {
    pub subject: String,
    pub token: SecretString,
    pub api_url: String,
    pub config: Config,
}

impl Args {
    /// Merges flags with environment, in order: `SPOTLIGHT_<KEY>` override, `INPUT_<KEY>` workflow
    /// input, flag, default. Numeric values are validated here, before any request is made.
    pub fn resolve<ENV>(self, env: ENV) -> Result<Settings, AppError>
    where
        ENV: Fn(&str) -> Option<String>,
    {
        let raw = RawConfig {
            delay: value(&env, &["delay"]).or(self.delay),
            limit: value(&env, &["limit"]).or(self.limit),
            min_views: value(&env, &["min_views", "minViews"]).or(self.min_views),
            include_forks: flag(&env, "include_forks").unwrap_or(self.include_forks),
            include_archived: flag(&env, "include_archived").unwrap_or(self.include_archived),
        };
        let config = Config::parse(&raw)?;

        let token = TOKEN_VARS
            .iter()
            .find_map(|name| non_empty(env(name)))
            .map(SecretString::new)
            .or(self.token)
            .ok_or(AppError::MissingToken)?;

        let subject = value(&env, &["user"])
            .or(self.user)
            .or_else(|| SUBJECT_FALLBACK_VARS.iter().find_map(|name| non_empty(env(name))))
            .map(|subject| subject.trim().to_string())
            .unwrap_or_default();

        let api_url = value(&env, &["api_url"])
            .or(self.api_url)
            .or_else(|| non_empty(env("GITHUB_API_URL")))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Settings {
            subject,
            token,
            api_url,
            config,
        })
    }
}

/// First non-empty override, then first non-empty workflow input, across all `keys`.
fn value<ENV>(env: &ENV, keys: &[&str]) -> Option<String>
where
    ENV: Fn(&str) -> Option<String>,
{
    [OVERRIDE_PREFIX, INPUT_PREFIX].iter().find_map(|prefix| {
        keys.iter()
            .find_map(|key| non_empty(env(&format!("{}{}", prefix, key.to_uppercase()))))
    })
}

/// `true`/`false` in any case; anything else falls through to the next source.
fn flag<ENV>(env: &ENV, key: &str) -> Option<bool>
where
    ENV: Fn(&str) -> Option<String>,
{
    [OVERRIDE_PREFIX, INPUT_PREFIX].iter().find_map(|prefix| {
        env(&format!("{}{}", prefix, key.to_uppercase())).and_then(|value| match value.trim().to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        })
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use spotlight::ErrorKind;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("repo_spotlight").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_test() {
        let settings = parse(&["--token", "t"]).resolve(env(&[])).unwrap();
        assert_eq!(settings.config, Config::default());
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.subject, "");
        assert_eq!(settings.token.expose_secret(), "t");
    }

    #[test]
    fn flags_test() {
        let args = parse(&[
            "--token",
            "t",
            "--user",
            "octocat",
            "--delay",
            "150",
            "--limit",
            "3",
            "--min-views",
            "10",
            "--include-forks",
            "--include-archived",
            "--api-url",
            "http://localhost:8080",
        ]);
        let settings = args.resolve(env(&[])).unwrap();
        assert_eq!(settings.subject, "octocat");
        assert_eq!(settings.api_url, "http://localhost:8080");
        assert_eq!(settings.config, Config::new(150, 3, 10, true, true).unwrap());
    }

    #[test]
    fn precedence_test() {
        let args = parse(&["--token", "t", "--delay", "150", "--limit", "3", "--min-views", "10"]);
        let settings = args
            .resolve(env(&[
                ("SPOTLIGHT_DELAY", "400"),
                ("INPUT_DELAY", "200"),
                ("INPUT_LIMIT", "8"),
                ("INPUT_MIN_VIEWS", ""),
            ]))
            .unwrap();
        assert_eq!(settings.config.delay_ms(), 400);
        assert_eq!(settings.config.limit(), 8);
        assert_eq!(settings.config.min_views(), 10);
    }

    #[test]
    fn min_views_alias_test() {
        let settings = parse(&["--token", "t"])
            .resolve(env(&[("INPUT_MINVIEWS", "42")]))
            .unwrap();
        assert_eq!(settings.config.min_views(), 42);
    }

    #[test]
    fn boolean_inputs_test() {
        let settings = parse(&["--token", "t", "--include-forks"])
            .resolve(env(&[("INPUT_INCLUDE_FORKS", "FALSE"), ("INPUT_INCLUDE_ARCHIVED", "True")]))
            .unwrap();
        assert!(!settings.config.include_forks());
        assert!(settings.config.include_archived());

        let settings = parse(&["--token", "t", "--include-forks"])
            .resolve(env(&[("INPUT_INCLUDE_FORKS", "yes")]))
            .unwrap();
        assert!(settings.config.include_forks(), "Unrecognized input should fall through to the flag");
    }

    #[test]
    fn invalid_number_test() {
        let err = parse(&["--token", "t"])
            .resolve(env(&[("INPUT_DELAY", "99")]))
            .unwrap_err();
        match err {
            AppError::Spotlight(err) => {
                assert_eq!(err.kind(), ErrorKind::Validation);
                assert_eq!(err.to_string(), "delay must be between 100 and 5000, got 99");
            }
            err => panic!("Expected validation error, got {:?}", err),
        }

        let err = parse(&["--token", "t", "--limit", "many"]).resolve(env(&[])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid number for limit: many");
    }

    #[test]
    fn token_precedence_test() {
        let settings = parse(&["--token", "flag"])
            .resolve(env(&[("GITHUB_TOKEN", "github"), ("INPUT_TOKEN", "input")]))
            .unwrap();
        assert_eq!(settings.token.expose_secret(), "github");

        let settings = parse(&["--token", "flag"])
            .resolve(env(&[("GH_SPOTLIGHT_TOKEN", "spotlight"), ("GITHUB_TOKEN", "github")]))
            .unwrap();
        assert_eq!(settings.token.expose_secret(), "spotlight");

        let settings = parse(&["--token", "flag"]).resolve(env(&[("GITHUB_TOKEN", "")])).unwrap();
        assert_eq!(settings.token.expose_secret(), "flag");
    }

    #[test]
    fn missing_token_test() {
        let err = parse(&[]).resolve(env(&[])).unwrap_err();
        assert!(matches!(err, AppError::MissingToken));
    }

    #[test]
    fn subject_test() {
        let settings = parse(&["--token", "t"])
            .resolve(env(&[("GITHUB_ACTOR", "actor"), ("GITHUB_USER", "user")]))
            .unwrap();
        assert_eq!(settings.subject, "actor");

        let settings = parse(&["--token", "t", "--user", "flag"])
            .resolve(env(&[("GITHUB_ACTOR", "actor")]))
            .unwrap();
        assert_eq!(settings.subject, "flag");

        let settings = parse(&["--token", "t", "--user", "flag"])
            .resolve(env(&[("INPUT_USER", "input")]))
            .unwrap();
        assert_eq!(settings.subject, "input");

        let settings = parse(&["--token", "t", "--user", " octocat\n"]).resolve(env(&[])).unwrap();
        assert_eq!(settings.subject, "octocat");
    }

    #[test]
    fn api_url_test() {
        let settings = parse(&["--token", "t"])
            .resolve(env(&[("GITHUB_API_URL", "https://ghe.example.com/api/v3")]))
            .unwrap();
        assert_eq!(settings.api_url, "https://ghe.example.com/api/v3");
    }
}
