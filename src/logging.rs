use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

/// Initializes `env_logger` at `info` unless `RUST_LOG` says otherwise.
///
/// Inside GitHub Actions warnings and errors are written as workflow commands so the runner
/// shows them as annotations.
pub fn init_logger(actions: bool) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if actions {
        builder.format(|buf, record| writeln!(buf, "{}", annotate(record.level(), &record.args().to_string())));
    }
    builder.init();
}

pub fn running_in_actions<ENV>(env: ENV) -> bool
where
    ENV: Fn(&str) -> Option<String>,
{
    env("GITHUB_ACTIONS").map_or(false, |value| value.eq_ignore_ascii_case("true"))
}

fn annotate(level: Level, message: &str) -> String {
    match level {
        Level::Error => format!("::error::{}", escape(message)),
        Level::Warn => format!("::warning::{}", escape(message)),
        _ => message.to_string(),
    }
}

/// Workflow command data must keep to one line.
fn escape(message: &str) -> String {
    message.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

#[test]
fn annotate_test() {
    assert_eq!(annotate(Level::Info, "Limit: 6"), "Limit: 6");
    assert_eq!(
        annotate(Level::Warn, "Skipped me/repo: Bad gateway"),
        "::warning::Skipped me/repo: Bad gateway"
    );
    assert_eq!(annotate(Level::Error, "50% done\nfailed"), "::error::50%25 done%0Afailed");
}

#[test]
fn running_in_actions_test() {
    assert!(running_in_actions(|_| Some("true".to_string())));
    assert!(!running_in_actions(|_| Some("false".to_string())));
    assert!(!running_in_actions(|_| None));
}
