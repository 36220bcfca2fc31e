use clap::Parser;
use log::{error, info};
use repo_spotlight_app::Args;
use std::time::Instant;

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();
    repo_spotlight_app::init_logger(repo_spotlight_app::running_in_actions(env_var));

    let started = Instant::now();
    match repo_spotlight_app::run(args, env_var).await {
        Ok(ranked) => {
            for entry in ranked {
                println!("{}", entry);
            }
            info!("Completed in {:.2}s", started.elapsed().as_secs_f64());
        }
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    }
}
