use std::error::Error;

use chrono::Utc;
use config::Config;
use env_logger::Env;

use crate::{
    api::{client::HttpClient, routes::Routes},
    canceller::CancelPolicy,
    runner::{run, ChallengeOutcome, RunSettings},
    timestamp::format_elapsed,
};

mod api;
mod canceller;
mod config;
mod pagination;
mod runner;
mod timestamp;

pub(crate) const ENDPOINT_CONFIG_LOCATION: &str = "endpoints";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let config = Config::new();
    let args = &config.args;

    log::info!(
        "Cancelling submissions stuck in {:?} for more than {} days on {}",
        args.statuses
            .iter()
            .map(|status| status.as_str())
            .collect::<Vec<_>>(),
        args.days_threshold,
        args.api_host_url
    );
    if args.dry_run {
        log::info!("Dry run, no submission will be updated");
    }

    let client = HttpClient::new(&args.auth_token)?;
    let routes = Routes::new(&args.api_host_url, &config.endpoints);
    let settings = RunSettings {
        policy: CancelPolicy::new(args.days_threshold, args.statuses.clone(), args.dry_run),
        on_error: args.on_challenge_error,
        challenges: args.challenge.clone(),
    };

    let summary = run(&client, &routes, &settings, Utc::now)?;

    log::info!("{}", summary.headline(args.dry_run));
    if let Some(longest) = summary.longest_stuck() {
        log::info!("Longest stuck submission was waiting {}", format_elapsed(longest));
    }
    for outcome in &summary.outcomes {
        if let ChallengeOutcome::Failed {
            challenge_id,
            error,
        } = outcome
        {
            log::error!("Challenge {challenge_id} failed: {error}");
        }
    }

    let failures = summary.failures();
    if !failures.is_empty() {
        return Err(format!("Auto-cancel failed for challenges {failures:?}").into());
    }
    Ok(())
}
