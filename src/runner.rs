use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use thiserror::Error;

use crate::{
    api::{routes::Routes, Api, ApiError},
    canceller::{cancel_stale_submissions, CancelError, CancelPolicy, ChallengeReport},
    pagination::challenge_ids,
};

/// What happens to the rest of the run when one challenge fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FailurePolicy {
    /// Stop at the first failing challenge
    Halt,
    /// Log the failure and carry on with the next challenge
    Skip,
}

#[derive(Debug, Error)]
pub(crate) enum RunError {
    #[error("Failed to enumerate challenges: {0}")]
    Enumeration(#[source] ApiError),

    #[error("Auto-cancel failed for challenge {challenge_id}: {source}")]
    Challenge {
        challenge_id: u64,
        #[source]
        source: CancelError,
    },
}

#[derive(Debug)]
pub(crate) enum ChallengeOutcome {
    Completed(ChallengeReport),
    Failed { challenge_id: u64, error: CancelError },
}

#[derive(Debug, Default)]
pub(crate) struct RunSummary {
    pub(crate) outcomes: Vec<ChallengeOutcome>,
}

impl RunSummary {
    pub(crate) fn challenges(&self) -> usize {
        self.outcomes.len()
    }

    pub(crate) fn cancelled(&self) -> usize {
        self.reports().map(|report| report.cancelled.len()).sum()
    }

    fn reports(&self) -> impl Iterator<Item = &ChallengeReport> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ChallengeOutcome::Completed(report) => Some(report),
            ChallengeOutcome::Failed { .. } => None,
        })
    }

    /// Cancelled submission counts keyed by the status they were stuck in.
    pub(crate) fn cancelled_by_status(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for cancellation in self.reports().flat_map(|report| &report.cancelled) {
            *counts.entry(cancellation.previous_status.as_str()).or_insert(0) += 1;
        }
        counts
    }

    pub(crate) fn longest_stuck(&self) -> Option<Duration> {
        self.reports()
            .flat_map(|report| &report.cancelled)
            .map(|cancellation| cancellation.elapsed)
            .max()
    }

    /// One line account of the run, dry runs report what would have been cancelled.
    pub(crate) fn headline(&self, dry_run: bool) -> String {
        let action = if dry_run { "would cancel" } else { "cancelled" };
        format!(
            "Processed {} challenges, {action} {} submissions {:?}",
            self.challenges(),
            self.cancelled(),
            self.cancelled_by_status()
        )
    }

    pub(crate) fn failures(&self) -> Vec<u64> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                ChallengeOutcome::Failed { challenge_id, .. } => Some(*challenge_id),
                ChallengeOutcome::Completed(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RunSettings {
    pub(crate) policy: CancelPolicy,
    pub(crate) on_error: FailurePolicy,
    /// Challenges to process, empty means every challenge on the platform
    pub(crate) challenges: Vec<u64>,
}

/// Runs the canceller over every selected challenge, one after another.
///
/// The clock is read once per challenge, after its submissions are listed.
/// Enumeration failures always end the run, challenge failures end it only
/// under [`FailurePolicy::Halt`].
pub(crate) fn run<A: Api>(
    api: &A,
    routes: &Routes,
    settings: &RunSettings,
    clock: impl Fn() -> DateTime<Utc>,
) -> Result<RunSummary, RunError> {
    let mut summary = RunSummary::default();
    if settings.challenges.is_empty() {
        for challenge_id in challenge_ids(api, routes).map_err(RunError::Enumeration)? {
            let challenge_id = challenge_id.map_err(RunError::Enumeration)?;
            process_challenge(api, routes, settings, challenge_id, &clock, &mut summary)?;
        }
    } else {
        for challenge_id in &settings.challenges {
            process_challenge(api, routes, settings, *challenge_id, &clock, &mut summary)?;
        }
    }
    Ok(summary)
}

fn process_challenge<A: Api>(
    api: &A,
    routes: &Routes,
    settings: &RunSettings,
    challenge_id: u64,
    clock: &impl Fn() -> DateTime<Utc>,
    summary: &mut RunSummary,
) -> Result<(), RunError> {
    log::info!("Running auto-cancel for challenge {challenge_id}");
    match cancel_stale_submissions(api, routes, challenge_id, &settings.policy, clock) {
        Ok(report) => {
            log::debug!(
                "Challenge {}: inspected {}, cancelled {:?}",
                report.challenge_id,
                report.inspected,
                report
                    .cancelled
                    .iter()
                    .map(|cancellation| cancellation.submission_id)
                    .collect::<Vec<_>>()
            );
            summary.outcomes.push(ChallengeOutcome::Completed(report));
        }
        Err(error) => match settings.on_error {
            FailurePolicy::Halt => {
                log::error!("Stopping, challenge {challenge_id} failed: {error}");
                return Err(RunError::Challenge {
                    challenge_id,
                    source: error,
                });
            }
            FailurePolicy::Skip => {
                log::warn!("Skipping challenge {challenge_id}, it failed with: {error}");
                summary.outcomes.push(ChallengeOutcome::Failed {
                    challenge_id,
                    error,
                });
            }
        },
    }
    Ok(())
}
