use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::{
    api::{
        models::{StatusUpdate, Submission, SubmissionStatus},
        routes::Routes,
        Api, ApiError,
    },
    config::args::DEFAULT_DAYS_THRESHOLD,
    pagination::Paginated,
    timestamp::{format_elapsed, parse_timestamp, TimestampError},
};

#[derive(Debug, Error)]
pub(crate) enum CancelError {
    #[error("submission {submission_id} has neither rerun_resumed_at nor submitted_at")]
    MissingTimestamp { submission_id: u64 },

    #[error("submission {submission_id} has an unreadable start time, {source}")]
    Timestamp {
        submission_id: u64,
        #[source]
        source: TimestampError,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CancelPolicy {
    pub(crate) threshold: Duration,
    pub(crate) statuses: Vec<SubmissionStatus>,
    pub(crate) dry_run: bool,
}

impl CancelPolicy {
    pub(crate) fn new(days_threshold: u32, statuses: Vec<SubmissionStatus>, dry_run: bool) -> Self {
        Self {
            threshold: Duration::days(i64::from(days_threshold)),
            statuses,
            dry_run,
        }
    }
}

impl Default for CancelPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_DAYS_THRESHOLD,
            SubmissionStatus::NON_TERMINAL.to_vec(),
            false,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Cancellation {
    pub(crate) submission_id: u64,
    pub(crate) previous_status: SubmissionStatus,
    pub(crate) elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChallengeReport {
    pub(crate) challenge_id: u64,
    pub(crate) inspected: usize,
    pub(crate) cancelled: Vec<Cancellation>,
}

/// The rerun resume time when one is set, otherwise the original submission time.
pub(crate) fn effective_start(submission: &Submission) -> Result<DateTime<Utc>, CancelError> {
    let raw = submission
        .rerun_resumed_at
        .as_deref()
        .filter(|rerun| !rerun.trim().is_empty())
        .or(submission.submitted_at.as_deref())
        .ok_or(CancelError::MissingTimestamp {
            submission_id: submission.id,
        })?;
    parse_timestamp(raw).map_err(|source| CancelError::Timestamp {
        submission_id: submission.id,
        source,
    })
}

/// Every submission of the challenge in the given statuses, one listing per
/// status, concatenated in status order.
pub(crate) fn list_submissions<A: Api>(
    api: &A,
    routes: &Routes,
    challenge_id: u64,
    statuses: &[SubmissionStatus],
) -> Result<Vec<Submission>, ApiError> {
    let mut submissions = Vec::new();
    for status in statuses {
        let url = routes.submissions(challenge_id, *status)?;
        for submission in Paginated::<A, Submission>::new(api, url) {
            submissions.push(submission?);
        }
    }
    Ok(submissions)
}

/// Cancels every submission of the challenge stuck for longer than the policy
/// threshold.
///
/// The clock is read once, after every listing has been fetched. The first
/// error aborts the challenge, cancellations already sent stay.
pub(crate) fn cancel_stale_submissions<A: Api>(
    api: &A,
    routes: &Routes,
    challenge_id: u64,
    policy: &CancelPolicy,
    clock: impl FnOnce() -> DateTime<Utc>,
) -> Result<ChallengeReport, CancelError> {
    let submissions = list_submissions(api, routes, challenge_id, &policy.statuses)?;
    let now = clock();
    log::debug!(
        "Challenge {challenge_id} has {} submissions to inspect",
        submissions.len()
    );

    let mut report = ChallengeReport {
        challenge_id,
        inspected: 0,
        cancelled: Vec::new(),
    };
    // A submission can move between statuses while the listings are fetched
    let mut seen = HashSet::new();
    for submission in &submissions {
        if !seen.insert(submission.id) {
            log::debug!("Submission {} listed twice, skipping", submission.id);
            continue;
        }
        // The platform may report a state other than the one that was queried
        if !submission.status.is_cancellable() {
            log::debug!(
                "Submission {} is {}, leaving it alone",
                submission.id,
                submission.status
            );
            continue;
        }
        report.inspected += 1;

        let elapsed = now - effective_start(submission)?;
        if elapsed <= policy.threshold {
            continue;
        }

        if policy.dry_run {
            log::info!(
                "Would cancel submission with id {}. Previous status: {}. Time elapsed: {}",
                submission.id,
                submission.status,
                format_elapsed(elapsed)
            );
        } else {
            api.patch(
                &routes.update_submission(challenge_id)?,
                &StatusUpdate::cancel(submission.id),
            )?;
            log::info!(
                "Cancelled submission with id {}. Previous status: {}. Time elapsed: {}",
                submission.id,
                submission.status,
                format_elapsed(elapsed)
            );
        }
        report.cancelled.push(Cancellation {
            submission_id: submission.id,
            previous_status: submission.status,
            elapsed,
        });
    }
    Ok(report)
}
