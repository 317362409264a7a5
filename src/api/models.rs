use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

pub(crate) const STATUS_ERROR: &str = r"
Please provide valid submission statuses, only non terminal ones can be cancelled:
submitting, submitted, running, resuming
";

/// Standard cursor envelope returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct Page<T> {
    pub(crate) results: Vec<T>,
    #[serde(default)]
    pub(crate) next: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) struct Challenge {
    pub(crate) id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct Submission {
    pub(crate) id: u64,
    pub(crate) status: SubmissionStatus,
    #[serde(default)]
    pub(crate) submitted_at: Option<String>,
    #[serde(default)]
    pub(crate) rerun_resumed_at: Option<String>,
}

// Lifecycle states as reported by the platform, anything new lands in Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SubmissionStatus {
    Submitting,
    Submitted,
    Running,
    Resuming,
    Failed,
    Cancelled,
    Finished,
    Archived,
    PartiallyEvaluated,
    #[serde(other)]
    Unknown,
}

impl SubmissionStatus {
    /// States a submission can be stuck in, eligible for auto cancellation.
    pub(crate) const NON_TERMINAL: [SubmissionStatus; 3] = [
        SubmissionStatus::Submitted,
        SubmissionStatus::Running,
        SubmissionStatus::Resuming,
    ];

    /// Whether a submission in this state may still be auto cancelled.
    pub(crate) fn is_cancellable(&self) -> bool {
        matches!(
            self,
            SubmissionStatus::Submitting
                | SubmissionStatus::Submitted
                | SubmissionStatus::Running
                | SubmissionStatus::Resuming
        )
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitting => "submitting",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Running => "running",
            SubmissionStatus::Resuming => "resuming",
            SubmissionStatus::Failed => "failed",
            SubmissionStatus::Cancelled => "cancelled",
            SubmissionStatus::Finished => "finished",
            SubmissionStatus::Archived => "archived",
            SubmissionStatus::PartiallyEvaluated => "partially_evaluated",
            SubmissionStatus::Unknown => "unknown",
        }
    }

    pub(crate) fn value_parser(arg: &str) -> Result<SubmissionStatus, String> {
        SubmissionStatus::try_from(arg).map_err(|err| err.to_string())
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Terminal statuses are rejected, cancelling them would discard finished work
impl TryFrom<&str> for SubmissionStatus {
    type Error = Box<dyn Error>;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "submitting" => Ok(SubmissionStatus::Submitting),
            "submitted" => Ok(SubmissionStatus::Submitted),
            "running" => Ok(SubmissionStatus::Running),
            "resuming" => Ok(SubmissionStatus::Resuming),
            _ => Err(format!("{STATUS_ERROR}, Provided {value}").into()),
        }
    }
}

/// Body of the update submission call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct StatusUpdate {
    pub(crate) submission: u64,
    pub(crate) submission_status: SubmissionStatus,
}

impl StatusUpdate {
    pub(crate) fn cancel(submission: u64) -> Self {
        Self {
            submission,
            submission_status: SubmissionStatus::Cancelled,
        }
    }
}
