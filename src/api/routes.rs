use url::Url;

use super::{models::SubmissionStatus, ApiError};
use crate::config::endpoints::EndpointConfig;

const CHALLENGE_PLACEHOLDER: &str = "{challenge}";
const STATUS_PLACEHOLDER: &str = "{status}";

/// Endpoint templates bound to one API host.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Routes {
    host: String,
    challenges: String,
    submissions: String,
    update_submission: String,
}

impl Routes {
    pub(crate) fn new(host: &Url, endpoints: &EndpointConfig) -> Self {
        Self {
            host: host.as_str().trim_end_matches('/').to_string(),
            challenges: endpoints.challenges.clone(),
            submissions: endpoints.submissions.clone(),
            update_submission: endpoints.update_submission.clone(),
        }
    }

    pub(crate) fn challenges(&self) -> Result<Url, ApiError> {
        self.resolve(&self.challenges)
    }

    pub(crate) fn submissions(
        &self,
        challenge_id: u64,
        status: SubmissionStatus,
    ) -> Result<Url, ApiError> {
        self.resolve(
            &self
                .submissions
                .replace(CHALLENGE_PLACEHOLDER, &challenge_id.to_string())
                .replace(STATUS_PLACEHOLDER, status.as_str()),
        )
    }

    pub(crate) fn update_submission(&self, challenge_id: u64) -> Result<Url, ApiError> {
        self.resolve(
            &self
                .update_submission
                .replace(CHALLENGE_PLACEHOLDER, &challenge_id.to_string()),
        )
    }

    // Templates are appended to the host so a path prefix on the host survives
    fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        let separator = if path.starts_with('/') { "" } else { "/" };
        Ok(Url::parse(&format!("{}{separator}{path}", self.host))?)
    }
}
