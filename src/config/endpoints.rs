use std::{path::Path, time::SystemTime};

use confy::ConfyError;
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Metadata {
    pub(crate) version: String,
    pub(crate) created: SystemTime,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            created: SystemTime::now(),
        }
    }
}

/// Path templates relative to the API host.
///
/// `{challenge}` is replaced with the challenge id and `{status}` with the
/// submission status being listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct EndpointConfig {
    pub(crate) challenges: String,
    pub(crate) submissions: String,
    pub(crate) update_submission: String,
    pub(crate) metadata: Metadata,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            challenges: "/api/challenges/challenge/all/all/all".to_string(),
            submissions: "/api/jobs/challenge/{challenge}/submission/?status={status}"
                .to_string(),
            update_submission: "/api/jobs/challenge/{challenge}/update_submission/".to_string(),
            metadata: Metadata::default(),
        }
    }
}

impl EndpointConfig {
    pub(crate) fn load(app_name: &str, config_name: &str) -> Self {
        Self::accept(confy::load(app_name, config_name))
    }

    pub(crate) fn load_path(path: &Path) -> Self {
        Self::accept(confy::load_path(path))
    }

    // Stored templates written by another release may not match this one's routes
    fn accept(stored: Result<EndpointConfig, ConfyError>) -> Self {
        match stored {
            Ok(config) if config.metadata.version == env!("CARGO_PKG_VERSION") => config,
            Ok(config) => {
                log::warn!(
                    "Ignoring endpoint config written by version {}, using defaults",
                    config.metadata.version
                );
                EndpointConfig::default()
            }
            Err(err) => {
                log::warn!("Could not load endpoint config, using defaults: {err}");
                EndpointConfig::default()
            }
        }
    }
}
