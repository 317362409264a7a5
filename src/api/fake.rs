use std::{cell::RefCell, collections::HashMap};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use url::Url;

use super::{Api, ApiError};

/// In memory platform, responses keyed by full url.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    responses: HashMap<String, Value>,
    failures: HashMap<String, u16>,
    pub(crate) gets: RefCell<Vec<String>>,
    pub(crate) patches: RefCell<Vec<(String, Value)>>,
}

impl FakeApi {
    pub(crate) fn with_response(mut self, url: &str, body: Value) -> Self {
        self.responses.insert(url.to_string(), body);
        self
    }

    pub(crate) fn with_fixture(self, url: &str, fixture: &str) -> Self {
        let raw = std::fs::read_to_string(format!("fixtures/{fixture}"))
            .unwrap_or_else(|err| panic!("missing fixture {fixture}: {err}"));
        let body = serde_json::from_str(&raw)
            .unwrap_or_else(|err| panic!("invalid fixture {fixture}: {err}"));
        self.with_response(url, body)
    }

    pub(crate) fn with_failure(mut self, url: &str, status: u16) -> Self {
        self.failures.insert(url.to_string(), status);
        self
    }

    fn failure(&self, url: &Url) -> Option<ApiError> {
        self.failures.get(url.as_str()).map(|status| ApiError::Status {
            status: *status,
            url: url.to_string(),
            body: "fake failure".to_string(),
        })
    }
}

impl Api for FakeApi {
    fn get<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError> {
        self.gets.borrow_mut().push(url.to_string());
        if let Some(error) = self.failure(url) {
            return Err(error);
        }
        let body = self
            .responses
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                url: url.to_string(),
                body: "not found".to_string(),
            })?;
        serde_json::from_value(body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn patch<B: Serialize>(&self, url: &Url, body: &B) -> Result<(), ApiError> {
        if let Some(error) = self.failure(url) {
            return Err(error);
        }
        let body = serde_json::to_value(body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })?;
        self.patches.borrow_mut().push((url.to_string(), body));
        Ok(())
    }
}
