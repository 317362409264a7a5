use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use url::Url;

pub(crate) mod client;
#[cfg(test)]
pub(crate) mod fake;
pub(crate) mod models;
pub(crate) mod routes;

#[derive(Debug, Error)]
pub(crate) enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}) from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Auth token can not be sent as a header value")]
    InvalidToken,
}

/// The two calls every operation is built on, a JSON read and a JSON update.
pub(crate) trait Api {
    fn get<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError>;

    fn patch<B: Serialize>(&self, url: &Url, body: &B) -> Result<(), ApiError>;
}
