use reqwest::{
    blocking::{Client, ClientBuilder, RequestBuilder, Response},
    header::{HeaderValue, AUTHORIZATION},
};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use super::{Api, ApiError};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Blocking client, every request carries the bearer token.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: Client,
    authorization: HeaderValue,
}

impl HttpClient {
    pub(crate) fn new(auth_token: &str) -> Result<Self, ApiError> {
        Self::with_builder(auth_token, Client::builder())
    }

    pub(crate) fn with_builder(auth_token: &str, builder: ClientBuilder) -> Result<Self, ApiError> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {auth_token}"))
            .map_err(|_| ApiError::InvalidToken)?;
        authorization.set_sensitive(true);
        let client = builder.user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            authorization,
        })
    }

    fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response, ApiError> {
        let response = request
            .header(AUTHORIZATION, self.authorization.clone())
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(response)
    }
}

impl Api for HttpClient {
    fn get<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ApiError> {
        log::debug!("GET {url}");
        let body = self.send(self.client.get(url.clone()), url)?.text()?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn patch<B: Serialize>(&self, url: &Url, body: &B) -> Result<(), ApiError> {
        log::debug!("PATCH {url}");
        // Only the status code matters, the updated record is not read back
        self.send(self.client.patch(url.clone()).json(body), url)?;
        Ok(())
    }
}
