use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, MalformedUrl};

/// Per-request timeout. A request that exceeds it surfaces as
/// [`ApiError::Network`], same as any other transport failure.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared HTTP client bound to one API base URL.
///
/// Every kindling call goes through the helpers here, so the token
/// placement (body field, or query param for the one GET that needs it)
/// and the status→error mapping live in exactly one place.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(MalformedUrl {
                url: base_url.to_string(),
            }
            .into());
        }
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.http.get(self.endpoint(path)).send().await?;
        debug!(path, status = %response.status(), "GET");
        Self::decode(response).await
    }

    pub(crate) async fn get_json_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.endpoint(path))
            .query(&[("token", token)])
            .send()
            .await?;
        debug!(path, status = %response.status(), "GET");
        Self::decode(response).await
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        debug!(path, status = %response.status(), "POST");
        Self::decode(response).await
    }

    /// POST whose response body the caller does not need.
    pub(crate) async fn post_unit<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self.http.post(self.endpoint(path)).json(body).send().await?;
        debug!(path, status = %response.status(), "POST");
        Self::check(response).await.map(|_| ())
    }

    pub(crate) async fn delete_unit<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        debug!(path, status = %response.status(), "DELETE");
        Self::check(response).await.map(|_| ())
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, message))
    }
}
