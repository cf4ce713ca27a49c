use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use tracing::{debug, warn};

use crate::{
    api::{AdminApi, ApiError, decode_list},
    models::{Customer, CustomerPatch, RecordId, Worker},
};

/// [`AdminApi`] over HTTP using [`reqwest`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: Url,
}

impl HttpApi {
    /// Create a client for the API rooted at `base_url`, e.g. `http://localhost:8000/api`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ApiError> {
        let invalid = |reason: String| ApiError::InvalidUrl {
            url: base_url.to_owned(),
            reason,
        };

        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|err| invalid(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("not a hierarchical URL".into()));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append `segments` to the base URL. Each segment is percent-encoded, so an id can never
    /// change which resource is addressed.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Turn a non-success response into [`ApiError::Status`], keeping the parsed error body.
    async fn ensure_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), %body, "API request rejected");

        Err(ApiError::from_status(status.as_u16(), &body))
    }
}

#[async_trait]
impl AdminApi for HttpApi {
    async fn list_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let response = self.client.get(self.url(&["customers"])).send().await?;
        let body = Self::ensure_success(response).await?.text().await?;

        let customers = decode_list(&body)?;
        debug!(count = customers.len(), "Fetched customers");

        Ok(customers)
    }

    async fn update_customer(&self, id: &RecordId, patch: &CustomerPatch) -> Result<(), ApiError> {
        let id = id.to_string();
        let response = self
            .client
            .put(self.url(&["customers", id.as_str()]))
            .json(patch)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn delete_customer(&self, id: &RecordId) -> Result<(), ApiError> {
        let id = id.to_string();
        let response = self
            .client
            .delete(self.url(&["customers", id.as_str()]))
            .send()
            .await?;

        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn list_workers(&self) -> Result<Vec<Worker>, ApiError> {
        let response = self.client.get(self.url(&["workers"])).send().await?;
        let body = Self::ensure_success(response).await?.text().await?;

        let workers = decode_list(&body)?;
        debug!(count = workers.len(), "Fetched workers");

        Ok(workers)
    }
}
