//! Stats API client (dashboard → livestat server).

use reqwest::{Client, StatusCode};
use url::Url;

use super::ClientError;
use crate::objects::stats::StatsResponse;

/// Typed HTTP client for the livestat **stats endpoint**.
#[derive(Debug, Clone)]
pub struct StatsClient {
    http: Client,
    base_url: Url,
}

impl StatsClient {
    /// Create a new `StatsClient`.
    ///
    /// * `base_url` – root URL of the livestat server (e.g. `http://127.0.0.1:8080`).
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `GET /stats` – fetch the current aggregate snapshot.
    ///
    /// A `503 Service Unavailable` maps to [`ClientError::NotReady`] so
    /// callers can tell "no events yet" (an all-zero snapshot) apart from
    /// "not running".
    pub async fn stats(&self) -> Result<StatsResponse, ClientError> {
        let url = self.base_url.join("/stats")?;

        let resp = self.http.get(url).send().await?;

        parse_response(resp).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ClientError> {
    let status = resp.status();
    if status == StatusCode::SERVICE_UNAVAILABLE {
        return Err(ClientError::NotReady);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(ClientError::Json)
}
