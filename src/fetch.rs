//! HTTP retrieval of the trip payload.

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::DataSourceError;

/// Transport seam so tests and alternative backends can stand in for a real
/// HTTP client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response>;
}

/// Default reqwest-backed client with request and connect timeouts.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Result<Self, DataSourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(DataSourceError::Client)?;

        Ok(Self(client))
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

/// Fetches the raw trip payload from `url`.
///
/// # Errors
///
/// Returns [`DataSourceError`] for an invalid URL, a transport failure, or a
/// non-success status. The caller decides whether to keep previously loaded
/// data; nothing here is fatal.
pub async fn fetch_trip_bytes<C: HttpClient>(
    client: &C,
    url: &str,
) -> Result<Vec<u8>, DataSourceError> {
    let parsed = url
        .parse()
        .map_err(|_| DataSourceError::BadUrl(url.to_string()))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|source| DataSourceError::Request {
            url: url.to_string(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(DataSourceError::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|source| DataSourceError::Request {
            url: url.to_string(),
            source,
        })?;

    Ok(bytes.to_vec())
}
