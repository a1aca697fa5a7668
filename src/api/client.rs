use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{DriverLensError, Result};

/// HTTP client for a DriverLog service, rooted at its `/api/1.0/` prefix.
pub struct DriverLogClient {
    pub client: Client,
    pub api_url: Url,
}

impl DriverLogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("driverlens/0.1.0")
            .build()
            .map_err(|e| {
                DriverLensError::ConfigError(format!("Failed to create HTTP client: {e}"))
            })?;

        let api_url = Url::parse(base_url)
            .map_err(|e| DriverLensError::ConfigError(format!("Invalid base URL: {e}")))?
            .join("api/1.0/")
            .map_err(|e| DriverLensError::ConfigError(format!("Invalid API base URL: {e}")))?;

        Ok(Self { client, api_url })
    }

    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| DriverLensError::ConfigError(format!("Invalid endpoint URL: {e}")))
    }

    /// GET an endpoint and deserialize its JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T> {
        let url = self.endpoint_url(path)?;
        let response = self.client.get(url).query(params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriverLensError::ApiError(format!(
                "Failed to fetch {path}: {status} - {body}"
            )));
        }

        Ok(response.json::<T>().await?)
    }
}
