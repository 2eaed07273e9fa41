//! Media-storage (Cloudinary) connection.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::info;

use crate::config::CloudinaryConfig;

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("missing media-storage credential: {0}")]
    MissingCredential(&'static str),
    #[error("media storage rejected credentials with status {0}")]
    Rejected(StatusCode),
    #[error("media storage ping returned status {0:?}")]
    Unhealthy(String),
    #[error("media storage unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct PingResponse {
    status: String,
}

/// Authenticated handle to the media-storage account.
#[derive(Clone)]
pub struct MediaStorage {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl MediaStorage {
    /// Validate credentials and ping the account. Fails instead of returning a
    /// handle that would only error once a request needs it.
    pub async fn connect(config: CloudinaryConfig) -> Result<Self, MediaError> {
        for (name, value) in [
            ("cloud_name", &config.cloud_name),
            ("api_key", &config.api_key),
            ("api_secret", &config.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(MediaError::MissingCredential(name));
            }
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        let storage = Self { client, config };
        storage.ping().await?;

        info!(cloud_name = %storage.config.cloud_name, "media storage connected");
        Ok(storage)
    }

    pub fn cloud_name(&self) -> &str {
        &self.config.cloud_name
    }

    /// Base URL of the account's admin API, e.g. `https://api.cloudinary.com/v1_1/demo`.
    pub fn account_url(&self) -> String {
        format!(
            "{}/v1_1/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    pub async fn ping(&self) -> Result<(), MediaError> {
        let response = self
            .client
            .get(format!("{}/ping", self.account_url()))
            .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Rejected(status));
        }
        let body: PingResponse = response.json().await?;
        if body.status != "ok" {
            return Err(MediaError::Unhealthy(body.status));
        }
        Ok(())
    }
}
