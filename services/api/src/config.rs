use std::net::{IpAddr, Ipv4Addr};

use greencart_core::body::DEFAULT_JSON_LIMIT;
use greencart_core::config::{ConfigError, parse_or, required, split_list};
use greencart_core::cors::CorsPolicy;

/// Origins allowed when `CORS_ORIGINS` is unset.
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = [
    "http://localhost:5173",
    "https://greencart-deploy-uiov.vercel.app",
];

pub const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

/// API configuration loaded once at startup and passed to each component.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address (default 0.0.0.0). Env var: `HOST`.
    pub host: IpAddr,
    /// TCP port for the HTTP server (default 4000). Env var: `PORT`.
    pub port: u16,
    /// Storage connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    pub media: CloudinaryConfig,
    pub webhook: WebhookConfig,
    /// Cross-origin allow-list. Env var: `CORS_ORIGINS` (comma-separated).
    pub cors: CorsPolicy,
    /// Largest JSON body accepted by parsed routes. Env var: `JSON_BODY_LIMIT`.
    pub json_body_limit: usize,
}

/// Media-storage credentials.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Env var: `CLOUDINARY_API_BASE`.
    pub api_base: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Payment webhook verification settings.
#[derive(Clone)]
pub struct WebhookConfig {
    /// Env var: `STRIPE_WEBHOOK_SECRET`.
    pub secret: String,
    /// Oldest accepted signature timestamp, in seconds (default 300).
    /// Env var: `STRIPE_WEBHOOK_TOLERANCE_SECS`.
    pub tolerance_secs: u64,
}

impl std::fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("secret", &"<redacted>")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let origins = lookup("CORS_ORIGINS")
            .map(|v| split_list(&v))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.map(str::to_owned).to_vec());
        let cors = CorsPolicy::new(&origins).map_err(|e| ConfigError::Invalid {
            key: "CORS_ORIGINS",
            reason: e.to_string(),
        })?;

        Ok(Self {
            host: parse_or(&lookup, "HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            port: parse_or(&lookup, "PORT", 4000)?,
            database_url: required(&lookup, "DATABASE_URL")?,
            media: CloudinaryConfig {
                cloud_name: required(&lookup, "CLOUDINARY_CLOUD_NAME")?,
                api_key: required(&lookup, "CLOUDINARY_API_KEY")?,
                api_secret: required(&lookup, "CLOUDINARY_API_SECRET")?,
                api_base: parse_or(
                    &lookup,
                    "CLOUDINARY_API_BASE",
                    DEFAULT_CLOUDINARY_API_BASE.to_owned(),
                )?,
            },
            webhook: WebhookConfig {
                secret: required(&lookup, "STRIPE_WEBHOOK_SECRET")?,
                tolerance_secs: parse_or(&lookup, "STRIPE_WEBHOOK_TOLERANCE_SECS", 300)?,
            },
            cors,
            json_body_limit: parse_or(&lookup, "JSON_BODY_LIMIT", DEFAULT_JSON_LIMIT)?,
        })
    }
}
