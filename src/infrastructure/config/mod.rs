use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::error::{AppError, Result};

const DEFAULT_CONFIG_FILE: &str = "relay.toml";

/// Startup settings for the relay endpoint.
///
/// Sources, later ones winning: built-in defaults, `relay.toml` (or the file
/// named by `RELAY_CONFIG`), then `RELAY_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    #[validate(custom(function = "validate_http_url"))]
    pub downstream_base_url: String,
    #[validate(custom(function = "validate_route"))]
    pub downstream_route: String,
    #[validate(custom(function = "validate_http_url"))]
    pub allowed_origin: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5224,
            downstream_base_url: "http://localhost:8000".to_string(),
            downstream_route: "/upload-dataset".to_string(),
            allowed_origin: "http://localhost:4200".to_string(),
        }
    }
}

impl RelayConfig {
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn figment() -> Figment {
        let file = std::env::var("RELAY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed("RELAY_"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        config
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid relay config: {}", e)))?;
        Ok(config)
    }

    /// Full URL uploads are forwarded to.
    pub fn downstream_upload_url(&self) -> String {
        format!(
            "{}{}",
            self.downstream_base_url.trim_end_matches('/'),
            self.downstream_route
        )
    }
}

/// Where the client uploader sends files.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    pub relay_url: String,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            relay_url: "http://localhost:5224/api/analyze".to_string(),
        }
    }
}

fn validate_http_url(value: &str) -> std::result::Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.has_host() => Ok(()),
        _ => Err(ValidationError::new("http_url")),
    }
}

fn validate_route(value: &str) -> std::result::Result<(), ValidationError> {
    if value.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::new("route_leading_slash"))
    }
}
