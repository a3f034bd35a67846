use std::net::SocketAddr;

use anyhow::{Context, Result};
use reqwest::Url;

use super::BackendConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Settings for the proxy binary.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub backend: BackendConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let port = match super::lookup("PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("PORT must be a number, got {raw:?}"))?,
            None => DEFAULT_PORT,
        };

        let cors_allowed_origins = super::lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let backend = BackendConfig::from_env();
        Url::parse(backend.api_base())
            .with_context(|| format!("COMMERCE_API_URL must be a URL, got {:?}", backend.api_base()))?;

        Ok(Self {
            port,
            cors_allowed_origins,
            backend,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], self.port))
    }
}
