use reqwest::Url;

use crate::error::CommerceError;

const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Settings for talking to the local proxy from the client side.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub origin: Url,
    pub api_key: Option<String>,
}

impl ClientConfig {
    pub fn new(origin: &str, api_key: Option<String>) -> Result<Self, CommerceError> {
        let origin = Url::parse(origin).map_err(|e| CommerceError::Url(e.to_string()))?;
        Ok(Self { origin, api_key })
    }

    pub fn from_env() -> Result<Self, CommerceError> {
        let origin = super::lookup("STOREFRONT_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
        Self::new(&origin, super::lookup("COMMERCE_API_KEY"))
    }
}
