use reqwest::Url;

pub const DEFAULT_API_URL: &str = "https://www.moltbook.com/api/v1";

/// Location of the external commerce backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    api_base: String,
}

impl BackendConfig {
    pub fn new(api_base: impl Into<String>) -> Self {
        let api_base = api_base.into();
        Self {
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(super::lookup("COMMERCE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()))
    }

    /// Versioned API root, e.g. `https://host/api/v1`.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Host origin used to absolutize relative media paths.
    pub fn media_origin(&self) -> &str {
        self.api_base
            .strip_suffix("/api/v1")
            .unwrap_or(&self.api_base)
    }

    /// `{api_base}/{segments..}` with every segment percent-encoded, so an
    /// id containing `/` stays one segment. `None` for empty or dot
    /// segments and for a base that is not a URL.
    pub fn resource_url(&self, segments: &[&str]) -> Option<Url> {
        if segments.iter().any(|segment| matches!(*segment, "" | "." | "..")) {
            return None;
        }
        let mut url = Url::parse(&self.api_base).ok()?;
        url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
        Some(url)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
