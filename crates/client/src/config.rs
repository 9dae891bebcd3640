//! Client configuration, read from the environment.

use std::time::Duration;

use anyhow::Context;

use catalogdesk_products::DEFAULT_MAX_COLORS;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_IMAGE_HOST_URL: &str = "https://api.cloudinary.com/v1_1";
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Image host (Cloudinary-style unsigned upload) settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHostConfig {
    pub base_url: String,
    pub cloud_name: Option<String>,
    pub upload_preset: Option<String>,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_IMAGE_HOST_URL.to_string(),
            cloud_name: None,
            upload_preset: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub auth_token: Option<String>,
    pub image_host: ImageHostConfig,
    pub max_colors: usize,
    pub search_debounce: Duration,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: trim_base(api_url.into()),
            auth_token: None,
            image_host: ImageHostConfig::default(),
            max_colors: DEFAULT_MAX_COLORS,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_image_host(
        mut self,
        base_url: impl Into<String>,
        cloud_name: impl Into<String>,
        upload_preset: impl Into<String>,
    ) -> Self {
        self.image_host = ImageHostConfig {
            base_url: trim_base(base_url.into()),
            cloud_name: Some(cloud_name.into()),
            upload_preset: Some(upload_preset.into()),
        };
        self
    }

    pub fn with_max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = max_colors;
        self
    }

    pub fn with_search_debounce(mut self, debounce: Duration) -> Self {
        self.search_debounce = debounce;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load from `CATALOGDESK_*` variables, reading `.env` first if present.
    pub fn from_env() -> anyhow::Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(
            get("CATALOGDESK_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        );
        config.auth_token = get("CATALOGDESK_AUTH_TOKEN");
        config.image_host = ImageHostConfig {
            base_url: trim_base(
                get("CATALOGDESK_IMAGE_HOST_URL")
                    .unwrap_or_else(|| DEFAULT_IMAGE_HOST_URL.to_string()),
            ),
            cloud_name: get("CATALOGDESK_CLOUD_NAME"),
            upload_preset: get("CATALOGDESK_UPLOAD_PRESET"),
        };

        if let Some(raw) = get("CATALOGDESK_MAX_COLORS") {
            config.max_colors = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid CATALOGDESK_MAX_COLORS value: {raw:?}"))?;
        }
        if let Some(raw) = get("CATALOGDESK_SEARCH_DEBOUNCE_MS") {
            let ms: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid CATALOGDESK_SEARCH_DEBOUNCE_MS value: {raw:?}"))?;
            config.search_debounce = Duration::from_millis(ms);
        }
        if let Some(raw) = get("CATALOGDESK_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().with_context(|| {
                format!("invalid CATALOGDESK_REQUEST_TIMEOUT_SECS value: {raw:?}")
            })?;
            anyhow::ensure!(secs > 0, "CATALOGDESK_REQUEST_TIMEOUT_SECS must be positive");
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
