use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://studio.localhost/designer";

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub org: String,
    pub app: String,
    pub token: Option<String>,
    pub layout_set: String,
    pub request_timeout: Duration,
    pub autosave_debounce: Duration,
    pub is_production: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let base_url = non_empty("STUDIO_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            anyhow::bail!("STUDIO_BASE_URL must be an http(s) URL, got '{base_url}'");
        }
        let org = non_empty("STUDIO_ORG").unwrap_or_else(|| "ttd".into());
        let app = non_empty("STUDIO_APP").unwrap_or_default();
        let token = non_empty("STUDIO_TOKEN");
        let layout_set = non_empty("STUDIO_LAYOUT_SET").unwrap_or_else(|| "form".into());
        let request_timeout = Duration::from_secs(
            non_empty("STUDIO_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        );
        let autosave_debounce = Duration::from_millis(
            non_empty("AUTOSAVE_DEBOUNCE_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(500),
        );
        let is_production = matches!(
            lookup("RUST_ENV").as_deref(),
            Some("production") | Some("prod")
        );

        if is_production && !base_url.starts_with("https://") {
            anyhow::bail!("STUDIO_BASE_URL must use https in production");
        }

        Ok(Self {
            base_url,
            org,
            app,
            token,
            layout_set,
            request_timeout,
            autosave_debounce,
            is_production,
        })
    }

    /// Commands that touch a repository need an app.
    pub fn require_app(&self) -> anyhow::Result<&str> {
        if self.app.is_empty() {
            anyhow::bail!("STUDIO_APP is not set");
        }
        Ok(&self.app)
    }
}
