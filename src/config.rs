use crate::render::html::HtmlStyle;
use crate::slides::SlideshowConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Where and how to reach the lyrics API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// URL with `{title}` and `{artist}` placeholders
    pub url_template: String,
    /// Sent verbatim as the `Authorization` header
    pub auth: Option<String>,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Read `API_URL`, `API_AUTH` and `API_TIMEOUT_SECS` from the environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url_template = get("API_URL")
            .filter(|url| !url.trim().is_empty())
            .context("API_URL is not set; point it at the lyrics API, e.g. https://host/{title}/{artist}/")?;

        let auth = get("API_AUTH").filter(|auth| !auth.is_empty());

        let timeout = match get("API_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse()
                    .with_context(|| format!("API_TIMEOUT_SECS is not a number: {}", secs))?,
            ),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        if !url_template.contains("{title}") {
            tracing::warn!("API_URL has no {{title}} placeholder: {}", url_template);
        }

        Ok(Self {
            url_template,
            auth,
            timeout,
        })
    }
}

/// User settings, stored as JSON. Every key is optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub slideshow: SlideshowConfig,
    pub html: HtmlStyle,
}

impl Settings {
    /// Load settings from `path`, or from the data directory when no path is given.
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (crate::paths::get_settings_path()?, false),
        };

        if !explicit && !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&json)
            .with_context(|| format!("Invalid settings file: {}", path.display()))?;
        settings
            .slideshow
            .validate()
            .with_context(|| format!("Invalid settings file: {}", path.display()))?;

        tracing::info!("Settings loaded from {}", path.display());
        Ok(settings)
    }
}
