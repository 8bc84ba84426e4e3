//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::params::{coerce_number, format_number, DEFAULT_BASE_URL, DEFAULT_SCALE, DEFAULT_STEPS};

/// Environment variable overriding the service base URL.
pub const BASE_URL_ENV: &str = "TXT2IMG_BASE_URL";

/// Environment variable pointing at a config file.
pub const CONFIG_ENV: &str = "TXT2IMG_CONFIG";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Where the image service lives.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Initial form values.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Image service location.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceConfig {
    /// Base URL, e.g. `http://gpu-box:8000`.
    pub base_url: Option<String>,
}

/// Initial values of the numeric form fields.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Initial steps.
    pub steps: f64,
    /// Initial scale.
    pub scale: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { steps: coerce_number(DEFAULT_STEPS), scale: coerce_number(DEFAULT_SCALE) }
    }
}

impl DefaultsConfig {
    /// Steps as it appears in the form field.
    #[must_use]
    pub fn steps_text(&self) -> String {
        format_number(self.steps)
    }

    /// Scale as it appears in the form field.
    #[must_use]
    pub fn scale_text(&self) -> String {
        format_number(self.scale)
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// The service base URL: explicit flag, then environment, then file, then default.
    #[must_use]
    pub fn base_url(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_string)
            .or_else(|| std::env::var(BASE_URL_ENV).ok())
            .or_else(|| self.service.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `TXT2IMG_CONFIG` environment variable
/// 3. `~/.config/txt2img/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/txt2img/config.toml")
    } else {
        PathBuf::from("txt2img.toml")
    }
}
