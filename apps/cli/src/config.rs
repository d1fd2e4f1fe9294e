use std::{fs, io, path::Path};

use anyhow::{bail, Context, Result};
use client_core::DEFAULT_API_BASE_URL;
use serde::Deserialize;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "review_client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
}

/// Resolves settings from defaults, the TOML file at `config_path`, the
/// environment, and finally the command line, later sources winning.
pub fn load_settings(config_path: &Path, cli_api_base_url: Option<&str>) -> Result<Settings> {
    load_settings_with_env(config_path, cli_api_base_url, |key| std::env::var(key).ok())
}

fn load_settings_with_env(
    config_path: &Path,
    cli_api_base_url: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(config_path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw).with_context(|| {
                format!("failed to parse config file '{}'", config_path.display())
            })?;
            if let Some(v) = file_cfg.api_base_url {
                settings.api_base_url = v;
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| {
                format!("failed to read config file '{}'", config_path.display())
            });
        }
    }

    if let Some(v) = env("REVIEW_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = cli_api_base_url {
        settings.api_base_url = v.to_string();
    }

    settings.api_base_url = normalize_api_base_url(&settings.api_base_url)?;
    Ok(settings)
}

fn normalize_api_base_url(raw: &str) -> Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Settings::default().api_base_url);
    }

    let parsed = Url::parse(raw).with_context(|| format!("invalid API base URL '{raw}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!("API base URL '{raw}' must use http or https");
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
