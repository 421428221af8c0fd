use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::{contact, header, nested, tracker};

pub const SETTINGS_FILE: &str = "portfolio.toml";

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("relay endpoint '{endpoint}' is not a valid URL: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("relay endpoint scheme '{0}' is not http or https")]
    UnsupportedScheme(String),
    #[error("visibility threshold {0} must be within (0, 1]")]
    InvalidThreshold(f64),
    #[error("{key} must not be negative (got {value})")]
    Negative { key: &'static str, value: f64 },
    #[error("{key} must be a finite number (got {value})")]
    NotFinite { key: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub relay_endpoint: Option<String>,
    pub header_hide_offset: f64,
    pub scroll_up_offset: f64,
    pub visibility_threshold: f64,
    pub nested_bottom_tolerance: f64,
    pub nested_step: f64,
    pub success_clear_ms: u64,
    pub hero_section: Option<String>,
    pub theme_sound: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            relay_endpoint: None,
            header_hide_offset: header::DEFAULT_HIDE_OFFSET,
            scroll_up_offset: header::DEFAULT_SCROLL_UP_OFFSET,
            visibility_threshold: tracker::DEFAULT_VISIBILITY_THRESHOLD,
            nested_bottom_tolerance: nested::DEFAULT_BOTTOM_TOLERANCE,
            nested_step: nested::DEFAULT_STEP,
            success_clear_ms: contact::DEFAULT_SUCCESS_CLEAR.as_millis() as u64,
            hero_section: None,
            theme_sound: true,
        }
    }
}

impl SiteSettings {
    pub fn success_clear(&self) -> Duration {
        Duration::from_millis(self.success_clear_ms)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(endpoint) = &self.relay_endpoint {
            let parsed = Url::parse(endpoint).map_err(|err| SettingsError::InvalidEndpoint {
                endpoint: endpoint.clone(),
                reason: err.to_string(),
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(SettingsError::UnsupportedScheme(parsed.scheme().to_string()));
            }
        }

        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            return Err(SettingsError::InvalidThreshold(self.visibility_threshold));
        }

        for (key, value) in [
            ("header_hide_offset", self.header_hide_offset),
            ("scroll_up_offset", self.scroll_up_offset),
            ("nested_bottom_tolerance", self.nested_bottom_tolerance),
            ("nested_step", self.nested_step),
        ] {
            if !value.is_finite() {
                return Err(SettingsError::NotFinite { key, value });
            }
            if value < 0.0 {
                return Err(SettingsError::Negative { key, value });
            }
        }

        Ok(())
    }
}

/// Defaults, then the TOML file, then `APP__*` environment overrides.
///
/// An explicit `path` must exist; without one, `portfolio.toml` in the
/// working directory is read when present.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<SiteSettings> {
    let mut settings = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
            parse_settings(&raw)
                .with_context(|| format!("invalid settings file '{}'", path.display()))?
        }
        None => match fs::read_to_string(SETTINGS_FILE) {
            Ok(raw) => parse_settings(&raw)
                .with_context(|| format!("invalid settings file '{SETTINGS_FILE}'"))?,
            Err(_) => SiteSettings::default(),
        },
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    settings.validate()?;
    Ok(settings)
}

pub fn parse_settings(raw: &str) -> Result<SiteSettings, toml::de::Error> {
    toml::from_str(raw)
}

/// Applies `APP__<KEY>` overrides. Values that do not parse are ignored.
pub fn apply_env_overrides(settings: &mut SiteSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("APP__RELAY_ENDPOINT") {
        settings.relay_endpoint = Some(v).filter(|v| !v.trim().is_empty());
    }
    if let Some(v) = lookup("APP__HERO_SECTION") {
        settings.hero_section = Some(v).filter(|v| !v.trim().is_empty());
    }

    override_parsed(&lookup, "APP__HEADER_HIDE_OFFSET", &mut settings.header_hide_offset);
    override_parsed(&lookup, "APP__SCROLL_UP_OFFSET", &mut settings.scroll_up_offset);
    override_parsed(&lookup, "APP__VISIBILITY_THRESHOLD", &mut settings.visibility_threshold);
    override_parsed(
        &lookup,
        "APP__NESTED_BOTTOM_TOLERANCE",
        &mut settings.nested_bottom_tolerance,
    );
    override_parsed(&lookup, "APP__NESTED_STEP", &mut settings.nested_step);
    override_parsed(&lookup, "APP__SUCCESS_CLEAR_MS", &mut settings.success_clear_ms);
    override_parsed(&lookup, "APP__THEME_SOUND", &mut settings.theme_sound);
}

fn override_parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
) {
    if let Some(parsed) = lookup(key).and_then(|v| v.trim().parse::<T>().ok()) {
        *slot = parsed;
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
