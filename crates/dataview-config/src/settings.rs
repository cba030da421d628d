//! Application settings loaded from a TOML file.
//!
//! ```toml
//! [general]
//! api_datatable_default_limit = 100
//!
//! [login]
//! nonce_ttl_secs = 600
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub login: LoginSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Row limit used in export links and as the default page size.
    pub api_datatable_default_limit: i64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            api_datatable_default_limit: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginSettings {
    /// Lifetime of form nonces, in seconds.
    pub nonce_ttl_secs: i64,
    /// Secret mixed into form nonces.
    pub nonce_secret: String,
}

impl Default for LoginSettings {
    fn default() -> Self {
        Self {
            nonce_ttl_secs: 600,
            nonce_secret: String::new(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Load settings from `path`.
///
/// A missing file yields the defaults; unreadable or malformed files are
/// errors.
pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    match fs::read_to_string(path) {
        Ok(content) => {
            let settings = Settings::from_toml_str(&content)
                .map_err(|source| SettingsError::toml(path, source))?;
            tracing::debug!(path = %path.display(), "loaded settings");
            Ok(settings)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no settings file found, using defaults");
            Ok(Settings::default())
        }
        Err(e) => Err(SettingsError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml_str("[general]\napi_datatable_default_limit = 25\n")
            .unwrap();
        assert_eq!(settings.general.api_datatable_default_limit, 25);
        assert_eq!(settings.login, LoginSettings::default());
    }

    #[test]
    fn default_settings_round_trip() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed = Settings::from_toml_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
