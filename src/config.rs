use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{DisplayFormat, LocaleTag};

/// Per-instance options of a date picker field.
///
/// Every key is optional; missing keys take the defaults `DD/MM/YYYY` and `en-US`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickerConfig {
    pub date_format: DisplayFormat,
    pub locale: LocaleTag,
    /// Field name echoed in change notifications.
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unable to read picker config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid picker config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl PickerConfig {
    pub fn new(date_format: DisplayFormat, locale: impl Into<LocaleTag>) -> Self {
        Self {
            date_format,
            locale: locale.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// # Errors
    /// Returns `ConfigError::Toml` for malformed TOML or an unknown `dateFormat` pattern.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// # Errors
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as [`Self::from_toml_str`].
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded picker config from '{}'", path.display());
        Ok(config)
    }
}
