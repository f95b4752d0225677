//! Configuration for patfam-core
//!
//! The jurisdiction preference order is plain data passed into the engine,
//! never read from ambient settings. It is typically stored as the
//! space-separated string users edit in their settings (`US WO EP ...`).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ordered list of jurisdiction codes, most preferred first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PreferenceSetting", into = "Vec<String>")]
pub struct PreferenceOrder {
    codes: Vec<String>,
}

/// Accepted on-disk shapes: a list of codes or a settings string
#[derive(Deserialize)]
#[serde(untagged)]
enum PreferenceSetting {
    Codes(Vec<String>),
    Setting(String),
}

impl PreferenceOrder {
    /// The default ordering as users see it in settings
    pub const DEFAULT_SETTING: &'static str = "US WO EP GB FR DE CH JP RU SU";

    /// Build from individual codes. Codes are uppercased; repeats keep their
    /// first position.
    pub fn new<I, S>(codes: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for code in codes {
            let code = impress_patents::parse_jurisdiction(code.as_ref())?;
            if !ordered.contains(&code) {
                ordered.push(code);
            }
        }

        if ordered.is_empty() {
            return Err(ConfigError::EmptyPreference);
        }
        Ok(PreferenceOrder { codes: ordered })
    }

    /// Parse a settings string; codes may be separated by spaces or commas.
    pub fn parse(setting: &str) -> Result<Self, ConfigError> {
        Self::new(
            setting
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|code| !code.is_empty()),
        )
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Position of a jurisdiction in the order.
    ///
    /// Unknown or missing jurisdictions rank at `len()`, after every listed code.
    pub fn rank_of(&self, jurisdiction: Option<&str>) -> usize {
        jurisdiction
            .and_then(|code| {
                self.codes
                    .iter()
                    .position(|c| c.eq_ignore_ascii_case(code))
            })
            .unwrap_or(self.codes.len())
    }

    /// Space-separated form suitable for a settings field
    pub fn to_setting_string(&self) -> String {
        self.codes.join(" ")
    }
}

impl Default for PreferenceOrder {
    fn default() -> Self {
        PreferenceOrder {
            codes: Self::DEFAULT_SETTING
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl FromStr for PreferenceOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PreferenceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_setting_string())
    }
}

impl TryFrom<PreferenceSetting> for PreferenceOrder {
    type Error = ConfigError;

    fn try_from(setting: PreferenceSetting) -> Result<Self, Self::Error> {
        match setting {
            PreferenceSetting::Codes(codes) => Self::new(codes),
            PreferenceSetting::Setting(setting) => Self::parse(&setting),
        }
    }
}

impl From<PreferenceOrder> for Vec<String> {
    fn from(order: PreferenceOrder) -> Self {
        order.codes
    }
}

/// Engine-wide configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Jurisdiction ranking used to pick a family representative
    pub preference: PreferenceOrder,
    /// Apply jurisdiction-specific correction after generic normalization
    pub correct_variations: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            preference: PreferenceOrder::default(),
            correct_variations: true,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preference(mut self, preference: PreferenceOrder) -> Self {
        self.preference = preference;
        self
    }

    /// Check every preference code is a jurisdiction code. Emptiness is
    /// already ruled out by the `PreferenceOrder` constructors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for code in self.preference.codes() {
            impress_patents::parse_jurisdiction(code)?;
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from a file; `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_toml(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/patfam/config.toml`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("patfam").join("config.toml"))
    }

    /// Load from the default path if a file exists there, else use defaults.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading engine config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}
