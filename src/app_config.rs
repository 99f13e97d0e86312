use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::culture::{SupportedCultures, parse_culture};
use crate::localization::resource::CacheKeyMode;

/// Localization configuration module
/// This module handles loading and validating the settings that drive
/// resource identification, fallback behaviour and the backing store.
/// Represents the library configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Localizer behaviour
    #[serde(default)]
    pub localization: LocalizationOptions,

    /// Culture settings shared with the host's request pipeline
    #[serde(default)]
    pub request_localization: RequestLocalizationOptions,

    /// Record store location
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Options controlling resource identification and missing-text fallbacks
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocalizationOptions {
    /// Identify resources by their fully qualified name
    #[serde(default)]
    pub use_type_full_names: bool,

    /// Put every string into the single global resource
    #[serde(default)]
    pub use_only_property_names: bool,

    /// Return the bare key when a translation is missing
    #[serde(default)]
    pub return_only_key_if_not_found: bool,

    /// Insert a record for every missing translation (development mode)
    #[serde(default)]
    pub create_new_record_when_localised_string_does_not_exist: bool,

    /// Use `{key}.{culture}` rather than `{key}` as text of new records
    #[serde(default = "default_true")]
    pub append_culture_to_new_record_text: bool,
}

impl LocalizationOptions {
    /// Build options from the four switches hosts usually configure together
    pub fn use_settings(
        use_type_full_names: bool,
        use_only_property_names: bool,
        return_only_key_if_not_found: bool,
        create_new_record_when_localised_string_does_not_exist: bool,
    ) -> Self {
        Self {
            use_type_full_names,
            use_only_property_names,
            return_only_key_if_not_found,
            create_new_record_when_localised_string_does_not_exist,
            append_culture_to_new_record_text: default_true(),
        }
    }

    /// The resource identification mode implied by the switches
    ///
    /// The global bucket takes precedence over full type names.
    pub fn cache_key_mode(&self) -> CacheKeyMode {
        if self.use_only_property_names {
            CacheKeyMode::Global
        } else if self.use_type_full_names {
            CacheKeyMode::FullTypeName
        } else {
            CacheKeyMode::ShortTypeName
        }
    }
}

impl Default for LocalizationOptions {
    fn default() -> Self {
        Self::use_settings(false, false, false, false)
    }
}

/// Culture settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RequestLocalizationOptions {
    /// Culture used when no ambient culture is set
    #[serde(default = "default_culture")]
    pub default_culture: String,

    /// Cultures for which records may be auto-provisioned
    #[serde(default = "default_supported_cultures")]
    pub supported_cultures: Vec<String>,
}

impl Default for RequestLocalizationOptions {
    fn default() -> Self {
        Self {
            default_culture: default_culture(),
            supported_cultures: default_supported_cultures(),
        }
    }
}

/// Record store location
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct DatabaseConfig {
    /// SQLite file; `:memory:` for a private in-memory store, unset for the default location
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// Whether the configuration asks for an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.path
            .as_deref()
            .is_some_and(|p| p.as_os_str() == IN_MEMORY_PATH)
    }
}

/// Path value selecting an in-memory database
pub const IN_MEMORY_PATH: &str = ":memory:";

fn default_true() -> bool {
    true
}

fn default_culture() -> String {
    "en-US".to_string()
}

fn default_supported_cultures() -> Vec<String> {
    ["en-US", "de-CH", "fr-CH", "it-CH"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {:?}", path))?;

        Self::from_json(&content)
            .with_context(|| format!("Failed to parse configuration file: {:?}", path))
    }

    /// Parse a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let cultures = &self.request_localization;

        if cultures.supported_cultures.is_empty() {
            return Err(anyhow!("At least one supported culture must be configured"));
        }

        for culture in &cultures.supported_cultures {
            parse_culture(culture).with_context(|| "Invalid supported culture")?;
        }

        parse_culture(&cultures.default_culture).with_context(|| "Invalid default culture")?;

        if !self.supported_cultures()?.contains(&cultures.default_culture) {
            return Err(anyhow!(
                "Default culture '{}' is not among the supported cultures",
                cultures.default_culture
            ));
        }

        Ok(())
    }

    /// The supported cultures as a lookup set
    pub fn supported_cultures(&self) -> Result<SupportedCultures> {
        SupportedCultures::new(&self.request_localization.supported_cultures)
    }
}
