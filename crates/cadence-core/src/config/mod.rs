use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, FileFormat};
use serde::Deserialize;

use crate::constants::{CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, CONFIG_FILE, DEFAULT_MAX_INSTANCES};
use crate::error::{CoreError, CoreResult};


#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub expansion: ExpansionConfig,
    pub timezone: TimezoneConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionConfig {
    /// Fast-forward the start of rules queried with a lower bound.
    pub optimize_bounded_queries: bool,
    /// Cap applied when a recurrence set is materialized.
    pub max_instances: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimezoneConfig {
    /// Move wall-clock times inside a DST gap to the end of the gap
    /// without logging a warning.
    pub lenient_gaps: bool,
}

impl Settings {
    /// ## Summary
    /// Returns a configuration builder pre-populated with every default.
    ///
    /// ## Errors
    /// Returns an error if a default value cannot be registered.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>> {
        let max_instances = i64::try_from(DEFAULT_MAX_INSTANCES)?;
        Ok(Config::builder()
            .set_default("expansion.optimize_bounded_queries", true)?
            .set_default("expansion.max_instances", max_instances)?
            .set_default("timezone.lenient_gaps", true)?)
    }

    /// ## Summary
    /// Loads configuration from `.env` values, environment variables and an
    /// optional `cadence.toml`. Environment variables take precedence.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Self::builder()?
            // TOML file
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            // Env vars, e.g. CADENCE__EXPANSION__MAX_INSTANCES
            .add_source(
                config::Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator(CONFIG_ENV_SEPARATOR)
                    .separator(CONFIG_ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Builds settings from an inline TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document is malformed or fails validation.
    pub fn from_toml_str(document: &str) -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::File::from_str(document, FileFormat::Toml))
            .build()?
            .try_deserialize::<Self>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks values the type system cannot express.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` if `max_instances` is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.expansion.max_instances == 0 {
            return Err(CoreError::ValidationError(
                "expansion.max_instances must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            expansion: ExpansionConfig {
                optimize_bounded_queries: true,
                max_instances: DEFAULT_MAX_INSTANCES,
            },
            timezone: TimezoneConfig { lenient_gaps: true },
        }
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(?settings, "Configuration loaded");
    Ok(settings)
}
