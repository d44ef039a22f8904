//! TOML configuration file loading.
//!
//! ```toml
//! [tax_rates]
//! federal = 0.22
//! state = 0.093
//!
//! [broker_fees]
//! minimum_fee = 9.99
//! ```
//!
//! Missing tables or keys keep their [`StcConfig::default`] values.

use std::fs;
use std::path::Path;

use stc_core::{StcConfig, StcError};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("config file {path} is invalid: {source}")]
    Invalid {
        path: String,
        #[source]
        source: StcError,
    },
}

/// Parses configuration text. Keys not present fall back to defaults.
pub fn parse(text: &str) -> Result<StcConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Loads the configuration at `path`, or the defaults when `path` is `None`.
///
/// # Errors
///
/// Returns a [`SettingsError`] if the file cannot be read, is not valid
/// TOML, or contains a negative rate or fee.
pub fn load(path: Option<&Path>) -> Result<StcConfig, SettingsError> {
    let Some(path) = path else {
        debug!("no config file given, using defaults");
        return Ok(StcConfig::default());
    };
    let shown = path.display().to_string();

    let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: shown.clone(),
        source,
    })?;
    let config = parse(&text).map_err(|source| SettingsError::Parse {
        path: shown.clone(),
        source,
    })?;
    config.validate().map_err(|source| SettingsError::Invalid {
        path: shown.clone(),
        source,
    })?;

    info!(path = %shown, "loaded config");
    Ok(config)
}
