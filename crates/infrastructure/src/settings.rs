//! Runner settings loading.
//!
//! Settings come from an optional file (format picked from its extension) overlaid by
//! `DOCSPEC_*` environment variables, e.g. `DOCSPEC_BASE_URL` or `DOCSPEC_TIMEOUT_MS`.

use std::path::Path;

use config::{Config, Environment, File};
use docspec_domain::RunnerSettings;
use thiserror::Error;

/// Prefix of the environment variables read by [`load_settings`].
pub const ENV_PREFIX: &str = "DOCSPEC";

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or its values could not be deserialized.
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    /// The settings file does not exist.
    #[error("settings file not found: {0}")]
    NotFound(String),
}

/// Loads settings from `path`, if given, and the process environment.
///
/// Unset values keep their defaults.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed, or a value has the wrong type.
pub fn load_settings(path: Option<&Path>) -> Result<RunnerSettings, SettingsError> {
    load_settings_with(path, Environment::with_prefix(ENV_PREFIX))
}

/// Loads settings from `path`, if given, overlaid by the given environment source.
///
/// # Errors
///
/// See [`load_settings`].
pub fn load_settings_with(
    path: Option<&Path>,
    environment: Environment,
) -> Result<RunnerSettings, SettingsError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        if !path.exists() {
            return Err(SettingsError::NotFound(path.display().to_string()));
        }
        builder = builder.add_source(File::from(path));
    }

    let settings = builder
        .add_source(environment.try_parsing(true))
        .build()?
        .try_deserialize()?;
    Ok(settings)
}
