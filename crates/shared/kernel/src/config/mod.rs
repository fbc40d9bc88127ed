use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prefix of the environment overrides (`CALLKIT__SERVER__PORT=8080`).
pub const ENV_PREFIX: &str = "CALLKIT";
/// Config file looked up when no path is given; any extension `config` understands.
pub const DEFAULT_CONFIG_FILE: &str = "callkit";

#[callkit_derive::callkit_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads configuration from an optional file overlaid with `CALLKIT__` environment variables.
///
/// 1. **Base file**: `path` or `callkit` in the working directory (`.toml`, `.json`, `.yaml`...).
///    A missing file is not an error; every section falls back to its defaults.
/// 2. **Environment overrides**: nested keys are separated by a double underscore
///    (`CALLKIT__TELEPHONY__WEBHOOK_URL` maps to `telephony.webhook_url`).
///
/// # Errors
/// Returns an error when the file exists but cannot be parsed, or when the merged
/// values do not match the structure of `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    info!(path = %effective_path.display(), "Loading config");

    Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .convert_case(config::Case::Snake),
        )
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}
