//! Settings errors.

use thiserror::Error;

/// Failure to read, parse or write a configuration file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed TOML config: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("cannot encode config as TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// A configuration that parsed but cannot be used
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Only `.json` and `.toml` files are understood
    #[error("config files must end in .json or .toml, got '{0}'")]
    UnknownExtension(String),

    #[error("{key} = {value} is out of range")]
    OutOfRange { key: String, value: String },

    /// `dirs` found no per-user config directory
    #[error("no config directory on {0}")]
    NoConfigDir(String),
}

impl ConfigError {
    pub(crate) fn out_of_range(key: &str, value: impl ToString) -> Self {
        ConfigError::OutOfRange {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;
