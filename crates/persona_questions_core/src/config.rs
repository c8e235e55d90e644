//! Editor configuration.
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. Optional TOML file
//! 3. `PERSONA_QUESTIONS_*` environment variables

use crate::bank::LoadPolicy;
use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Bank file used when nothing else is configured.
pub const DEFAULT_BANK_PATH: &str = "questions_sample.json";

pub const ENV_BANK_PATH: &str = "PERSONA_QUESTIONS_BANK";
pub const ENV_LOG_LEVEL: &str = "PERSONA_QUESTIONS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PERSONA_QUESTIONS_LOG_DIR";
pub const ENV_STRICT_LOAD: &str = "PERSONA_QUESTIONS_STRICT_LOAD";

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    InvalidValue {
        key: &'static str,
        value: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for {key}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

/// Settings for a question editor process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Question bank document to load and save.
    pub bank_path: PathBuf,
    /// `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory. File logging is off when unset.
    pub log_dir: Option<PathBuf>,
    /// Surface load failures instead of starting with an empty bank.
    pub strict_load: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            bank_path: PathBuf::from(DEFAULT_BANK_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
            strict_load: false,
        }
    }
}

impl EditorConfig {
    /// Builds the effective config from defaults, an optional TOML file and
    /// the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Reads a TOML file; keys it omits keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overrides fields from environment-style lookups.
    ///
    /// Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = read(ENV_BANK_PATH) {
            self.bank_path = PathBuf::from(value);
        }
        if let Some(value) = read(ENV_LOG_LEVEL) {
            self.log_level = value.trim().to_string();
        }
        if let Some(value) = read(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = read(ENV_STRICT_LOAD) {
            self.strict_load = parse_flag(&value).ok_or(ConfigError::InvalidValue {
                key: ENV_STRICT_LOAD,
                value,
            })?;
        }
        Ok(())
    }

    /// Bank load policy selected by `strict_load`.
    pub fn load_policy(&self) -> LoadPolicy {
        if self.strict_load {
            LoadPolicy::Strict
        } else {
            LoadPolicy::Lenient
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EditorConfig, ENV_BANK_PATH, ENV_LOG_DIR, ENV_STRICT_LOAD};
    use crate::bank::LoadPolicy;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: EditorConfig = toml::from_str("bank_path = \"stages.json\"\n").unwrap();
        assert_eq!(config.bank_path, PathBuf::from("stages.json"));
        assert_eq!(config.log_dir, None);
        assert!(!config.strict_load);
        assert_eq!(config.load_policy(), LoadPolicy::Lenient);
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config: EditorConfig =
            toml::from_str("bank_path = \"file.json\"\nstrict_load = false\n").unwrap();
        config
            .apply_env(lookup(&[
                (ENV_BANK_PATH, "env.json"),
                (ENV_LOG_DIR, "/var/log/persona"),
                (ENV_STRICT_LOAD, "YES"),
            ]))
            .unwrap();

        assert_eq!(config.bank_path, PathBuf::from("env.json"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/persona")));
        assert_eq!(config.load_policy(), LoadPolicy::Strict);
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = EditorConfig::default();
        config.apply_env(lookup(&[(ENV_BANK_PATH, "  ")])).unwrap();
        assert_eq!(config, EditorConfig::default());
    }

    #[test]
    fn invalid_strict_flag_is_rejected() {
        let mut config = EditorConfig::default();
        let err = config
            .apply_env(lookup(&[(ENV_STRICT_LOAD, "maybe")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key, ref value } if key == ENV_STRICT_LOAD && value == "maybe"
        ));
    }
}
