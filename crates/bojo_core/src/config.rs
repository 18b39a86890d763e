//! Environment-driven settings.
//!
//! # Responsibility
//! - Resolve the storage root, presentation flags and list defaults.
//!
//! # Invariants
//! - Lookup is injectable so tests never depend on the process environment.
//! - Invalid values are rejected, not silently replaced by defaults.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ROOT_ENV: &str = "BOJO_ROOT";
pub const VERBOSE_ENV: &str = "BOJO_VERBOSE";
pub const NUM_ITEMS_ENV: &str = "BOJO_NUM_ITEMS";
pub const LOG_LEVEL_ENV: &str = "BOJO_LOG";

/// Default number of rows shown by list views.
pub const DEFAULT_NUM_ITEMS: usize = 10;

const DEFAULT_ROOT_DIR_NAME: &str = ".bojo";
const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No override given and no home directory could be determined.
    NoHomeDir,
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHomeDir => write!(
                f,
                "cannot determine home directory; set {ROOT_ENV} to choose a storage root"
            ),
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid {key} value `{value}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the journal database and logs.
    pub root: PathBuf,
    /// Presentation only: show marker names next to glyphs.
    pub verbose: bool,
    /// Default count for list views.
    pub num_items: usize,
    pub log_level: &'static str,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), dirs::home_dir())
    }

    /// Reads settings through `lookup`, falling back to `home/.bojo`.
    pub fn from_lookup<F>(lookup: F, home: Option<PathBuf>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let root = match lookup(ROOT_ENV).filter(|value| !value.trim().is_empty()) {
            Some(value) => PathBuf::from(value.trim()),
            None => home
                .map(|home| home.join(DEFAULT_ROOT_DIR_NAME))
                .ok_or(ConfigError::NoHomeDir)?,
        };

        let num_items = match lookup(NUM_ITEMS_ENV) {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|err| ConfigError::InvalidValue {
                    key: NUM_ITEMS_ENV,
                    value: value.clone(),
                    reason: err.to_string(),
                })?,
            None => DEFAULT_NUM_ITEMS,
        };

        let log_level = match lookup(LOG_LEVEL_ENV) {
            Some(value) => {
                normalize_level(&value).map_err(|reason| ConfigError::InvalidValue {
                    key: LOG_LEVEL_ENV,
                    value: value.clone(),
                    reason,
                })?
            }
            None => default_log_level(),
        };

        Ok(Self {
            root,
            verbose: lookup(VERBOSE_ENV).is_some(),
            num_items,
            log_level,
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join(LOG_DIR_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, Settings, DEFAULT_NUM_ITEMS, NUM_ITEMS_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_home_dot_bojo() {
        let settings = Settings::from_lookup(lookup_from(&[]), Some(PathBuf::from("/home/u")))
            .expect("defaults should resolve");
        assert_eq!(settings.root, PathBuf::from("/home/u/.bojo"));
        assert_eq!(settings.num_items, DEFAULT_NUM_ITEMS);
        assert!(!settings.verbose);
        assert_eq!(settings.log_dir(), PathBuf::from("/home/u/.bojo/logs"));
    }

    #[test]
    fn env_overrides_are_applied() {
        let settings = Settings::from_lookup(
            lookup_from(&[
                ("BOJO_ROOT", "/tmp/journal"),
                ("BOJO_VERBOSE", ""),
                ("BOJO_NUM_ITEMS", "3"),
                ("BOJO_LOG", "WARNING"),
            ]),
            None,
        )
        .expect("overrides should resolve");
        assert_eq!(settings.root, PathBuf::from("/tmp/journal"));
        assert!(settings.verbose);
        assert_eq!(settings.num_items, 3);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn invalid_count_is_rejected() {
        let err = Settings::from_lookup(
            lookup_from(&[("BOJO_NUM_ITEMS", "-2")]),
            Some(PathBuf::from("/home/u")),
        )
        .expect_err("negative counts are invalid");
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == NUM_ITEMS_ENV));
    }

    #[test]
    fn missing_home_without_override_fails() {
        let err = Settings::from_lookup(lookup_from(&[]), None).expect_err("no root available");
        assert_eq!(err, ConfigError::NoHomeDir);
    }
}
