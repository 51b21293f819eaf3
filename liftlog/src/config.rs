//! TOML configuration.
//!
//! ```toml
//! [session]
//! debounce_ms = 200
//! persist_retries = 1
//!
//! [remote]
//! max_attempts = 3
//! base_delay_ms = 500
//! max_delay_ms = 4000
//!
//! [store]
//! path = "liftlog.db"
//!
//! [[templates]]
//! key = "push"
//! name = "Push Day"
//! exercises = ["Bench Press", "Overhead Press"]
//! ```
//!
//! Every section is optional. Without `[[templates]]` the built-in
//! upper/lower catalog is used; without `[store] path` records live in
//! memory only.

use liftlog_session::SessionConfig;
use liftlog_sync::RetryPolicy;
use liftlog_types::{Template, TemplateCatalog};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LiftlogConfig {
    pub session: SessionSection,
    pub remote: RemoteSection,
    pub store: StoreSection,
    pub templates: Vec<TemplateEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Clamped to 300 ms when applied.
    pub debounce_ms: u64,
    pub persist_retries: u32,
}

impl Default for SessionSection {
    fn default() -> Self {
        let defaults = SessionConfig::default();
        Self {
            debounce_ms: defaults.debounce.as_millis() as u64,
            persist_retries: defaults.persist_retries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RemoteSection {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RemoteSection {
    fn default() -> Self {
        let defaults = RetryPolicy::default();
        Self {
            max_attempts: defaults.max_attempts,
            base_delay_ms: defaults.base_delay.as_millis() as u64,
            max_delay_ms: defaults.max_delay.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// SQLite database file. Absent means an in-memory store.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TemplateEntry {
    pub key: String,
    pub name: String,
    pub exercises: Vec<String>,
}

impl LiftlogConfig {
    /// Parses and validates a config document.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config at `path`. A missing file yields the defaults; an
    /// unreadable or invalid one is an error.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Like [`load_from`](Self::load_from), but falls back to the defaults
    /// when the file cannot be used.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config {:?}: {}. Falling back to defaults.", path, e);
                Self::default()
            }
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.remote.max_attempts == 0 {
            return Err(ConfigError::Invalid("remote.max_attempts must be at least 1".into()));
        }
        if self.remote.max_delay_ms < self.remote.base_delay_ms {
            return Err(ConfigError::Invalid(
                "remote.max_delay_ms must not be below remote.base_delay_ms".into(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &self.templates {
            if entry.key.trim().is_empty() {
                return Err(ConfigError::Invalid("template key must not be empty".into()));
            }
            if entry.exercises.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "template {:?} has no exercises",
                    entry.key
                )));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "template {:?} is defined twice",
                    entry.key
                )));
            }
        }
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            persist_retries: self.session.persist_retries,
            ..SessionConfig::default()
        }
        .with_debounce(Duration::from_millis(self.session.debounce_ms))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.remote.max_attempts,
            base_delay: Duration::from_millis(self.remote.base_delay_ms),
            max_delay: Duration::from_millis(self.remote.max_delay_ms),
        }
    }

    /// The configured templates, or the built-in catalog if none are set.
    pub fn catalog(&self) -> TemplateCatalog {
        if self.templates.is_empty() {
            return TemplateCatalog::builtin();
        }
        TemplateCatalog::new(
            self.templates
                .iter()
                .map(|t| Template::new(t.key.trim(), t.name.clone(), t.exercises.iter().cloned())),
        )
    }
}
