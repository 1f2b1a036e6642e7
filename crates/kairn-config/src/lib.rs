//! # kairn-config
//!
//! Layered configuration loading for Kairn using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`KAIRN_*` prefix, `__` as separator)
//! 2. Project-level `.kairn/config.toml`
//! 3. User-level `~/.config/kairn/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `KAIRN_STORAGE__DATA_DIR` -> `storage.data_dir`,
//! `KAIRN_AUDIT__STRICT_HASH` -> `audit.strict_hash`, and so on.
//!
//! # Usage
//!
//! ```no_run
//! use kairn_config::KairnConfig;
//!
//! let config = KairnConfig::load_with_dotenv().expect("config");
//! println!("data dir: {}", config.storage.data_dir.display());
//! ```

mod audit;
mod error;
mod general;
mod storage;

pub use audit::AuditConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "KAIRN_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct KairnConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl KairnConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env`
    /// file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be parsed or a value is out
    /// of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the current directory.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".kairn/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// # Errors
    ///
    /// Returns `InvalidValue` for an empty data directory or a zero tail
    /// limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.data_dir".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.audit.tail_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "audit.tail_limit".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("kairn").join("config.toml"))
    }
}
