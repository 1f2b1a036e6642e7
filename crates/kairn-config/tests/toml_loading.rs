//! Integration tests for layered configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and environment variables.

use std::path::PathBuf;

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use kairn_config::{ConfigError, KairnConfig};
use pretty_assertions::assert_eq;

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[storage]
data_dir = "/var/lib/kairn"

[audit]
strict_hash = true
tail_limit = 10

[general]
actor_id = "ci-bot"
"#,
        )?;

        let config: KairnConfig = Figment::from(Serialized::defaults(KairnConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.storage.data_dir, PathBuf::from("/var/lib/kairn"));
        assert!(config.audit.strict_hash);
        assert_eq!(config.audit.tail_limit, 10);
        assert_eq!(config.general.actor_id, "ci-bot");
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[audit]\nstrict_hash = true\n")?;

        let config: KairnConfig = Figment::from(Serialized::defaults(KairnConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(config.audit.strict_hash);
        assert_eq!(config.audit.tail_limit, 50);
        assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".kairn")?;
        jail.create_file(".kairn/config.toml", "[storage]\ndata_dir = \"kb\"\n")?;

        let config = KairnConfig::load().expect("config loads");
        assert_eq!(config.storage.data_dir, PathBuf::from("kb"));
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".kairn")?;
        jail.create_file(".kairn/config.toml", "[audit]\ntail_limit = 5\n")?;
        jail.set_env("KAIRN_AUDIT__TAIL_LIMIT", "7");
        jail.set_env("KAIRN_GENERAL__ACTOR_ID", "alice");

        let config = KairnConfig::load().expect("config loads");
        assert_eq!(config.audit.tail_limit, 7);
        assert_eq!(config.general.actor_id, "alice");
        Ok(())
    });
}

#[test]
fn invalid_values_are_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("KAIRN_AUDIT__TAIL_LIMIT", "0");
        let err = KairnConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        jail.set_env("KAIRN_AUDIT__TAIL_LIMIT", "lots");
        let err = KairnConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}

#[test]
fn dotenv_file_feeds_environment() {
    Jail::expect_with(|jail| {
        jail.create_file(".env", "KAIRN_STORAGE__DATA_DIR=from-dotenv\n")?;
        let config = KairnConfig::load_with_dotenv().expect("config loads");
        assert_eq!(config.storage.data_dir, PathBuf::from("from-dotenv"));
        Ok(())
    });
}
