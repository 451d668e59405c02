// src/config.rs
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::import::ImportPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, trace};

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
pub const DEFAULT_IMPORT_BODY_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerOpts {
    /// Address the HTTP server listens on (default: "127.0.0.1:3000")
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Largest accepted `POST /api/bookmarks/import` body in bytes (default: 16 MiB)
    #[serde(default = "default_import_body_limit")]
    pub import_body_limit: usize,
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_import_body_limit() -> usize {
    DEFAULT_IMPORT_BODY_LIMIT
}

impl Default for ServerOpts {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            import_body_limit: default_import_body_limit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImportOpts {
    /// How validated batches are written (default: atomic)
    #[serde(default)]
    pub policy: ImportPolicy,

    /// Upper bound on concurrent creates under the independent policy (default: 8)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

fn default_max_concurrency() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

impl Default for ImportOpts {
    fn default() -> Self {
        Self {
            policy: ImportPolicy::default(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_url: String,

    #[serde(default)]
    pub server: ServerOpts,

    #[serde(default)]
    pub import: ImportOpts,
}

fn default_db_path() -> String {
    config_dir()
        .join("linkbox.db")
        .to_string_lossy()
        .into_owned()
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config/linkbox")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_url: default_db_path(),
            server: ServerOpts::default(),
            import: ImportOpts::default(),
        }
    }
}

fn read_config_file(path: &Path) -> DomainResult<Settings> {
    let text = std::fs::read_to_string(path)?;
    toml::from_str::<Settings>(&text).map_err(|e| {
        DomainError::Other(format!("Invalid config file {}: {}", path.display(), e))
    })
}

fn parse_max_concurrency(value: &str) -> DomainResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(DomainError::Other(format!(
            "LINKBOX_IMPORT_MAX_CONCURRENCY must be a positive integer, got '{}'",
            value
        ))),
    }
}

/// Load settings: defaults, then the config file, then `LINKBOX_*` variables.
///
/// An explicit `config_file` must exist; the default location is optional.
#[instrument(level = "debug")]
pub fn load_settings(config_file: Option<&Path>) -> DomainResult<Settings> {
    trace!("Loading settings");

    let mut settings = match config_file {
        Some(path) => {
            if !path.exists() {
                return Err(DomainError::Other(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            debug!("Loading config from: {:?}", path);
            read_config_file(path)?
        }
        None => {
            let default_path = config_dir().join("config.toml");
            if default_path.exists() {
                debug!("Loading config from: {:?}", default_path);
                read_config_file(&default_path)?
            } else {
                Settings::default()
            }
        }
    };

    if let Ok(db_url) = std::env::var("LINKBOX_DB_URL") {
        trace!("Using LINKBOX_DB_URL from environment: {}", db_url);
        settings.db_url = db_url;
    }

    if let Ok(bind) = std::env::var("LINKBOX_BIND") {
        trace!("Using LINKBOX_BIND from environment: {}", bind);
        settings.server.bind = bind;
    }

    if let Ok(policy) = std::env::var("LINKBOX_IMPORT_POLICY") {
        trace!("Using LINKBOX_IMPORT_POLICY from environment: {}", policy);
        settings.import.policy = policy.parse()?;
    }

    if let Ok(limit) = std::env::var("LINKBOX_IMPORT_MAX_CONCURRENCY") {
        settings.import.max_concurrency = parse_max_concurrency(&limit)?;
    }

    trace!("Settings loaded: {:?}", settings);
    Ok(settings)
}

pub fn generate_default_config() -> String {
    let default_settings = Settings::default();
    toml::to_string_pretty(&default_settings)
        .unwrap_or_else(|_| "# Error generating default configuration".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::EnvGuard;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    fn create_temp_config_file(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).unwrap();
        (temp_dir, config_path)
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        let _guard = EnvGuard::cleared();

        let settings = Settings::default();

        assert!(settings.db_url.ends_with("linkbox.db"));
        assert_eq!(settings.server.bind, "127.0.0.1:3000");
        assert_eq!(settings.import.policy, ImportPolicy::Atomic);
        assert_eq!(settings.import.max_concurrency, 8);
    }

    #[test]
    #[serial]
    fn test_config_file_loading() {
        let _guard = EnvGuard::cleared();
        let (_dir, path) = create_temp_config_file(
            r#"
            db_url = "/config/file/path.db"

            [server]
            bind = "0.0.0.0:8080"
            import_body_limit = 1024

            [import]
            policy = "independent"
            max_concurrency = 3
            "#,
        );

        let settings = load_settings(Some(&path)).unwrap();

        assert_eq!(settings.db_url, "/config/file/path.db");
        assert_eq!(settings.server.bind, "0.0.0.0:8080");
        assert_eq!(settings.server.import_body_limit, 1024);
        assert_eq!(settings.import.policy, ImportPolicy::Independent);
        assert_eq!(settings.import.max_concurrency, 3);
    }

    #[test]
    #[serial]
    fn test_partial_config_file_keeps_defaults() {
        let _guard = EnvGuard::cleared();
        let (_dir, path) = create_temp_config_file("[import]\npolicy = \"independent\"\n");

        let settings = load_settings(Some(&path)).unwrap();

        assert_eq!(settings.import.policy, ImportPolicy::Independent);
        assert_eq!(settings.import.max_concurrency, DEFAULT_MAX_CONCURRENCY);
        assert_eq!(settings.server.bind, DEFAULT_BIND);
        assert_eq!(settings.server.import_body_limit, DEFAULT_IMPORT_BODY_LIMIT);
        assert!(settings.db_url.ends_with("linkbox.db"));
    }

    #[test]
    #[serial]
    fn test_environment_overrides_config_file() {
        let _guard = EnvGuard::cleared();
        let (_dir, path) = create_temp_config_file(
            r#"
            db_url = "/config/non-override.db"
            [import]
            policy = "atomic"
            "#,
        );
        env::set_var("LINKBOX_DB_URL", "/env/override.db");
        env::set_var("LINKBOX_BIND", "127.0.0.1:9999");
        env::set_var("LINKBOX_IMPORT_POLICY", "Independent");
        env::set_var("LINKBOX_IMPORT_MAX_CONCURRENCY", "2");

        let settings = load_settings(Some(&path)).unwrap();

        assert_eq!(settings.db_url, "/env/override.db");
        assert_eq!(settings.server.bind, "127.0.0.1:9999");
        assert_eq!(settings.import.policy, ImportPolicy::Independent);
        assert_eq!(settings.import.max_concurrency, 2);
    }

    #[test]
    #[serial]
    fn test_invalid_environment_values_rejected() {
        let _guard = EnvGuard::cleared();
        let (_dir, path) = create_temp_config_file("");

        env::set_var("LINKBOX_IMPORT_POLICY", "sometimes");
        assert!(load_settings(Some(&path)).is_err());
        env::remove_var("LINKBOX_IMPORT_POLICY");

        env::set_var("LINKBOX_IMPORT_MAX_CONCURRENCY", "0");
        assert!(load_settings(Some(&path)).is_err());
    }

    #[test]
    #[serial]
    fn test_missing_explicit_config_file_is_error() {
        let _guard = EnvGuard::cleared();
        let dir = tempfile::tempdir().unwrap();

        let result = load_settings(Some(&dir.path().join("absent.toml")));

        assert!(matches!(result, Err(DomainError::Other(msg)) if msg.contains("not found")));
    }

    #[test]
    fn test_malformed_config_file_is_error() {
        let (_dir, path) = create_temp_config_file("db_url = [");
        assert!(read_config_file(&path).is_err());
    }

    #[test]
    fn test_generate_default_config_round_trips() {
        let text = generate_default_config();
        assert!(text.contains("[server]"));
        assert!(text.contains("policy = \"atomic\""));
        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Settings::default());
    }
}
