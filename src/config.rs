//! Config loading and persistence.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::ResourceSpec;
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend API, without a trailing slash.
    pub base_url: String,
    /// Collection path segment under the base URL (e.g. "todos").
    pub resource: String,
    /// Name of the boolean completion field on entities of this resource.
    pub done_field: String,
    pub request_timeout_ms: u64,
    /// Bearer credential. Absent means requests go out unauthenticated and
    /// the server is expected to reject them.
    pub auth_token: Option<String>,
}

impl Config {
    /// Validate the resource/done-field pair once and hand the same value to
    /// both the engine and the transport.
    pub fn resource_spec(&self) -> Result<ResourceSpec> {
        Ok(ResourceSpec::parse(&self.resource, &self.done_field)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            resource: "todos".to_string(),
            done_field: "isDone".to_string(),
            request_timeout_ms: 10_000,
            auth_token: None,
        }
    }
}

pub fn load(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .map_err(|e| config_error(format!("failed to read {}: {e}", path.display())))?;
    toml::from_str(&contents)
        .map_err(|e| config_error(format!("failed to parse {}: {e}", path.display())))
}

pub fn load_or_init(path: &Path) -> Config {
    if path.exists() {
        match load(path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                tracing::warn!("config load failed, using defaults: {e}");
                return Config::default();
            }
        }
    }

    let cfg = Config::default();
    if let Err(e) = write_config(path, &cfg) {
        tracing::warn!("failed to write default config: {e}");
    }
    cfg
}

pub fn write_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .map_err(|e| config_error(format!("failed to create {}: {e}", dir.display())))?;
    }
    let contents = toml::to_string_pretty(cfg)
        .map_err(|e| config_error(format!("failed to render config: {e}")))?;
    atomic_write(path, contents.as_bytes())
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| config_error("config path missing parent directory".to_string()))?;
    let temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        config_error(format!(
            "failed to create temp file in {}: {e}",
            dir.display()
        ))
    })?;
    fs::write(temp.path(), data)
        .map_err(|e| config_error(format!("failed to write config temp file: {e}")))?;
    temp.persist(path).map_err(|e| {
        config_error(format!(
            "failed to persist config to {}: {e}",
            path.display()
        ))
    })?;
    Ok(())
}

fn config_error(reason: String) -> Error {
    Error::Config(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let cfg = Config {
            base_url: "https://api.example.test/v1".to_string(),
            resource: "favourites".to_string(),
            done_field: "isFavourite".to_string(),
            request_timeout_ms: 2_500,
            auth_token: Some("tkn-abc".to_string()),
        };
        write_config(&path, &cfg).expect("write config");
        let loaded = load(&path).expect("load config");
        assert_eq!(loaded.base_url, "https://api.example.test/v1");
        assert_eq!(loaded.resource, "favourites");
        assert_eq!(loaded.done_field, "isFavourite");
        assert_eq!(loaded.request_timeout_ms, 2_500);
        assert_eq!(loaded.auth_token.as_deref(), Some("tkn-abc"));
    }

    #[test]
    fn resource_spec_pairs_resource_and_done_field() {
        let cfg = Config {
            resource: "posts".to_string(),
            done_field: "published".to_string(),
            ..Config::default()
        };
        let spec = cfg.resource_spec().expect("spec");
        assert_eq!(spec.name().as_str(), "posts");
        assert_eq!(spec.done_field(), "published");

        let bad = Config {
            resource: "Po sts".to_string(),
            ..Config::default()
        };
        assert!(bad.resource_spec().is_err());
    }

    #[test]
    fn load_or_init_writes_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        let cfg = load_or_init(&path);
        assert_eq!(cfg.resource, "todos");
        assert!(path.exists());
        // Second call reads the file it just wrote.
        let again = load_or_init(&path);
        assert_eq!(again.done_field, cfg.done_field);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "resource = \"posts\"\n").expect("write");
        let cfg = load(&path).expect("load");
        assert_eq!(cfg.resource, "posts");
        assert_eq!(cfg.done_field, "isDone");
    }
}
