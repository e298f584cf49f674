//! Configuration for the `aisle` binary.
//!
//! [`AisleConfig`] loads from a TOML file, `AISLE_*` environment variables,
//! and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `AISLE_CONFIG` environment variable
//! 3. XDG default: `~/.config/aisle/config.toml`
//! 4. Built-in defaults

use std::path::PathBuf;

use aisle_core::{Error, Result};
use aisle_dialogue::DialogueConfig;
use aisle_vector::{EmbeddingConfig, RetrievalConfig};
use confyg::{Confygery, env};
use serde::{Deserialize, Serialize};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "AISLE_CONFIG";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration for the `aisle` binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AisleConfig {
    /// Where the catalog comes from.
    pub catalog: CatalogConfig,

    /// Search defaults.
    pub retrieval: RetrievalConfig,

    /// Embedding provider selection.
    pub embedding: EmbeddingConfig,

    /// Per-intent dialogue settings.
    pub dialogue: DialogueConfig,
}

/// Catalog location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON catalog file; the bundled sample catalog when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

// ============================================================================
// Config loading
// ============================================================================

impl AisleConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// A config path that does not exist is skipped, not an error.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path)
            && path.exists()
        {
            log::debug!("Loading config from {}", path.display());
            builder
                .add_file(&path.to_string_lossy())
                .map_err(|e| Error::config(format!("config file: {e}")))?;
        }

        // Env values arrive as strings, so overlays only work for string fields
        // such as AISLE_CATALOG_PATH or AISLE_EMBEDDING_PROVIDER.
        let mut env_opts = env::Options::with_top_level("AISLE");
        env_opts.add_section("catalog");
        env_opts.add_section("retrieval");
        env_opts.add_section("embedding");
        env_opts.add_section("dialogue");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("aisle").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten this config into environment variable pairs with `AISLE_` prefix.
    pub fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_toml_value(&value, "AISLE", &mut vars);
        Ok(vars)
    }
}

/// Recursively flatten a TOML value into `KEY=value` pairs.
fn flatten_toml_value(value: &toml::Value, prefix: &str, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, val) in table {
                let env_key = format!("{}_{}", prefix, key.to_uppercase());
                flatten_toml_value(val, &env_key, out);
            }
        }
        toml::Value::Array(arr) => {
            if let Ok(json) = serde_json::to_string(arr) {
                out.push((prefix.to_string(), json));
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Integer(i) => out.push((prefix.to_string(), i.to_string())),
        toml::Value::Float(f) => out.push((prefix.to_string(), f.to_string())),
        toml::Value::Boolean(b) => out.push((prefix.to_string(), b.to_string())),
        toml::Value::Datetime(dt) => out.push((prefix.to_string(), dt.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_default() {
        let config = AisleConfig::default();
        assert!(config.catalog.path.is_none());
        assert_eq!(config.retrieval.default_top_k, 8);
        assert_eq!(config.embedding.provider, "hashing");
        assert_eq!(config.embedding.dimension, 384);
        assert_eq!(config.dialogue.search_top_k, 6);
    }

    #[test]
    fn test_from_toml() {
        let config: AisleConfig = toml::from_str(
            r#"
                [catalog]
                path = "/data/catalog.json"

                [retrieval]
                default_top_k = 12
                min_score = 0.25

                [embedding]
                provider = "fastembed"
                model = "bge-small-en-v1.5"

                [dialogue]
                question_top_k = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.path.as_deref(), Some("/data/catalog.json"));
        assert_eq!(config.retrieval.default_top_k, 12);
        assert!((config.retrieval.min_score - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.embedding.provider, "fastembed");
        assert_eq!(config.embedding.dimension, 384);
        assert_eq!(config.dialogue.question_top_k, 1);
        assert_eq!(config.dialogue.search_top_k, 6);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AisleConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("[retrieval]"));
        assert!(toml_str.contains("provider = \"hashing\""));
        let parsed: AisleConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
                [catalog]
                path = "items.json"
                [dialogue]
                search_top_k = 9
            "#,
        );
        let config = AisleConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.catalog.path.as_deref(), Some("items.json"));
        assert_eq!(config.dialogue.search_top_k, 9);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = AisleConfig::load(Some("/nonexistent/aisle.toml")).unwrap();
        assert_eq!(config.retrieval, RetrievalConfig::default());
        assert_eq!(config.dialogue, DialogueConfig::default());
    }

    #[test]
    fn test_resolve_config_path_explicit() {
        let path = AisleConfig::resolve_config_path(Some("/explicit/config.toml"));
        assert_eq!(path, Some(PathBuf::from("/explicit/config.toml")));
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = AisleConfig::default_config_path() {
            assert!(path.ends_with("aisle/config.toml"));
        }
    }

    #[test]
    fn test_to_env_vars() {
        let mut config = AisleConfig::default();
        config.catalog.path = Some("/srv/catalog.json".into());
        let vars: HashMap<_, _> = config.to_env_vars().unwrap().into_iter().collect();
        assert_eq!(vars["AISLE_CATALOG_PATH"], "/srv/catalog.json");
        assert_eq!(vars["AISLE_RETRIEVAL_DEFAULT_TOP_K"], "8");
        assert_eq!(vars["AISLE_EMBEDDING_PROVIDER"], "hashing");
        assert_eq!(vars["AISLE_DIALOGUE_SEARCH_TOP_K"], "6");
    }

    #[test]
    fn test_flatten_array_as_json() {
        let value: toml::Value = toml::from_str("tags = [\"a\", \"b\"]").unwrap();
        let mut out = Vec::new();
        flatten_toml_value(&value, "X", &mut out);
        assert_eq!(out, vec![("X_TAGS".to_string(), "[\"a\",\"b\"]".to_string())]);
    }
}
