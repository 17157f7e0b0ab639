// src/config/loader.rs
//! Configuration loader: defaults, then TOML files, then environment overrides

use crate::config::{constants::paths, SystemConfig};
use crate::utils::validation::ValidationError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
    #[error("Configuration parse error: {0}")]
    ParseError(String),
    #[error("Configuration validation error: {0}")]
    ValidationError(#[from] ValidationError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Layered configuration loader
///
/// Later files override earlier ones key by key. Environment variables named
/// `TESTBENCH_<SECTION>__<KEY>` override files, e.g.
/// `TESTBENCH_ACQUISITION__SEED=7`.
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: String,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader that looks for `testbench.toml` in the working directory
    pub fn new() -> Self {
        Self::with_paths(vec![PathBuf::from(paths::DEFAULT_CONFIG_FILE)])
    }

    /// Create loader with custom paths
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            env_prefix: format!("{}_", paths::CONFIG_ENV_PREFIX),
        }
    }

    /// Load from files and the process environment
    pub fn load(&self) -> Result<SystemConfig, ConfigError> {
        self.load_with_env(std::env::vars())
    }

    /// Load from files and an explicit set of environment variables
    pub fn load_with_env<I>(&self, vars: I) -> Result<SystemConfig, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut merged = toml::Value::try_from(SystemConfig::default())
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        for path in &self.config_paths {
            match Self::load_config_file(path) {
                Ok(file_config) => merge_toml_values(&mut merged, file_config),
                // Missing files are optional layers
                Err(ConfigError::FileNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        self.apply_environment_overrides(&mut merged, vars);

        let config: SystemConfig = merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;

        tracing::debug!(files = self.config_paths.len(), "configuration loaded");
        Ok(config)
    }

    /// Parse and validate a configuration document
    pub fn from_toml_str(content: &str) -> Result<SystemConfig, ConfigError> {
        let config: SystemConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write a configuration to disk as TOML
    pub fn export_config<P: AsRef<Path>>(config: &SystemConfig, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(config).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn load_config_file(path: &Path) -> Result<toml::Value, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn apply_environment_overrides<I>(&self, config: &mut toml::Value, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(stripped) = key.strip_prefix(&self.env_prefix) else {
                continue;
            };
            let config_key = stripped.to_lowercase().replace("__", ".");
            set_nested_value(config, &config_key, parse_env_value(&value));
        }
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

fn set_nested_value(config: &mut toml::Value, path: &str, value: toml::Value) {
    let parts: Vec<&str> = path.split('.').collect();
    let mut current = config;

    for (i, part) in parts.iter().enumerate() {
        let toml::Value::Table(table) = current else {
            return;
        };
        if i == parts.len() - 1 {
            table.insert(part.to_string(), value);
            return;
        }
        current = table
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::value::Table::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let loader = ConfigLoader::with_paths(vec![PathBuf::from("/nonexistent/testbench.toml")]);
        let config = loader.load_with_env(no_env()).expect("defaults");
        assert_eq!(config, SystemConfig::default());
    }

    #[test]
    fn test_file_layer_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[acquisition]\npacket_loss_rate = 0.2\nseed = 11").expect("write");

        let loader = ConfigLoader::with_paths(vec![file.path().to_path_buf()]);
        let config = loader.load_with_env(no_env()).expect("load");
        assert_eq!(config.acquisition.packet_loss_rate, 0.2);
        assert_eq!(config.acquisition.seed, Some(11));
        assert_eq!(config.acquisition.connect_delay_ms, 500);
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[acquisition]\nseed = 11").expect("write");

        let loader = ConfigLoader::with_paths(vec![file.path().to_path_buf()]);
        let env = vec![
            ("TESTBENCH_ACQUISITION__SEED".to_string(), "99".to_string()),
            ("TESTBENCH_ANALYSIS__CONTROL_SIGMA".to_string(), "2.5".to_string()),
            ("UNRELATED_VAR".to_string(), "x".to_string()),
        ];
        let config = loader.load_with_env(env).expect("load");
        assert_eq!(config.acquisition.seed, Some(99));
        assert_eq!(config.analysis.control_sigma, 2.5);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = ConfigLoader::from_toml_str("[acquisition]\npacket_loss_rate = 3.0\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = ConfigLoader::from_toml_str("[acquisition\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_export_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("exported.toml");
        let mut config = SystemConfig::default();
        config.acquisition.seed = Some(5);

        ConfigLoader::export_config(&config, &path).expect("export");
        let loaded = ConfigLoader::with_paths(vec![path])
            .load_with_env(no_env())
            .expect("load");
        assert_eq!(loaded, config);
    }
}
