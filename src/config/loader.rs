//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{CurrenciesConfig, Currency, EngineConfig, EngineMetadata, ServerConfig};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/faraid/
/// ├── engine.yaml      # Engine metadata and server settings
/// └── currencies.yaml  # Supported currencies and their precision
/// ```
///
/// # Example
///
/// ```no_run
/// use faraid_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/faraid").unwrap();
/// let currency = loader.get_currency("usd").unwrap();
/// println!("Rounding to {} places", currency.minor_units);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The default currency is not among the configured currencies
    ///
    /// # Example
    ///
    /// ```no_run
    /// use faraid_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/faraid")?;
    /// # Ok::<(), faraid_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let engine_path = path.join("engine.yaml");
        let metadata = Self::load_yaml::<EngineMetadata>(&engine_path)?;

        let currencies_path = path.join("currencies.yaml");
        let currencies = Self::load_yaml::<CurrenciesConfig>(&currencies_path)?;

        let config = EngineConfig::new(metadata, currencies.currencies);

        let default_code = config.metadata().default_currency.to_uppercase();
        if !config.currencies().contains_key(&default_code) {
            return Err(EngineError::ConfigParseError {
                path: engine_path.display().to_string(),
                message: format!(
                    "default currency '{}' is not defined in currencies.yaml",
                    default_code
                ),
            });
        }

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the engine metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        self.config.metadata()
    }

    /// Returns the server binding settings.
    pub fn server(&self) -> &ServerConfig {
        &self.config.metadata().server
    }

    /// Gets a currency by its code, ignoring case.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use faraid_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/faraid")?;
    /// let currency = loader.get_currency("EGP")?;
    /// println!("Currency: {}", currency.name_en);
    /// # Ok::<(), faraid_engine::error::EngineError>(())
    /// ```
    pub fn get_currency(&self, code: &str) -> EngineResult<&Currency> {
        self.config
            .currencies()
            .get(&code.to_uppercase())
            .ok_or_else(|| EngineError::CurrencyNotFound {
                code: code.to_string(),
            })
    }

    /// Returns the default currency code and its details.
    pub fn default_currency(&self) -> EngineResult<(String, &Currency)> {
        let code = self.config.metadata().default_currency.to_uppercase();
        let currency = self.get_currency(&code)?;
        Ok((code, currency))
    }
}
