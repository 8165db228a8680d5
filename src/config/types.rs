//! Configuration types for the distribution engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Server binding settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// The interface to bind to.
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

/// Metadata about the engine deployment, from `engine.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineMetadata {
    /// The human-readable name of the service.
    pub name: String,
    /// The engine version reported in every response.
    pub version: String,
    /// The school of jurisprudence the rule tables follow.
    pub school: String,
    /// The currency used when a request names none.
    pub default_currency: String,
    /// Server binding settings.
    pub server: ServerConfig,
}

/// A currency an estate may be denominated in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// The English name of the currency.
    pub name_en: String,
    /// The Arabic name of the currency.
    pub name_ar: String,
    /// Digits after the decimal point; amounts are rounded to this precision.
    pub minor_units: u32,
}

/// Currencies configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrenciesConfig {
    /// Map of ISO 4217 code to currency details.
    pub currencies: HashMap<String, Currency>,
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    metadata: EngineMetadata,
    currencies: HashMap<String, Currency>,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    ///
    /// Currency codes are normalised to upper case.
    pub fn new(metadata: EngineMetadata, currencies: HashMap<String, Currency>) -> Self {
        let currencies = currencies
            .into_iter()
            .map(|(code, currency)| (code.to_uppercase(), currency))
            .collect();
        Self {
            metadata,
            currencies,
        }
    }

    /// Returns the engine metadata.
    pub fn metadata(&self) -> &EngineMetadata {
        &self.metadata
    }

    /// Returns all configured currencies.
    pub fn currencies(&self) -> &HashMap<String, Currency> {
        &self.currencies
    }
}
