//! Configuration loading and management for the distribution engine.
//!
//! This module loads engine metadata, server settings and the supported
//! currencies from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use faraid_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/faraid").unwrap();
//! println!("Loaded engine: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{CurrenciesConfig, Currency, EngineConfig, EngineMetadata, ServerConfig};
