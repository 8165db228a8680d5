//! Faraid distribution engine
//!
//! This crate computes the distribution of a deceased person's estate among
//! Islamic legal heirs. It applies exclusion (Hajb), fixed shares (Ashab
//! al-Furud), residuary shares (Asaba) and proportional adjustment ('Awl and
//! Radd) using exact rational arithmetic, then converts each share into a
//! monetary amount.
//!
//! # Example
//!
//! ```
//! use faraid_engine::calculation::compute;
//! use faraid_engine::models::{DistributionRequest, HeirType};
//! use rust_decimal::Decimal;
//!
//! let request = DistributionRequest::new(Decimal::new(1000, 0))
//!     .with_heir(HeirType::Son, 1)
//!     .with_heir(HeirType::FullBrother, 1);
//! let result = compute(&request).unwrap();
//!
//! assert_eq!(result.share_for(HeirType::Son).unwrap().share_amount, Decimal::new(100000, 2));
//! assert!(result.share_for(HeirType::FullBrother).unwrap().share_amount.is_zero());
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
