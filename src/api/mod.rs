//! HTTP API module for the distribution engine.
//!
//! This module provides the REST endpoints for computing a distribution and
//! for browsing the heir catalogue and the fixed-share table.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CalculationRequest, HeirRequest, LanguageQuery};
pub use response::{ApiError, CalculationResponse, CurrencyInfo, HeirInfo, RuleRow};
pub use state::AppState;
