//! Request types for the distribution engine API.
//!
//! This module defines the JSON request structures for the HTTP endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DistributionRequest, HeirInput, HeirType, Language};

/// Request body for the `/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The net estate value after debts and bequests.
    pub estate_value: Decimal,
    /// The surviving heirs.
    pub heirs: Vec<HeirRequest>,
    /// The language for labels and descriptions.
    #[serde(default)]
    pub language: Language,
    /// The ISO 4217 currency code; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// One heir category in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeirRequest {
    /// The heir category.
    #[serde(rename = "type")]
    pub heir_type: HeirType,
    /// How many heirs of the category survive.
    pub count: u32,
}

impl From<HeirRequest> for HeirInput {
    fn from(req: HeirRequest) -> Self {
        HeirInput::new(req.heir_type, req.count)
    }
}

impl From<CalculationRequest> for DistributionRequest {
    fn from(req: CalculationRequest) -> Self {
        DistributionRequest {
            estate_value: req.estate_value,
            heirs: req.heirs.into_iter().map(Into::into).collect(),
            language: req.language,
        }
    }
}

/// Query parameters accepted by the reference endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LanguageQuery {
    /// The language for labels and descriptions.
    #[serde(default)]
    pub lang: Language,
}
