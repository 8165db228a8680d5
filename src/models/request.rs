//! The distribution request consumed by the engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{HeirInput, HeirType, Language};

/// An estate value and the surviving heirs of the deceased.
///
/// # Example
///
/// ```
/// use faraid_engine::models::{DistributionRequest, HeirType};
/// use rust_decimal::Decimal;
///
/// let request = DistributionRequest::new(Decimal::new(1000, 0))
///     .with_heir(HeirType::Wife, 1)
///     .with_heir(HeirType::Daughter, 1);
/// assert_eq!(request.heirs.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRequest {
    /// The net estate value, in the caller's currency.
    pub estate_value: Decimal,
    /// The surviving heirs, one entry per type.
    pub heirs: Vec<HeirInput>,
    /// Language for labels and descriptions.
    #[serde(default)]
    pub language: Language,
}

impl DistributionRequest {
    /// Creates a request with no heirs.
    pub fn new(estate_value: Decimal) -> Self {
        Self {
            estate_value,
            heirs: Vec::new(),
            language: Language::default(),
        }
    }

    /// Adds an heir entry.
    pub fn with_heir(mut self, heir_type: HeirType, count: u32) -> Self {
        self.heirs.push(HeirInput::new(heir_type, count));
        self
    }

    /// Sets the display language.
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
}
