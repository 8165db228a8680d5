//! Input validation for distribution requests.
//!
//! Malformed requests are rejected here, before any rule runs, so the later
//! stages can assume unique heir types and in-range counts.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{DistributionRequest, HeirType};

/// The validated heir multiset: one count per submitted type, in canonical order.
pub type HeirCounts = BTreeMap<HeirType, u32>;

/// Validates a request and returns its heir multiset.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if:
/// - the estate value is not positive
/// - the heir list is empty
/// - an heir type appears more than once
/// - a count is zero or above the type's maximum
/// - both a husband and a wife are declared
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::validate_request;
/// use faraid_engine::models::{DistributionRequest, HeirType};
/// use rust_decimal::Decimal;
///
/// let request = DistributionRequest::new(Decimal::new(1000, 0)).with_heir(HeirType::Son, 2);
/// let heirs = validate_request(&request).unwrap();
/// assert_eq!(heirs[&HeirType::Son], 2);
/// ```
pub fn validate_request(request: &DistributionRequest) -> EngineResult<HeirCounts> {
    if request.estate_value <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "estate_value",
            format!("must be greater than zero, got {}", request.estate_value),
        ));
    }

    if request.heirs.is_empty() {
        return Err(EngineError::invalid_input(
            "heirs",
            "at least one heir is required",
        ));
    }

    let mut counts = HeirCounts::new();
    for heir in &request.heirs {
        let max = heir.heir_type.max_count();
        if heir.count == 0 || heir.count > max {
            return Err(EngineError::invalid_input(
                "heirs.count",
                format!(
                    "{:?} count must be between 1 and {}, got {}",
                    heir.heir_type, max, heir.count
                ),
            ));
        }
        if counts.insert(heir.heir_type, heir.count).is_some() {
            return Err(EngineError::invalid_input(
                "heirs.type",
                format!("{:?} is listed more than once", heir.heir_type),
            ));
        }
    }

    if counts.contains_key(&HeirType::Husband) && counts.contains_key(&HeirType::Wife) {
        return Err(EngineError::invalid_input(
            "heirs.type",
            "a husband and a wife cannot both survive the same deceased",
        ));
    }

    Ok(counts)
}
