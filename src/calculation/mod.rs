//! Calculation logic for the Faraid distribution engine.
//!
//! The pipeline runs in fixed order: input validation, exclusion (Hajb),
//! fixed-share allocation, residuary distribution or proportional adjustment
//! ('Awl / Radd), and finally monetary conversion. [`compute`] drives the
//! whole pipeline; the stage functions are exposed for inspection and testing.

mod adjustment;
mod engine;
mod exclusion;
mod fixed_shares;
mod fraction;
mod monetary;
mod residuary;
mod validation;

pub use adjustment::{Adjustment, apply_awl, apply_radd};
pub use engine::{compute, compute_with_precision};
pub use exclusion::{
    EXCLUSION_RULES, ExcludedHeir, Excluder, ExclusionResult, ExclusionRule, resolve_exclusions,
};
pub use fixed_shares::{
    Allotment, Condition, FIXED_SHARE_RULES, FixedAllocation, FixedShareRule, HeirContext, Pool,
    allocate_fixed_shares, matching_rule, rules_for,
};
pub use fraction::{Fraction, ParseFractionError};
pub use monetary::{
    DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES, apply_fraction, ensure_representable, percentage,
};
pub use residuary::{
    RESIDUARY_CLASSES, ResiduaryClass, ResiduaryDistribution, distribute_residue,
    exhausted_candidates, unit_weight,
};
pub use validation::{HeirCounts, validate_request};
