//! Distribution result models for the Faraid distribution engine.
//!
//! This module contains the [`DistributionResult`] type and its associated
//! structures that capture every output of a calculation: the per-heir shares,
//! monetary totals, and an audit trace of each rule that was applied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::Fraction;

use super::{ExclusionReason, HeirType, ShareBasis};

/// The pipeline stage a calculation is in.
///
/// A calculation moves `Idle → Validated → ExclusionResolved → FixedAllocated`,
/// then through exactly one of `AwlAdjusted`, `ResiduaryDistributed`,
/// `RaddAdjusted` or `Exact`, and ends `Finalized`. Any failure ends `Rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Nothing has run yet.
    Idle,
    /// The request passed input validation.
    Validated,
    /// Exclusion rules have partitioned the heirs.
    ExclusionResolved,
    /// Fixed shares have been allocated.
    FixedAllocated,
    /// Fixed shares exceeded the estate and were reduced.
    AwlAdjusted,
    /// The residue went to residuary heirs (possibly nothing was left).
    ResiduaryDistributed,
    /// The residue was returned to fixed-share heirs.
    RaddAdjusted,
    /// Fixed shares accounted for exactly the whole estate.
    Exact,
    /// The result has been assembled.
    Finalized,
    /// The calculation failed.
    Rejected,
}

/// Which adjustment path resolved the distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Fixed shares summed to exactly the whole estate.
    Exact,
    /// Residuary heirs took what the fixed shares left.
    Residuary,
    /// Fixed shares exceeded the estate and were scaled down.
    Awl,
    /// The shortfall was returned to fixed-share heirs.
    Radd,
}

/// A single step in the audit trace recording a rule application.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The pipeline stage that produced the step.
    pub stage: Stage,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The textual source of the rule (Qur'an verse, Sunnah or consensus).
    pub source_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag outcomes that are valid but deserve the caller's attention,
/// such as an undistributed remainder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// A share as presented to the caller, with display and monetary values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedShare {
    /// The heir category.
    pub heir_type: HeirType,
    /// The localised name of the heir category.
    pub label: String,
    /// How many heirs of the category share this entry.
    pub count: u32,
    /// How the share was arrived at.
    pub basis: ShareBasis,
    /// The pooled fraction of the whole estate.
    pub fraction: Fraction,
    /// The fraction held by each individual heir.
    pub per_heir_fraction: Fraction,
    /// `fraction × 100`, rounded to two places. Display only.
    pub share_percentage: Decimal,
    /// The pooled monetary amount.
    pub share_amount: Decimal,
    /// The monetary amount for each individual heir.
    pub per_heir_amount: Decimal,
    /// A localised explanation of the share.
    pub description: String,
    /// Why the heir receives nothing, when excluded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion: Option<ExclusionReason>,
}

/// The complete result of a distribution.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::Fraction;
/// use faraid_engine::models::{AuditTrace, DistributionResult, Resolution};
/// use rust_decimal::Decimal;
///
/// let result = DistributionResult {
///     shares: vec![],
///     total_estate: Decimal::new(1000, 0),
///     remaining_estate: Decimal::ZERO,
///     unallocated_fraction: Fraction::ZERO,
///     resolution: Resolution::Residuary,
///     explanation: String::new(),
///     audit_trace: AuditTrace::default(),
/// };
/// assert!(result.shares.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionResult {
    /// Shares ordered by basis, then by canonical heir order.
    pub shares: Vec<CalculatedShare>,
    /// The estate value that was distributed.
    pub total_estate: Decimal,
    /// `total_estate − Σ share_amount`: unallocated money plus rounding residue.
    pub remaining_estate: Decimal,
    /// The fraction of the estate no eligible heir could absorb.
    pub unallocated_fraction: Fraction,
    /// Which adjustment path resolved the distribution.
    pub resolution: Resolution,
    /// A summary of the rules applied.
    pub explanation: String,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl DistributionResult {
    /// Returns the share entry for an heir type, if the type was submitted.
    pub fn share_for(&self, heir_type: HeirType) -> Option<&CalculatedShare> {
        self.shares.iter().find(|s| s.heir_type == heir_type)
    }

    /// The sum of all pooled fractions.
    pub fn total_fraction(&self) -> Fraction {
        self.shares.iter().map(|s| s.fraction).sum()
    }

    /// The sum of all pooled monetary amounts.
    pub fn total_distributed(&self) -> Decimal {
        self.shares.iter().map(|s| s.share_amount).sum()
    }
}
