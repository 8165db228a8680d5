//! The distribution pipeline.
//!
//! [`compute`] runs validation, exclusion, fixed-share allocation and then
//! exactly one of the residuary, 'Awl or Radd paths before converting the
//! exact fractions into money.

use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, CalculatedShare, DistributionRequest,
    DistributionResult, Language, Resolution, Share, Stage,
};

use super::adjustment::{apply_awl, apply_radd};
use super::exclusion::{resolve_exclusions, ExcludedHeir};
use super::fixed_shares::allocate_fixed_shares;
use super::fraction::Fraction;
use super::monetary::{apply_fraction, ensure_representable, percentage, DEFAULT_DECIMAL_PLACES};
use super::residuary::distribute_residue;
use super::validation::validate_request;

/// Computes a distribution with amounts rounded to two decimal places.
///
/// # Errors
///
/// See [`compute_with_precision`].
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{compute, Fraction};
/// use faraid_engine::models::{DistributionRequest, HeirType, Resolution};
/// use rust_decimal::Decimal;
///
/// let request = DistributionRequest::new(Decimal::new(1000, 0))
///     .with_heir(HeirType::Wife, 1)
///     .with_heir(HeirType::Daughter, 1);
/// let result = compute(&request).unwrap();
///
/// let daughter = result.share_for(HeirType::Daughter).unwrap();
/// assert_eq!(daughter.fraction, Fraction::new(7, 8));
/// assert_eq!(daughter.share_amount, Decimal::new(87500, 2));
/// assert_eq!(result.resolution, Resolution::Radd);
/// ```
pub fn compute(request: &DistributionRequest) -> EngineResult<DistributionResult> {
    compute_with_precision(request, DEFAULT_DECIMAL_PLACES)
}

/// Computes a distribution with amounts rounded half to even at `decimal_places`.
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] if the request is malformed or the estate
///   is too large to divide at `decimal_places`
/// - [`EngineError::NoEligibleHeirs`] if every heir is excluded
/// - [`EngineError::ArithmeticInvariantViolation`] if the shares do not
///   account for the whole estate
pub fn compute_with_precision(
    request: &DistributionRequest,
    decimal_places: u32,
) -> EngineResult<DistributionResult> {
    let mut tracker = StageTracker::default();
    let result = run_pipeline(request, decimal_places, &mut tracker);
    match &result {
        Ok(_) => tracker.advance(Stage::Finalized),
        Err(err) => {
            warn!(
                last_stage = ?tracker.current,
                error = %err,
                "Distribution rejected"
            );
            tracker.advance(Stage::Rejected);
        }
    }
    result
}

#[derive(Debug)]
struct StageTracker {
    current: Stage,
}

impl Default for StageTracker {
    fn default() -> Self {
        Self { current: Stage::Idle }
    }
}

impl StageTracker {
    fn advance(&mut self, next: Stage) {
        debug!(from = ?self.current, to = ?next, "Stage transition");
        self.current = next;
    }
}

/// The shares and outcome of whichever adjustment path ran.
struct Settlement {
    shares: Vec<Share>,
    blocked: Vec<ExcludedHeir>,
    unallocated: Fraction,
    resolution: Resolution,
}

fn run_pipeline(
    request: &DistributionRequest,
    decimal_places: u32,
    tracker: &mut StageTracker,
) -> EngineResult<DistributionResult> {
    let mut all_audit_steps: Vec<AuditStep> = Vec::new();
    let mut step_number: u32 = 1;

    let submitted = validate_request(request)?;
    ensure_representable(request.estate_value, decimal_places)?;
    tracker.advance(Stage::Validated);

    let exclusion = resolve_exclusions(&submitted, step_number)?;
    step_number += exclusion.audit_steps.len() as u32;
    all_audit_steps.extend(exclusion.audit_steps);
    tracker.advance(Stage::ExclusionResolved);

    let allocation = allocate_fixed_shares(&submitted, &exclusion.eligible, step_number);
    step_number += allocation.audit_steps.len() as u32;
    all_audit_steps.extend(allocation.audit_steps.iter().cloned());
    tracker.advance(Stage::FixedAllocated);
    debug!(fixed_sum = %allocation.fixed_sum, "Fixed shares allocated");

    let settlement = if allocation.fixed_sum > Fraction::ONE {
        let awl = apply_awl(&allocation, step_number)?;
        all_audit_steps.push(awl.audit_step);
        tracker.advance(Stage::AwlAdjusted);
        Settlement {
            shares: awl.shares,
            blocked: awl.blocked,
            unallocated: awl.unallocated,
            resolution: Resolution::Awl,
        }
    } else {
        let residue = distribute_residue(&allocation, step_number);
        step_number += residue.audit_steps.len() as u32;
        all_audit_steps.extend(residue.audit_steps);

        if residue.unclaimed.is_positive() {
            let radd = apply_radd(&residue.shares, residue.unclaimed, step_number);
            all_audit_steps.push(radd.audit_step);
            tracker.advance(Stage::RaddAdjusted);
            Settlement {
                shares: radd.shares,
                blocked: radd.blocked,
                unallocated: radd.unallocated,
                resolution: Resolution::Radd,
            }
        } else {
            let resolution = if allocation.fixed_sum == Fraction::ONE {
                Resolution::Exact
            } else {
                Resolution::Residuary
            };
            tracker.advance(match resolution {
                Resolution::Exact => Stage::Exact,
                _ => Stage::ResiduaryDistributed,
            });
            Settlement {
                shares: residue.shares,
                blocked: residue.blocked,
                unallocated: Fraction::ZERO,
                resolution,
            }
        }
    };

    check_invariant(&settlement)?;

    let language = request.language;
    let mut shares = settlement.shares.clone();
    shares.extend(
        exclusion
            .excluded
            .iter()
            .chain(settlement.blocked.iter())
            .filter(|e| !settlement.shares.iter().any(|s| s.heir_type == e.heir_type))
            .map(|e| Share::excluded(e.heir_type, e.count, e.reason)),
    );
    shares.sort_by_key(|s| (s.basis, s.heir_type));

    let calculated = shares
        .iter()
        .map(|share| present_share(share, request.estate_value, decimal_places, language))
        .collect::<EngineResult<Vec<_>>>()?;

    let total_distributed: Decimal = calculated.iter().map(|s| s.share_amount).sum();
    let remaining_estate = request.estate_value - total_distributed;
    let warnings = collect_warnings(&settlement, remaining_estate);

    let explanation = explain(settlement.resolution, &all_audit_steps);
    debug!(
        resolution = ?settlement.resolution,
        shares = calculated.len(),
        remaining = %remaining_estate,
        "Distribution computed"
    );

    Ok(DistributionResult {
        shares: calculated,
        total_estate: request.estate_value,
        remaining_estate,
        unallocated_fraction: settlement.unallocated,
        resolution: settlement.resolution,
        explanation,
        audit_trace: AuditTrace {
            steps: all_audit_steps,
            warnings,
        },
    })
}

fn check_invariant(settlement: &Settlement) -> EngineResult<()> {
    let allocated: Fraction = settlement.shares.iter().map(|s| s.fraction).sum();
    let total = allocated + settlement.unallocated;
    let negative = settlement.shares.iter().find(|s| s.fraction < Fraction::ZERO);

    if total != Fraction::ONE || negative.is_some() {
        let message = match negative {
            Some(share) => format!(
                "{:?} received a negative share {}",
                share.heir_type, share.fraction
            ),
            None => format!(
                "shares total {} with {} unallocated, expected 1",
                allocated, settlement.unallocated
            ),
        };
        error!(resolution = ?settlement.resolution, %message, "Distribution invariant violated");
        return Err(EngineError::invariant(message));
    }
    Ok(())
}

fn present_share(
    share: &Share,
    estate: Decimal,
    decimal_places: u32,
    language: Language,
) -> EngineResult<CalculatedShare> {
    let per_heir_fraction = share.per_heir_fraction();
    let description = match share.exclusion {
        Some(reason) => reason.description(language),
        None => share.basis.description(language),
    };

    Ok(CalculatedShare {
        heir_type: share.heir_type,
        label: share.heir_type.label(language).to_string(),
        count: share.count,
        basis: share.basis,
        fraction: share.fraction,
        per_heir_fraction,
        share_percentage: percentage(share.fraction)?,
        share_amount: apply_fraction(estate, share.fraction, decimal_places)?,
        per_heir_amount: apply_fraction(estate, per_heir_fraction, decimal_places)?,
        description: description.to_string(),
        exclusion: share.exclusion,
    })
}

fn collect_warnings(settlement: &Settlement, remaining_estate: Decimal) -> Vec<AuditWarning> {
    let mut warnings = Vec::new();

    if settlement.unallocated.is_positive() {
        warnings.push(AuditWarning {
            code: "UNALLOCATED_REMAINDER".to_string(),
            message: format!(
                "{} of the estate has no eligible heir to receive it and is reported as remaining",
                settlement.unallocated
            ),
            severity: "medium".to_string(),
        });
    } else if !remaining_estate.is_zero() {
        warnings.push(AuditWarning {
            code: "ROUNDING_RESIDUE".to_string(),
            message: format!(
                "Rounded amounts differ from the estate by {}",
                remaining_estate
            ),
            severity: "low".to_string(),
        });
    }

    warnings
}

fn explain(resolution: Resolution, steps: &[AuditStep]) -> String {
    let summary = match resolution {
        Resolution::Exact => "The fixed shares account for the whole estate.",
        Resolution::Residuary => "The residue after fixed shares goes to the residuary heirs.",
        Resolution::Awl => "The fixed shares exceed the estate and are reduced by 'Awl.",
        Resolution::Radd => "No residuary heir remains and the surplus is returned by Radd.",
    };

    let mut explanation = summary.to_string();
    for step in steps {
        explanation.push(' ');
        explanation.push_str(&step.reasoning);
        explanation.push('.');
    }
    explanation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExclusionReason, HeirType, ShareBasis};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn request(estate: &str, heirs: &[(HeirType, u32)]) -> DistributionRequest {
        heirs
            .iter()
            .fold(DistributionRequest::new(dec(estate)), |req, &(heir, count)| {
                req.with_heir(heir, count)
            })
    }

    fn assert_balanced(result: &DistributionResult) {
        assert_eq!(
            result.total_fraction() + result.unallocated_fraction,
            Fraction::ONE
        );
        assert_eq!(
            result.total_distributed() + result.remaining_estate,
            result.total_estate
        );
    }

    #[test]
    fn test_son_excludes_full_brother() {
        let result = compute(&request("1000", &[(HeirType::Son, 1), (HeirType::FullBrother, 1)]))
            .unwrap();

        let son = result.share_for(HeirType::Son).unwrap();
        assert_eq!(son.fraction, Fraction::ONE);
        assert_eq!(son.share_amount, dec("1000.00"));

        let brother = result.share_for(HeirType::FullBrother).unwrap();
        assert_eq!(brother.basis, ShareBasis::Excluded);
        assert_eq!(brother.share_amount, Decimal::ZERO);
        assert_eq!(brother.exclusion, Some(ExclusionReason::SonExcludesSiblings));
        assert_eq!(result.resolution, Resolution::Residuary);
        assert_balanced(&result);
    }

    #[test]
    fn test_awl_husband_two_full_sisters() {
        let result = compute(&request(
            "1000",
            &[(HeirType::Husband, 1), (HeirType::FullSister, 2)],
        ))
        .unwrap();

        let husband = result.share_for(HeirType::Husband).unwrap();
        let sisters = result.share_for(HeirType::FullSister).unwrap();
        assert_eq!(husband.fraction, Fraction::new(3, 7));
        assert_eq!(sisters.fraction, Fraction::new(4, 7));
        assert_eq!(sisters.per_heir_fraction, Fraction::new(2, 7));
        assert_eq!(husband.share_amount, dec("428.57"));
        assert_eq!(sisters.share_amount, dec("571.43"));
        assert_eq!(result.resolution, Resolution::Awl);
        assert_balanced(&result);
    }

    #[test]
    fn test_radd_single_mother() {
        let result = compute(&request("1000", &[(HeirType::Mother, 1)])).unwrap();

        let mother = result.share_for(HeirType::Mother).unwrap();
        assert_eq!(mother.fraction, Fraction::ONE);
        assert_eq!(mother.share_amount, dec("1000.00"));
        assert_eq!(result.remaining_estate, Decimal::ZERO);
        assert_eq!(result.resolution, Resolution::Radd);
    }

    #[test]
    fn test_radd_wife_and_daughter() {
        let result = compute(&request("1000", &[(HeirType::Wife, 1), (HeirType::Daughter, 1)]))
            .unwrap();

        assert_eq!(result.shares[0].heir_type, HeirType::Wife);
        assert_eq!(result.shares[0].basis, ShareBasis::Fixed);
        assert_eq!(result.shares[0].share_amount, dec("125.00"));
        assert_eq!(result.shares[1].basis, ShareBasis::Radd);
        assert_eq!(result.shares[1].share_amount, dec("875.00"));
        assert_balanced(&result);
    }

    #[test]
    fn test_wife_alone_leaves_unallocated_remainder() {
        let result = compute(&request("1000", &[(HeirType::Wife, 1)])).unwrap();

        assert_eq!(result.unallocated_fraction, Fraction::new(3, 4));
        assert_eq!(result.remaining_estate, dec("750.00"));
        assert_eq!(result.audit_trace.warnings[0].code, "UNALLOCATED_REMAINDER");
        assert_balanced(&result);
    }

    #[test]
    fn test_exact_resolution() {
        // Husband 1/2 + full sister 1/2
        let result = compute(&request(
            "600",
            &[(HeirType::Husband, 1), (HeirType::FullSister, 1)],
        ))
        .unwrap();

        assert_eq!(result.resolution, Resolution::Exact);
        assert_eq!(result.total_distributed(), dec("600.00"));
    }

    #[test]
    fn test_mushtaraka_full_brother_gets_nothing() {
        let result = compute(&request(
            "1200",
            &[
                (HeirType::Husband, 1),
                (HeirType::Mother, 1),
                (HeirType::MaternalBrother, 2),
                (HeirType::FullBrother, 1),
            ],
        ))
        .unwrap();

        let brother = result.share_for(HeirType::FullBrother).unwrap();
        assert_eq!(brother.exclusion, Some(ExclusionReason::EstateExhausted));
        assert_eq!(
            result.share_for(HeirType::MaternalBrother).unwrap().share_amount,
            dec("400.00")
        );
        assert_eq!(result.resolution, Resolution::Exact);
        assert_balanced(&result);
    }

    #[test]
    fn test_excluded_heirs_listed_last() {
        let result = compute(&request(
            "1000",
            &[
                (HeirType::FullBrother, 1),
                (HeirType::Father, 1),
                (HeirType::Mother, 1),
            ],
        ))
        .unwrap();

        let last = result.shares.last().unwrap();
        assert_eq!(last.heir_type, HeirType::FullBrother);
        assert_eq!(last.basis, ShareBasis::Excluded);
    }

    #[test]
    fn test_per_heir_amounts_round_individually() {
        let result = compute(&request("100", &[(HeirType::Son, 3)])).unwrap();

        let sons = result.share_for(HeirType::Son).unwrap();
        assert_eq!(sons.share_amount, dec("100.00"));
        assert_eq!(sons.per_heir_amount, dec("33.33"));
        assert!(result.audit_trace.warnings.is_empty());
    }

    #[test]
    fn test_precision_is_configurable() {
        let result = compute_with_precision(
            &request("1000", &[(HeirType::Husband, 1), (HeirType::FullSister, 2)]),
            0,
        )
        .unwrap();

        assert_eq!(result.share_for(HeirType::Husband).unwrap().share_amount, dec("429"));
        assert_eq!(result.share_for(HeirType::FullSister).unwrap().share_amount, dec("571"));
    }

    #[test]
    fn test_arabic_labels() {
        let req = request("1000", &[(HeirType::Son, 1), (HeirType::FullBrother, 1)])
            .with_language(Language::Ar);
        let result = compute(&req).unwrap();

        assert_eq!(result.share_for(HeirType::Son).unwrap().label, "ابن");
        assert_eq!(
            result.share_for(HeirType::FullBrother).unwrap().description,
            "محجوب بالابن"
        );
    }

    #[test]
    fn test_tied_halves_leave_rounding_residue() {
        // 0.005 each rounds to the even cent 0.00
        let result = compute(&request(
            "0.01",
            &[(HeirType::Husband, 1), (HeirType::FullSister, 1)],
        ))
        .unwrap();

        assert_eq!(result.total_distributed(), Decimal::ZERO);
        assert_eq!(result.remaining_estate, dec("0.01"));
        assert!(result.unallocated_fraction.is_zero());
        assert_eq!(result.audit_trace.warnings.len(), 1);
        assert_eq!(result.audit_trace.warnings[0].code, "ROUNDING_RESIDUE");
        assert_balanced(&result);
    }

    #[test]
    fn test_path_stages() {
        let cases = [
            (vec![(HeirType::Husband, 1), (HeirType::FullSister, 1)], Stage::Exact),
            (vec![(HeirType::Son, 1), (HeirType::Daughter, 1)], Stage::ResiduaryDistributed),
            (vec![(HeirType::Husband, 1), (HeirType::FullSister, 2)], Stage::AwlAdjusted),
            (vec![(HeirType::Mother, 1)], Stage::RaddAdjusted),
        ];

        for (heirs, expected) in cases {
            let mut tracker = StageTracker::default();
            run_pipeline(&request("1000", &heirs), 2, &mut tracker).unwrap();
            assert_eq!(tracker.current, expected, "{:?}", heirs);
        }
    }

    #[test]
    fn test_estate_too_large_for_precision_is_invalid_input() {
        let req = DistributionRequest::new(Decimal::MAX).with_heir(HeirType::Son, 1);
        let err = compute(&req).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { ref field, .. } if field == "estate_value"));

        let result = compute_with_precision(&req, 0).unwrap();
        assert_eq!(result.share_for(HeirType::Son).unwrap().share_amount, Decimal::MAX);
    }

    #[test]
    fn test_invalid_request_rejected() {
        let err = compute(&request("0", &[(HeirType::Son, 1)])).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput { .. }));
    }

    #[test]
    fn test_audit_steps_are_numbered_sequentially() {
        let result = compute(&request(
            "1000",
            &[
                (HeirType::Wife, 1),
                (HeirType::Son, 1),
                (HeirType::FullBrother, 1),
            ],
        ))
        .unwrap();

        let numbers: Vec<u32> = result
            .audit_trace
            .steps
            .iter()
            .map(|s| s.step_number)
            .collect();
        let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
        assert_eq!(numbers, expected);
        assert!(result.explanation.starts_with("The residue"));
    }
}
