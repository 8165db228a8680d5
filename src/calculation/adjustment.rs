//! 'Awl and Radd adjustment.
//!
//! 'Awl scales every fixed share down when their sum exceeds the estate; Radd
//! returns an unclaimed residue to the non-spouse fixed-share heirs. Both keep
//! the relative proportions of the shares they touch.

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Share, ShareBasis, Stage};

use super::exclusion::ExcludedHeir;
use super::fixed_shares::FixedAllocation;
use super::fraction::Fraction;
use super::residuary::exhausted_candidates;

/// The outcome of an adjustment.
#[derive(Debug, Clone)]
pub struct Adjustment {
    /// The adjusted shares.
    pub shares: Vec<Share>,
    /// Candidates that received nothing as a result.
    pub blocked: Vec<ExcludedHeir>,
    /// The fraction of the estate left with no heir to absorb it.
    pub unallocated: Fraction,
    /// The audit step describing the adjustment.
    pub audit_step: AuditStep,
}

/// Applies 'Awl: divides every fixed share by the fixed sum so the shares total one.
///
/// Residuary candidates without a fixed share get nothing.
///
/// # Errors
///
/// Returns [`EngineError::ArithmeticInvariantViolation`] if the fixed sum is zero.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{allocate_fixed_shares, apply_awl, Fraction, HeirCounts};
/// use faraid_engine::models::HeirType;
///
/// let heirs = HeirCounts::from([(HeirType::Husband, 1), (HeirType::FullSister, 2)]);
/// let allocation = allocate_fixed_shares(&heirs, &heirs, 1);
/// let awl = apply_awl(&allocation, 3).unwrap();
///
/// assert_eq!(awl.shares[0].fraction, Fraction::new(3, 7));
/// assert_eq!(awl.shares[1].fraction, Fraction::new(4, 7));
/// ```
pub fn apply_awl(allocation: &FixedAllocation, step_number: u32) -> EngineResult<Adjustment> {
    let total = allocation.fixed_sum;
    let mut shares = Vec::with_capacity(allocation.shares.len());

    for share in &allocation.shares {
        let fraction = share
            .fraction
            .checked_div(total)
            .ok_or_else(|| EngineError::invariant("'Awl over an empty set of fixed shares"))?;
        shares.push(Share {
            fraction,
            basis: ShareBasis::AwlAdjusted,
            ..*share
        });
    }

    let audit_step = AuditStep {
        step_number,
        stage: Stage::AwlAdjusted,
        rule_id: "awl".to_string(),
        rule_name: "'Awl (proportional reduction)".to_string(),
        source_ref: "Ijma' (ruling of Umar)".to_string(),
        input: serde_json::json!({
            "fixed_sum": total,
            "base": total.denominator(),
        }),
        output: serde_json::json!({
            "raised_base": total.numerator(),
            "shares": shares
                .iter()
                .map(|s| serde_json::json!({ "heir_type": s.heir_type, "fraction": s.fraction }))
                .collect::<Vec<_>>(),
        }),
        reasoning: format!(
            "Fixed shares total {} which exceeds the estate; the base is raised from {} to {} and every fixed share is reduced proportionally",
            total,
            total.denominator(),
            total.numerator()
        ),
    };

    Ok(Adjustment {
        shares,
        blocked: exhausted_candidates(allocation),
        unallocated: Fraction::ZERO,
        audit_step,
    })
}

/// Applies Radd: returns `unclaimed` to the non-spouse fixed-share heirs in
/// proportion to their fractions. Spouses keep their share.
///
/// If only spouses hold shares the residue stays unallocated.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{apply_radd, Fraction};
/// use faraid_engine::models::{HeirType, Share, ShareBasis};
///
/// let shares = vec![
///     Share::new(HeirType::Wife, 1, Fraction::new(1, 8), ShareBasis::Fixed),
///     Share::new(HeirType::Daughter, 1, Fraction::new(1, 2), ShareBasis::Fixed),
/// ];
/// let radd = apply_radd(&shares, Fraction::new(3, 8), 4);
///
/// assert_eq!(radd.shares[0].fraction, Fraction::new(1, 8));
/// assert_eq!(radd.shares[1].fraction, Fraction::new(7, 8));
/// ```
pub fn apply_radd(shares: &[Share], unclaimed: Fraction, step_number: u32) -> Adjustment {
    let spouse_sum: Fraction = shares
        .iter()
        .filter(|s| s.heir_type.is_spouse())
        .map(|s| s.fraction)
        .sum();
    let reddable_sum: Fraction = shares
        .iter()
        .filter(|s| !s.heir_type.is_spouse())
        .map(|s| s.fraction)
        .sum();

    let Some(scale) = (Fraction::ONE - spouse_sum).checked_div(reddable_sum) else {
        return Adjustment {
            shares: shares.to_vec(),
            blocked: Vec::new(),
            unallocated: unclaimed,
            audit_step: AuditStep {
                step_number,
                stage: Stage::RaddAdjusted,
                rule_id: "radd".to_string(),
                rule_name: "Radd (return of surplus)".to_string(),
                source_ref: "Ijma' (majority)".to_string(),
                input: serde_json::json!({ "unclaimed": unclaimed }),
                output: serde_json::json!({ "unallocated": unclaimed }),
                reasoning: format!(
                    "A residue of {} remains but spouses do not take Radd; it is left undistributed",
                    unclaimed
                ),
            },
        };
    };

    let adjusted: Vec<Share> = shares
        .iter()
        .map(|s| {
            if s.heir_type.is_spouse() {
                *s
            } else {
                Share {
                    fraction: s.fraction * scale,
                    basis: ShareBasis::Radd,
                    ..*s
                }
            }
        })
        .collect();

    let audit_step = AuditStep {
        step_number,
        stage: Stage::RaddAdjusted,
        rule_id: "radd".to_string(),
        rule_name: "Radd (return of surplus)".to_string(),
        source_ref: "Ijma' (majority)".to_string(),
        input: serde_json::json!({
            "unclaimed": unclaimed,
            "spouse_share": spouse_sum,
            "reddable_share": reddable_sum,
        }),
        output: serde_json::json!({
            "shares": adjusted
                .iter()
                .map(|s| serde_json::json!({ "heir_type": s.heir_type, "fraction": s.fraction }))
                .collect::<Vec<_>>(),
        }),
        reasoning: format!(
            "No residuary heir takes the remaining {}; it is returned to the non-spouse heirs in proportion to their shares (scaled by {})",
            unclaimed, scale
        ),
    };

    Adjustment {
        shares: adjusted,
        blocked: Vec::new(),
        unallocated: Fraction::ZERO,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::allocate_fixed_shares;
    use crate::calculation::validation::HeirCounts;
    use crate::models::{ExclusionReason, HeirType};

    fn allocation(entries: &[(HeirType, u32)]) -> FixedAllocation {
        let heirs: HeirCounts = entries.iter().copied().collect();
        allocate_fixed_shares(&heirs, &heirs, 1)
    }

    fn fraction_of(shares: &[Share], heir: HeirType) -> Fraction {
        shares
            .iter()
            .find(|s| s.heir_type == heir)
            .map(|s| s.fraction)
            .unwrap_or(Fraction::ZERO)
    }

    #[test]
    fn test_awl_husband_two_sisters() {
        let awl = apply_awl(&allocation(&[(HeirType::Husband, 1), (HeirType::FullSister, 2)]), 1)
            .unwrap();

        assert_eq!(fraction_of(&awl.shares, HeirType::Husband), Fraction::new(3, 7));
        assert_eq!(fraction_of(&awl.shares, HeirType::FullSister), Fraction::new(4, 7));
        assert_eq!(awl.shares[1].per_heir_fraction(), Fraction::new(2, 7));
        assert!(awl.shares.iter().all(|s| s.basis == ShareBasis::AwlAdjusted));
        assert!(awl.audit_step.reasoning.contains("from 6 to 7"));
    }

    #[test]
    fn test_awl_sums_to_one() {
        // Husband 1/4, two daughters 2/3, father 1/6, mother 1/6 = 5/4
        let awl = apply_awl(
            &allocation(&[
                (HeirType::Husband, 1),
                (HeirType::Daughter, 2),
                (HeirType::Father, 1),
                (HeirType::Mother, 1),
            ]),
            1,
        )
        .unwrap();

        let total: Fraction = awl.shares.iter().map(|s| s.fraction).sum();
        assert_eq!(total, Fraction::ONE);
        assert_eq!(fraction_of(&awl.shares, HeirType::Husband), Fraction::new(1, 5));
        assert!(awl.blocked.is_empty());
    }

    #[test]
    fn test_awl_blocks_pure_residuary_heirs() {
        // Husband 1/2, two full sisters 2/3, one maternal brother 1/6 + a paternal brother
        let awl = apply_awl(
            &allocation(&[
                (HeirType::Husband, 1),
                (HeirType::FullSister, 2),
                (HeirType::MaternalBrother, 1),
                (HeirType::PaternalBrother, 1),
            ]),
            1,
        )
        .unwrap();

        assert_eq!(awl.blocked.len(), 1);
        assert_eq!(awl.blocked[0].reason, ExclusionReason::EstateExhausted);
    }

    #[test]
    fn test_radd_single_mother_takes_whole_estate() {
        let shares = vec![Share::new(HeirType::Mother, 1, Fraction::new(1, 3), ShareBasis::Fixed)];
        let radd = apply_radd(&shares, Fraction::new(2, 3), 1);

        assert_eq!(radd.shares[0].fraction, Fraction::ONE);
        assert_eq!(radd.shares[0].basis, ShareBasis::Radd);
        assert!(radd.unallocated.is_zero());
    }

    #[test]
    fn test_radd_excludes_spouse() {
        let shares = vec![
            Share::new(HeirType::Husband, 1, Fraction::new(1, 2), ShareBasis::Fixed),
            Share::new(HeirType::Mother, 1, Fraction::new(1, 3), ShareBasis::Fixed),
        ];
        let radd = apply_radd(&shares, Fraction::new(1, 6), 1);

        assert_eq!(radd.shares[0].fraction, Fraction::new(1, 2));
        assert_eq!(radd.shares[0].basis, ShareBasis::Fixed);
        assert_eq!(radd.shares[1].fraction, Fraction::new(1, 2));
    }

    #[test]
    fn test_radd_keeps_proportions_between_heirs() {
        // Mother 1/6 and daughter 1/2 share the residue 1:3
        let shares = vec![
            Share::new(HeirType::Daughter, 1, Fraction::new(1, 2), ShareBasis::Fixed),
            Share::new(HeirType::Mother, 1, Fraction::new(1, 6), ShareBasis::Fixed),
        ];
        let radd = apply_radd(&shares, Fraction::new(1, 3), 1);

        assert_eq!(radd.shares[0].fraction, Fraction::new(3, 4));
        assert_eq!(radd.shares[1].fraction, Fraction::new(1, 4));
    }

    #[test]
    fn test_radd_with_only_spouse_leaves_residue_unallocated() {
        let shares = vec![Share::new(HeirType::Wife, 2, Fraction::new(1, 4), ShareBasis::Fixed)];
        let radd = apply_radd(&shares, Fraction::new(3, 4), 1);

        assert_eq!(radd.shares[0].fraction, Fraction::new(1, 4));
        assert_eq!(radd.unallocated, Fraction::new(3, 4));
        assert!(radd.audit_step.reasoning.contains("undistributed"));
    }
}
