//! Residuary (Asaba) distribution.
//!
//! Whatever the fixed shares leave goes to the closest residuary class in
//! [`RESIDUARY_CLASSES`]. Inside a class the residue is split by weighted
//! units: two for each male, one for each female.

use crate::models::{AuditStep, ExclusionReason, HeirType, Language, Sex, Share, ShareBasis, Stage};

use super::exclusion::ExcludedHeir;
use super::fixed_shares::FixedAllocation;
use super::fraction::Fraction;

/// A group of residuary heirs of equal proximity to the deceased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResiduaryClass {
    /// A stable identifier for the class.
    pub id: &'static str,
    /// The heir types that inherit together within the class.
    pub members: &'static [HeirType],
    /// The textual source of the rule.
    pub source_ref: &'static str,
}

/// Residuary classes, closest first. Only the first class with a candidate inherits.
pub const RESIDUARY_CLASSES: &[ResiduaryClass] = &[
    ResiduaryClass {
        id: "children",
        members: &[HeirType::Son, HeirType::Daughter],
        source_ref: "Qur'an 4:11",
    },
    ResiduaryClass {
        id: "father",
        members: &[HeirType::Father],
        source_ref: "Sunnah",
    },
    ResiduaryClass {
        id: "paternal_grandfather",
        members: &[HeirType::PaternalGrandfather],
        source_ref: "Ijma'",
    },
    ResiduaryClass {
        id: "full_siblings",
        members: &[HeirType::FullBrother, HeirType::FullSister],
        source_ref: "Qur'an 4:176",
    },
    ResiduaryClass {
        id: "paternal_siblings",
        members: &[HeirType::PaternalBrother, HeirType::PaternalSister],
        source_ref: "Qur'an 4:176",
    },
];

/// The residue weight of one heir of the given type.
pub const fn unit_weight(heir: HeirType) -> u32 {
    match heir.sex() {
        Sex::Male => 2,
        Sex::Female => 1,
    }
}

/// The outcome of the residuary stage.
#[derive(Debug, Clone)]
pub struct ResiduaryDistribution {
    /// Every share after the residue was handed out, fixed shares included.
    pub shares: Vec<Share>,
    /// Residuary candidates that received nothing.
    pub blocked: Vec<ExcludedHeir>,
    /// The class that took the residue, if any candidate existed.
    pub class: Option<&'static ResiduaryClass>,
    /// Residue nobody could take; non-zero only when no class exists.
    pub unclaimed: Fraction,
    /// Audit steps for this stage.
    pub audit_steps: Vec<AuditStep>,
}

fn winning_class(candidates: &[(HeirType, u32)]) -> Option<&'static ResiduaryClass> {
    RESIDUARY_CLASSES.iter().find(|class| {
        candidates
            .iter()
            .any(|(heir, _)| class.members.contains(heir))
    })
}

/// Marks every pure residuary candidate as receiving nothing because fixed
/// shares consumed the estate. Candidates that also hold a fixed share are skipped.
pub fn exhausted_candidates(allocation: &FixedAllocation) -> Vec<ExcludedHeir> {
    allocation
        .residuary_candidates
        .iter()
        .filter(|(heir, _)| !allocation.shares.iter().any(|s| s.heir_type == *heir))
        .map(|&(heir_type, count)| ExcludedHeir {
            heir_type,
            count,
            reason: ExclusionReason::EstateExhausted,
        })
        .collect()
}

/// Distributes `1 − fixed_sum` among the closest residuary class.
///
/// Must only be called when the fixed shares do not exceed the estate; the
/// 'Awl path handles the other case.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{allocate_fixed_shares, distribute_residue, Fraction, HeirCounts};
/// use faraid_engine::models::HeirType;
///
/// let heirs = HeirCounts::from([(HeirType::Son, 1), (HeirType::Daughter, 1)]);
/// let allocation = allocate_fixed_shares(&heirs, &heirs, 1);
/// let residue = distribute_residue(&allocation, 1);
///
/// assert_eq!(residue.shares[0].fraction, Fraction::new(2, 3));
/// assert_eq!(residue.shares[1].fraction, Fraction::new(1, 3));
/// ```
pub fn distribute_residue(allocation: &FixedAllocation, step_number: u32) -> ResiduaryDistribution {
    let remainder = (Fraction::ONE - allocation.fixed_sum).clamp_non_negative();
    let candidates = &allocation.residuary_candidates;
    let mut shares = allocation.shares.clone();

    let Some(class) = winning_class(candidates) else {
        return ResiduaryDistribution {
            shares,
            blocked: Vec::new(),
            class: None,
            unclaimed: remainder,
            audit_steps: Vec::new(),
        };
    };

    let (members, others): (Vec<(HeirType, u32)>, Vec<(HeirType, u32)>) = candidates
        .iter()
        .partition(|(heir, _)| class.members.contains(heir));

    let mut blocked: Vec<ExcludedHeir> = others
        .iter()
        .map(|&(heir_type, count)| ExcludedHeir {
            heir_type,
            count,
            reason: ExclusionReason::CloserResiduary,
        })
        .collect();

    let units: u32 = members
        .iter()
        .map(|&(heir, count)| count * unit_weight(heir))
        .sum();

    let mut parts = Vec::new();
    if remainder.is_zero() {
        blocked.extend(exhausted_candidates(allocation).into_iter().filter(|e| {
            members.iter().any(|(heir, _)| *heir == e.heir_type)
        }));
    } else {
        for &(heir, count) in &members {
            let part = remainder
                * Fraction::new(i128::from(count * unit_weight(heir)), i128::from(units));
            parts.push((heir, count, part));
            match shares.iter_mut().find(|s| s.heir_type == heir) {
                Some(existing) => existing.fraction = existing.fraction + part,
                None => shares.push(Share::new(heir, count, part, ShareBasis::Residuary)),
            }
        }
    }

    let audit_steps = vec![residue_step(step_number, class, remainder, units, &parts, &blocked)];

    ResiduaryDistribution {
        shares,
        blocked,
        class: Some(class),
        unclaimed: Fraction::ZERO,
        audit_steps,
    }
}

fn residue_step(
    step_number: u32,
    class: &ResiduaryClass,
    remainder: Fraction,
    units: u32,
    parts: &[(HeirType, u32, Fraction)],
    blocked: &[ExcludedHeir],
) -> AuditStep {
    let reasoning = if parts.is_empty() {
        format!(
            "No residue remains for the {} class after fixed shares",
            class.id.replace('_', " ")
        )
    } else {
        let split: Vec<String> = parts
            .iter()
            .map(|(heir, count, part)| {
                format!("{} ({}) takes {}", heir.label(Language::En), count, part)
            })
            .collect();
        format!(
            "Residue of {} goes to the {} class over {} units: {}",
            remainder,
            class.id.replace('_', " "),
            units,
            split.join(", ")
        )
    };

    AuditStep {
        step_number,
        stage: Stage::ResiduaryDistributed,
        rule_id: "residuary".to_string(),
        rule_name: "Residuary Share (Asaba)".to_string(),
        source_ref: class.source_ref.to_string(),
        input: serde_json::json!({
            "remainder": remainder,
            "class": class.id,
            "units": units,
        }),
        output: serde_json::json!({
            "shares": parts
                .iter()
                .map(|(heir, _, part)| serde_json::json!({ "heir_type": heir, "fraction": part }))
                .collect::<Vec<_>>(),
            "blocked": blocked.iter().map(|b| b.heir_type).collect::<Vec<_>>(),
        }),
        reasoning,
    }
}
