//! Eligibility and exclusion (Hajb) resolution.
//!
//! Exclusion is driven by the ordered [`EXCLUSION_RULES`] table. Each rule is
//! evaluated against the heirs that survived the rules before it, so an excluded
//! heir never excludes anyone else.

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, ExclusionReason, HeirType, Language, Stage};

use super::validation::HeirCounts;

/// Which surviving heirs trigger an exclusion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Excluder {
    /// Any heir of one of these types.
    AnyOf(&'static [HeirType]),
    /// At least this many heirs of one type.
    AtLeast(HeirType, u32),
}

/// One row of the exclusion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExclusionRule {
    /// The reason tagged onto every heir this rule excludes.
    pub reason: ExclusionReason,
    /// The heir types this rule removes.
    pub excluded: &'static [HeirType],
    /// The surviving heirs that trigger the rule.
    pub by: Excluder,
    /// A surviving heir type whose presence suspends the rule.
    pub unless: Option<HeirType>,
    /// The textual source of the rule.
    pub source_ref: &'static str,
}

impl ExclusionRule {
    fn triggered(&self, eligible: &HeirCounts) -> bool {
        let present = match self.by {
            Excluder::AnyOf(types) => types.iter().any(|t| eligible.contains_key(t)),
            Excluder::AtLeast(heir, n) => eligible.get(&heir).is_some_and(|&c| c >= n),
        };
        let suspended = self.unless.is_some_and(|t| eligible.contains_key(&t));
        present && !suspended
    }
}

const MATERNAL_SIBLINGS: &[HeirType] = &[HeirType::MaternalBrother, HeirType::MaternalSister];
const PATERNAL_SIBLINGS: &[HeirType] = &[HeirType::PaternalBrother, HeirType::PaternalSister];

/// The exclusion table, in the order the rules must be applied.
pub const EXCLUSION_RULES: &[ExclusionRule] = &[
    ExclusionRule {
        reason: ExclusionReason::SonExcludesSiblings,
        excluded: &HeirType::SIBLINGS,
        by: Excluder::AnyOf(&[HeirType::Son]),
        unless: None,
        source_ref: "Qur'an 4:176",
    },
    ExclusionRule {
        reason: ExclusionReason::FatherExcludesGrandfather,
        excluded: &[HeirType::PaternalGrandfather],
        by: Excluder::AnyOf(&[HeirType::Father]),
        unless: None,
        source_ref: "Ijma'",
    },
    ExclusionRule {
        reason: ExclusionReason::FatherExcludesPaternalGrandmother,
        excluded: &[HeirType::PaternalGrandmother],
        by: Excluder::AnyOf(&[HeirType::Father]),
        unless: None,
        source_ref: "Ijma' (majority)",
    },
    ExclusionRule {
        reason: ExclusionReason::FatherExcludesSiblings,
        excluded: &HeirType::SIBLINGS,
        by: Excluder::AnyOf(&[HeirType::Father]),
        unless: None,
        source_ref: "Qur'an 4:176",
    },
    ExclusionRule {
        reason: ExclusionReason::GrandfatherExcludesSiblings,
        excluded: &HeirType::SIBLINGS,
        by: Excluder::AnyOf(&[HeirType::PaternalGrandfather]),
        unless: None,
        source_ref: "Hanafi doctrine",
    },
    ExclusionRule {
        reason: ExclusionReason::ChildExcludesMaternalSiblings,
        excluded: MATERNAL_SIBLINGS,
        by: Excluder::AnyOf(&[HeirType::Son, HeirType::Daughter]),
        unless: None,
        source_ref: "Qur'an 4:12",
    },
    ExclusionRule {
        reason: ExclusionReason::MotherExcludesGrandmothers,
        excluded: &[HeirType::PaternalGrandmother, HeirType::MaternalGrandmother],
        by: Excluder::AnyOf(&[HeirType::Mother]),
        unless: None,
        source_ref: "Ijma'",
    },
    ExclusionRule {
        reason: ExclusionReason::FullBrotherExcludesPaternalSiblings,
        excluded: PATERNAL_SIBLINGS,
        by: Excluder::AnyOf(&[HeirType::FullBrother]),
        unless: None,
        source_ref: "Sunnah",
    },
    ExclusionRule {
        reason: ExclusionReason::FullSistersExcludePaternalSisters,
        excluded: &[HeirType::PaternalSister],
        by: Excluder::AtLeast(HeirType::FullSister, 2),
        unless: Some(HeirType::PaternalBrother),
        source_ref: "Ijma'",
    },
];

/// An heir category removed by an exclusion rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExcludedHeir {
    /// The excluded heir category.
    pub heir_type: HeirType,
    /// How many heirs of the category were submitted.
    pub count: u32,
    /// The rule that excluded them.
    pub reason: ExclusionReason,
}

/// The heir multiset partitioned into eligible and excluded heirs.
#[derive(Debug, Clone)]
pub struct ExclusionResult {
    /// Heirs entitled to inherit.
    pub eligible: HeirCounts,
    /// Heirs removed by a rule, in the order the rules fired.
    pub excluded: Vec<ExcludedHeir>,
    /// One audit step per rule that fired.
    pub audit_steps: Vec<AuditStep>,
}

/// Applies the exclusion table to a validated heir multiset.
///
/// # Errors
///
/// Returns [`EngineError::NoEligibleHeirs`] if every heir is excluded.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{resolve_exclusions, HeirCounts};
/// use faraid_engine::models::{ExclusionReason, HeirType};
///
/// let heirs = HeirCounts::from([(HeirType::Son, 1), (HeirType::FullBrother, 1)]);
/// let result = resolve_exclusions(&heirs, 1).unwrap();
///
/// assert!(result.eligible.contains_key(&HeirType::Son));
/// assert_eq!(result.excluded[0].heir_type, HeirType::FullBrother);
/// assert_eq!(result.excluded[0].reason, ExclusionReason::SonExcludesSiblings);
/// ```
pub fn resolve_exclusions(heirs: &HeirCounts, step_number: u32) -> EngineResult<ExclusionResult> {
    let mut eligible = heirs.clone();
    let mut excluded = Vec::new();
    let mut audit_steps = Vec::new();

    for rule in EXCLUSION_RULES {
        if !rule.triggered(&eligible) {
            continue;
        }

        let removed: Vec<ExcludedHeir> = rule
            .excluded
            .iter()
            .filter_map(|heir| {
                eligible.remove(heir).map(|count| ExcludedHeir {
                    heir_type: *heir,
                    count,
                    reason: rule.reason,
                })
            })
            .collect();

        if removed.is_empty() {
            continue;
        }

        let names: Vec<String> = removed
            .iter()
            .map(|e| format!("{:?} ({})", e.heir_type, e.count))
            .collect();
        let excluded_by: Vec<String> = match rule.by {
            Excluder::AnyOf(types) => types
                .iter()
                .filter(|t| eligible.contains_key(t))
                .map(|t| format!("{:?}", t))
                .collect(),
            Excluder::AtLeast(heir, n) => vec![format!("{:?} >= {}", heir, n)],
        };
        let removed_types: Vec<String> =
            removed.iter().map(|e| format!("{:?}", e.heir_type)).collect();

        audit_steps.push(AuditStep {
            step_number: step_number + audit_steps.len() as u32,
            stage: Stage::ExclusionResolved,
            rule_id: rule.reason.as_str().to_string(),
            rule_name: "Exclusion (Hajb)".to_string(),
            source_ref: rule.source_ref.to_string(),
            input: serde_json::json!({ "excluded_by": excluded_by }),
            output: serde_json::json!({ "excluded": removed_types }),
            reasoning: format!(
                "{}: {}",
                rule.reason.description(Language::En),
                names.join(", ")
            ),
        });

        excluded.extend(removed);
    }

    if eligible.is_empty() {
        return Err(EngineError::NoEligibleHeirs);
    }

    Ok(ExclusionResult {
        eligible,
        excluded,
        audit_steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heirs(entries: &[(HeirType, u32)]) -> HeirCounts {
        entries.iter().copied().collect()
    }

    fn reason_for(result: &ExclusionResult, heir: HeirType) -> Option<ExclusionReason> {
        result
            .excluded
            .iter()
            .find(|e| e.heir_type == heir)
            .map(|e| e.reason)
    }

    #[test]
    fn test_son_excludes_full_brother() {
        let result =
            resolve_exclusions(&heirs(&[(HeirType::Son, 1), (HeirType::FullBrother, 1)]), 1)
                .unwrap();

        assert_eq!(result.eligible.len(), 1);
        assert_eq!(
            reason_for(&result, HeirType::FullBrother),
            Some(ExclusionReason::SonExcludesSiblings)
        );
        assert_eq!(result.audit_steps.len(), 1);
        assert_eq!(result.audit_steps[0].step_number, 1);
        assert!(result.audit_steps[0].reasoning.contains("FullBrother (1)"));
    }

    #[test]
    fn test_son_excludes_every_sibling() {
        let mut entries = vec![(HeirType::Son, 1)];
        entries.extend(HeirType::SIBLINGS.iter().map(|&s| (s, 2)));
        let result = resolve_exclusions(&heirs(&entries), 1).unwrap();

        assert_eq!(result.excluded.len(), 6);
        assert!(result
            .excluded
            .iter()
            .all(|e| e.reason == ExclusionReason::SonExcludesSiblings));
    }

    #[test]
    fn test_father_excludes_grandfather_and_paternal_grandmother() {
        let result = resolve_exclusions(
            &heirs(&[
                (HeirType::Father, 1),
                (HeirType::PaternalGrandfather, 1),
                (HeirType::PaternalGrandmother, 1),
                (HeirType::MaternalGrandmother, 1),
            ]),
            1,
        )
        .unwrap();

        assert_eq!(
            reason_for(&result, HeirType::PaternalGrandfather),
            Some(ExclusionReason::FatherExcludesGrandfather)
        );
        assert_eq!(
            reason_for(&result, HeirType::PaternalGrandmother),
            Some(ExclusionReason::FatherExcludesPaternalGrandmother)
        );
        assert!(result.eligible.contains_key(&HeirType::MaternalGrandmother));
    }

    #[test]
    fn test_excluded_grandfather_does_not_exclude_siblings_twice() {
        let result = resolve_exclusions(
            &heirs(&[
                (HeirType::Father, 1),
                (HeirType::PaternalGrandfather, 1),
                (HeirType::FullSister, 1),
            ]),
            1,
        )
        .unwrap();

        assert_eq!(
            reason_for(&result, HeirType::FullSister),
            Some(ExclusionReason::FatherExcludesSiblings)
        );
    }

    #[test]
    fn test_grandfather_excludes_siblings_without_father() {
        let result = resolve_exclusions(
            &heirs(&[(HeirType::PaternalGrandfather, 1), (HeirType::FullBrother, 2)]),
            1,
        )
        .unwrap();

        assert_eq!(
            reason_for(&result, HeirType::FullBrother),
            Some(ExclusionReason::GrandfatherExcludesSiblings)
        );
    }

    #[test]
    fn test_daughter_excludes_maternal_siblings_but_not_full_sister() {
        let result = resolve_exclusions(
            &heirs(&[
                (HeirType::Daughter, 1),
                (HeirType::MaternalBrother, 1),
                (HeirType::FullSister, 1),
            ]),
            1,
        )
        .unwrap();

        assert_eq!(
            reason_for(&result, HeirType::MaternalBrother),
            Some(ExclusionReason::ChildExcludesMaternalSiblings)
        );
        assert!(result.eligible.contains_key(&HeirType::FullSister));
    }

    #[test]
    fn test_mother_excludes_both_grandmothers() {
        let result = resolve_exclusions(
            &heirs(&[
                (HeirType::Mother, 1),
                (HeirType::PaternalGrandmother, 1),
                (HeirType::MaternalGrandmother, 1),
            ]),
            1,
        )
        .unwrap();

        assert_eq!(result.excluded.len(), 2);
        assert!(result
            .excluded
            .iter()
            .all(|e| e.reason == ExclusionReason::MotherExcludesGrandmothers));
    }

    #[test]
    fn test_full_brother_excludes_paternal_siblings() {
        let result = resolve_exclusions(
            &heirs(&[
                (HeirType::FullBrother, 1),
                (HeirType::PaternalBrother, 1),
                (HeirType::PaternalSister, 1),
            ]),
            1,
        )
        .unwrap();

        assert_eq!(result.eligible.len(), 1);
        assert_eq!(
            reason_for(&result, HeirType::PaternalSister),
            Some(ExclusionReason::FullBrotherExcludesPaternalSiblings)
        );
    }

    #[test]
    fn test_two_full_sisters_exclude_paternal_sister() {
        let result = resolve_exclusions(
            &heirs(&[(HeirType::FullSister, 2), (HeirType::PaternalSister, 1)]),
            1,
        )
        .unwrap();

        assert_eq!(
            reason_for(&result, HeirType::PaternalSister),
            Some(ExclusionReason::FullSistersExcludePaternalSisters)
        );
    }

    #[test]
    fn test_paternal_brother_suspends_full_sisters_rule() {
        let result = resolve_exclusions(
            &heirs(&[
                (HeirType::FullSister, 2),
                (HeirType::PaternalBrother, 1),
                (HeirType::PaternalSister, 1),
            ]),
            1,
        )
        .unwrap();

        assert!(result.excluded.is_empty());
    }

    #[test]
    fn test_one_full_sister_does_not_exclude_paternal_sister() {
        let result = resolve_exclusions(
            &heirs(&[(HeirType::FullSister, 1), (HeirType::PaternalSister, 3)]),
            1,
        )
        .unwrap();

        assert!(result.excluded.is_empty());
    }

    #[test]
    fn test_audit_steps_are_numbered_from_given_step() {
        let result = resolve_exclusions(
            &heirs(&[
                (HeirType::Son, 1),
                (HeirType::Mother, 1),
                (HeirType::FullBrother, 1),
                (HeirType::MaternalGrandmother, 1),
            ]),
            4,
        )
        .unwrap();

        let numbers: Vec<u32> = result.audit_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![4, 5]);
    }

    #[test]
    fn test_no_exclusions_when_no_rule_fires() {
        let result =
            resolve_exclusions(&heirs(&[(HeirType::Wife, 1), (HeirType::Daughter, 1)]), 1)
                .unwrap();

        assert!(result.excluded.is_empty());
        assert!(result.audit_steps.is_empty());
    }

    #[test]
    fn test_empty_multiset_reports_no_eligible_heirs() {
        let result = resolve_exclusions(&HeirCounts::new(), 1);
        assert!(matches!(result, Err(EngineError::NoEligibleHeirs)));
    }
}
