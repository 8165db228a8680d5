//! Fixed-share (Ashab al-Furud) allocation.
//!
//! Fixed shares are looked up in the [`FIXED_SHARE_RULES`] table. Rows are grouped
//! by heir type and evaluated top to bottom; the first row whose [`Condition`]
//! holds decides the heir's [`Allotment`]. Heirs whose allotment is residuary are
//! handed on to the residuary distributor.

use crate::models::{AuditStep, HeirType, Language, Share, ShareBasis, Stage};

use super::fraction::Fraction;
use super::validation::HeirCounts;

/// A predicate over the heirs of one distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Always holds.
    Always,
    /// A son or daughter is eligible.
    HasDescendant,
    /// An heir of the given type is eligible.
    Present(HeirType),
    /// The heir's headcount (pooled where the heir shares a pool) is at least `n`.
    CountAtLeast(u32),
    /// Exactly one heir of the given type is eligible.
    ExactlyOne(HeirType),
    /// At least `n` siblings of any kind were submitted, excluded ones included.
    SiblingsAtLeast(u32),
    /// A spouse, the father and the mother inherit with no descendant.
    Umariyyah,
}

impl Condition {
    fn holds(self, heir: HeirType, ctx: &HeirContext<'_>) -> bool {
        match self {
            Condition::Always => true,
            Condition::HasDescendant => ctx.has_descendant(),
            Condition::Present(other) => ctx.present(other),
            Condition::CountAtLeast(n) => ctx.headcount(heir) >= n,
            Condition::ExactlyOne(other) => ctx.count(other) == 1,
            Condition::SiblingsAtLeast(n) => ctx.submitted_siblings() >= n,
            Condition::Umariyyah => {
                ctx.present(HeirType::Father)
                    && (ctx.present(HeirType::Husband) || ctx.present(HeirType::Wife))
                    && !ctx.has_descendant()
            }
        }
    }

    /// A human-readable description of the condition.
    pub fn description(self, language: Language) -> String {
        match (self, language) {
            (Condition::Always, Language::En) => "Otherwise".to_string(),
            (Condition::Always, Language::Ar) => "في غير ذلك".to_string(),
            (Condition::HasDescendant, Language::En) => {
                "The deceased left a son or daughter".to_string()
            }
            (Condition::HasDescendant, Language::Ar) => "مع وجود الفرع الوارث".to_string(),
            (Condition::Present(other), Language::En) => {
                format!("Alongside a {}", other.label(language))
            }
            (Condition::Present(other), Language::Ar) => {
                format!("مع وجود {}", other.label(language))
            }
            (Condition::CountAtLeast(n), Language::En) => format!("{} or more share it", n),
            (Condition::CountAtLeast(n), Language::Ar) => format!("إذا كانوا {} فأكثر", n),
            (Condition::ExactlyOne(other), Language::En) => {
                format!("Alongside exactly one {}", other.label(language))
            }
            (Condition::ExactlyOne(other), Language::Ar) => {
                format!("مع {} منفردة", other.label(language))
            }
            (Condition::SiblingsAtLeast(n), Language::En) => {
                format!("The deceased left {} or more siblings", n)
            }
            (Condition::SiblingsAtLeast(n), Language::Ar) => {
                format!("مع وجود {} من الإخوة فأكثر", n)
            }
            (Condition::Umariyyah, Language::En) => {
                "With a spouse and the father, no descendants (Umariyyah)".to_string()
            }
            (Condition::Umariyyah, Language::Ar) => {
                "مع أحد الزوجين والأب دون فرع وارث (العمرية)".to_string()
            }
        }
    }
}

/// What a matching row grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allotment {
    /// A fixed fraction of the whole estate, pooled over the heir's headcount.
    Fixed(Fraction),
    /// A fixed fraction plus the residue.
    FixedAndResiduary(Fraction),
    /// The residue only.
    Residuary,
    /// One third of what remains after the spouse's share.
    ThirdOfRemainder,
}

impl Allotment {
    /// A human-readable description of the allotment.
    pub fn description(self, language: Language) -> String {
        match (self, language) {
            (Allotment::Fixed(f), _) => f.to_string(),
            (Allotment::FixedAndResiduary(f), Language::En) => format!("{} + residue", f),
            (Allotment::FixedAndResiduary(f), Language::Ar) => format!("{} + الباقي", f),
            (Allotment::Residuary, Language::En) => "Residue".to_string(),
            (Allotment::Residuary, Language::Ar) => "الباقي تعصيبا".to_string(),
            (Allotment::ThirdOfRemainder, Language::En) => "1/3 of the remainder".to_string(),
            (Allotment::ThirdOfRemainder, Language::Ar) => "ثلث الباقي".to_string(),
        }
    }
}

/// Heir types that hold one pooled fixed share between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    /// Paternal and maternal grandmother share 1/6.
    Grandmothers,
    /// Maternal brothers and sisters share equally regardless of sex.
    MaternalSiblings,
}

impl Pool {
    /// The pool an heir type belongs to, if any.
    pub const fn of(heir: HeirType) -> Option<Pool> {
        match heir {
            HeirType::PaternalGrandmother | HeirType::MaternalGrandmother => {
                Some(Pool::Grandmothers)
            }
            HeirType::MaternalBrother | HeirType::MaternalSister => Some(Pool::MaternalSiblings),
            _ => None,
        }
    }

    /// The heir types making up the pool.
    pub const fn members(self) -> &'static [HeirType] {
        match self {
            Pool::Grandmothers => &[HeirType::PaternalGrandmother, HeirType::MaternalGrandmother],
            Pool::MaternalSiblings => &[HeirType::MaternalBrother, HeirType::MaternalSister],
        }
    }
}

/// One row of the fixed-share table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedShareRule {
    /// The heir type the row applies to.
    pub heir: HeirType,
    /// When the row applies.
    pub condition: Condition,
    /// What the row grants.
    pub allotment: Allotment,
    /// The textual source of the rule.
    pub source_ref: &'static str,
}

const fn rule(
    heir: HeirType,
    condition: Condition,
    allotment: Allotment,
    source_ref: &'static str,
) -> FixedShareRule {
    FixedShareRule {
        heir,
        condition,
        allotment,
        source_ref,
    }
}

const HALF: Fraction = Fraction::new(1, 2);
const THIRD: Fraction = Fraction::new(1, 3);
const QUARTER: Fraction = Fraction::new(1, 4);
const SIXTH: Fraction = Fraction::new(1, 6);
const EIGHTH: Fraction = Fraction::new(1, 8);
const TWO_THIRDS: Fraction = Fraction::new(2, 3);

/// The fixed-share table, grouped by heir type in canonical order.
#[rustfmt::skip]
pub const FIXED_SHARE_RULES: &[FixedShareRule] = &[
    rule(HeirType::Husband, Condition::HasDescendant, Allotment::Fixed(QUARTER), "Qur'an 4:12"),
    rule(HeirType::Husband, Condition::Always, Allotment::Fixed(HALF), "Qur'an 4:12"),
    rule(HeirType::Wife, Condition::HasDescendant, Allotment::Fixed(EIGHTH), "Qur'an 4:12"),
    rule(HeirType::Wife, Condition::Always, Allotment::Fixed(QUARTER), "Qur'an 4:12"),
    rule(HeirType::Son, Condition::Always, Allotment::Residuary, "Qur'an 4:11"),
    rule(HeirType::Daughter, Condition::Present(HeirType::Son), Allotment::Residuary, "Qur'an 4:11"),
    rule(HeirType::Daughter, Condition::CountAtLeast(2), Allotment::Fixed(TWO_THIRDS), "Qur'an 4:11"),
    rule(HeirType::Daughter, Condition::Always, Allotment::Fixed(HALF), "Qur'an 4:11"),
    rule(HeirType::Father, Condition::Present(HeirType::Son), Allotment::Fixed(SIXTH), "Qur'an 4:11"),
    rule(HeirType::Father, Condition::HasDescendant, Allotment::FixedAndResiduary(SIXTH), "Qur'an 4:11; Sunnah"),
    rule(HeirType::Father, Condition::Always, Allotment::Residuary, "Qur'an 4:11"),
    rule(HeirType::Mother, Condition::HasDescendant, Allotment::Fixed(SIXTH), "Qur'an 4:11"),
    rule(HeirType::Mother, Condition::SiblingsAtLeast(2), Allotment::Fixed(SIXTH), "Qur'an 4:11"),
    rule(HeirType::Mother, Condition::Umariyyah, Allotment::ThirdOfRemainder, "Ijma' (ruling of Umar)"),
    rule(HeirType::Mother, Condition::Always, Allotment::Fixed(THIRD), "Qur'an 4:11"),
    rule(HeirType::PaternalGrandfather, Condition::Present(HeirType::Son), Allotment::Fixed(SIXTH), "Ijma'"),
    rule(HeirType::PaternalGrandfather, Condition::HasDescendant, Allotment::FixedAndResiduary(SIXTH), "Ijma'"),
    rule(HeirType::PaternalGrandfather, Condition::Always, Allotment::Residuary, "Ijma'"),
    rule(HeirType::PaternalGrandmother, Condition::Always, Allotment::Fixed(SIXTH), "Sunnah"),
    rule(HeirType::MaternalGrandmother, Condition::Always, Allotment::Fixed(SIXTH), "Sunnah"),
    rule(HeirType::FullBrother, Condition::Always, Allotment::Residuary, "Qur'an 4:176"),
    rule(HeirType::FullSister, Condition::Present(HeirType::FullBrother), Allotment::Residuary, "Qur'an 4:176"),
    rule(HeirType::FullSister, Condition::Present(HeirType::Daughter), Allotment::Residuary, "Sunnah"),
    rule(HeirType::FullSister, Condition::CountAtLeast(2), Allotment::Fixed(TWO_THIRDS), "Qur'an 4:176"),
    rule(HeirType::FullSister, Condition::Always, Allotment::Fixed(HALF), "Qur'an 4:176"),
    rule(HeirType::PaternalBrother, Condition::Always, Allotment::Residuary, "Qur'an 4:176"),
    rule(HeirType::PaternalSister, Condition::Present(HeirType::PaternalBrother), Allotment::Residuary, "Qur'an 4:176"),
    rule(HeirType::PaternalSister, Condition::Present(HeirType::Daughter), Allotment::Residuary, "Sunnah"),
    rule(HeirType::PaternalSister, Condition::ExactlyOne(HeirType::FullSister), Allotment::Fixed(SIXTH), "Ijma'"),
    rule(HeirType::PaternalSister, Condition::CountAtLeast(2), Allotment::Fixed(TWO_THIRDS), "Qur'an 4:176"),
    rule(HeirType::PaternalSister, Condition::Always, Allotment::Fixed(HALF), "Qur'an 4:176"),
    rule(HeirType::MaternalBrother, Condition::CountAtLeast(2), Allotment::Fixed(THIRD), "Qur'an 4:12"),
    rule(HeirType::MaternalBrother, Condition::Always, Allotment::Fixed(SIXTH), "Qur'an 4:12"),
    rule(HeirType::MaternalSister, Condition::CountAtLeast(2), Allotment::Fixed(THIRD), "Qur'an 4:12"),
    rule(HeirType::MaternalSister, Condition::Always, Allotment::Fixed(SIXTH), "Qur'an 4:12"),
];

/// The rows of [`FIXED_SHARE_RULES`] for one heir type, in evaluation order.
pub fn rules_for(heir: HeirType) -> impl Iterator<Item = &'static FixedShareRule> {
    FIXED_SHARE_RULES.iter().filter(move |r| r.heir == heir)
}

/// The facts about a distribution that rule conditions inspect.
#[derive(Debug, Clone, Copy)]
pub struct HeirContext<'a> {
    submitted: &'a HeirCounts,
    eligible: &'a HeirCounts,
}

impl<'a> HeirContext<'a> {
    /// Creates a context from the submitted and eligible heir multisets.
    pub fn new(submitted: &'a HeirCounts, eligible: &'a HeirCounts) -> Self {
        Self {
            submitted,
            eligible,
        }
    }

    /// The number of eligible heirs of a type.
    pub fn count(&self, heir: HeirType) -> u32 {
        self.eligible.get(&heir).copied().unwrap_or(0)
    }

    /// Returns true if an heir of the type is eligible.
    pub fn present(&self, heir: HeirType) -> bool {
        self.count(heir) > 0
    }

    /// Returns true if a son or daughter is eligible.
    pub fn has_descendant(&self) -> bool {
        self.present(HeirType::Son) || self.present(HeirType::Daughter)
    }

    /// The eligible headcount of the heir's pool, or of the heir itself.
    pub fn headcount(&self, heir: HeirType) -> u32 {
        match Pool::of(heir) {
            Some(pool) => pool.members().iter().map(|&m| self.count(m)).sum(),
            None => self.count(heir),
        }
    }

    /// The number of siblings submitted, whether or not they were excluded.
    pub fn submitted_siblings(&self) -> u32 {
        HeirType::SIBLINGS
            .iter()
            .filter_map(|s| self.submitted.get(s))
            .sum()
    }
}

/// Looks up the first matching fixed-share row for an eligible heir.
pub fn matching_rule(heir: HeirType, ctx: &HeirContext<'_>) -> Option<&'static FixedShareRule> {
    rules_for(heir).find(|r| r.condition.holds(heir, ctx))
}

/// The outcome of the fixed-share stage.
#[derive(Debug, Clone)]
pub struct FixedAllocation {
    /// Shares with a fixed component, basis `Fixed` or `FixedAndResiduary`.
    pub shares: Vec<Share>,
    /// Eligible heirs entitled to (part of) the residue, in canonical order.
    pub residuary_candidates: Vec<(HeirType, u32)>,
    /// The sum of all fixed fractions.
    pub fixed_sum: Fraction,
    /// One audit step per heir type.
    pub audit_steps: Vec<AuditStep>,
}

/// Allocates fixed shares to the eligible heirs.
///
/// # Arguments
///
/// * `submitted` - Every heir in the request, used for sibling counting
/// * `eligible` - The heirs that survived exclusion
/// * `step_number` - The step number for audit trail sequencing
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::{allocate_fixed_shares, Fraction, HeirCounts};
/// use faraid_engine::models::HeirType;
///
/// let heirs = HeirCounts::from([(HeirType::Husband, 1), (HeirType::FullSister, 2)]);
/// let allocation = allocate_fixed_shares(&heirs, &heirs, 1);
///
/// assert_eq!(allocation.fixed_sum, Fraction::new(7, 6));
/// assert!(allocation.residuary_candidates.is_empty());
/// ```
pub fn allocate_fixed_shares(
    submitted: &HeirCounts,
    eligible: &HeirCounts,
    step_number: u32,
) -> FixedAllocation {
    let ctx = HeirContext::new(submitted, eligible);
    let mut shares = Vec::new();
    let mut residuary_candidates = Vec::new();
    let mut audit_steps = Vec::new();
    let mut deferred_third = None;

    for (&heir, &count) in eligible {
        let Some(rule) = matching_rule(heir, &ctx) else {
            continue;
        };

        let (fraction, basis) = match rule.allotment {
            Allotment::Residuary => {
                residuary_candidates.push((heir, count));
                (None, None)
            }
            Allotment::FixedAndResiduary(group) => {
                residuary_candidates.push((heir, count));
                (Some(pooled(group, heir, count, &ctx)), Some(ShareBasis::FixedAndResiduary))
            }
            Allotment::Fixed(group) => (Some(pooled(group, heir, count, &ctx)), Some(ShareBasis::Fixed)),
            Allotment::ThirdOfRemainder => {
                deferred_third = Some((heir, count, rule));
                continue;
            }
        };

        if let (Some(fraction), Some(basis)) = (fraction, basis) {
            shares.push(Share::new(heir, count, fraction, basis));
        }
        audit_steps.push(allocation_step(
            step_number + audit_steps.len() as u32,
            heir,
            count,
            rule,
            fraction,
        ));
    }

    if let Some((heir, count, rule)) = deferred_third {
        let spouse_sum: Fraction = shares
            .iter()
            .filter(|s| s.heir_type.is_spouse())
            .map(|s| s.fraction)
            .sum();
        let fraction = (Fraction::ONE - spouse_sum) * THIRD;
        shares.push(Share::new(heir, count, fraction, ShareBasis::Fixed));
        audit_steps.push(allocation_step(
            step_number + audit_steps.len() as u32,
            heir,
            count,
            rule,
            Some(fraction),
        ));
    }

    shares.sort_by_key(|s| s.heir_type);
    let fixed_sum = shares.iter().map(|s| s.fraction).sum();

    FixedAllocation {
        shares,
        residuary_candidates,
        fixed_sum,
        audit_steps,
    }
}

/// The part of a pooled group fraction that belongs to one member type.
fn pooled(group: Fraction, heir: HeirType, count: u32, ctx: &HeirContext<'_>) -> Fraction {
    let headcount = ctx.headcount(heir);
    if headcount == count {
        return group;
    }
    group * Fraction::new(i128::from(count), i128::from(headcount))
}

fn allocation_step(
    step_number: u32,
    heir: HeirType,
    count: u32,
    rule: &FixedShareRule,
    fraction: Option<Fraction>,
) -> AuditStep {
    let condition = rule.condition.description(Language::En);
    let allotment = rule.allotment.description(Language::En);

    let mut reasoning = format!("{} ({}) receives {}", heir.label(Language::En), count, allotment);
    if let Some(f) = fraction.filter(|&f| Some(f) != rule_fraction(rule)) {
        reasoning.push_str(&format!(" = {} of the estate", f));
    }
    if rule.condition != Condition::Always {
        reasoning.push_str(&format!(": {}", condition));
    }

    AuditStep {
        step_number,
        stage: Stage::FixedAllocated,
        rule_id: "fixed_share".to_string(),
        rule_name: "Fixed Share (Ashab al-Furud)".to_string(),
        source_ref: rule.source_ref.to_string(),
        input: serde_json::json!({
            "heir_type": heir,
            "count": count,
            "condition": condition,
        }),
        output: serde_json::json!({
            "allotment": allotment,
            "fraction": fraction,
        }),
        reasoning,
    }
}

fn rule_fraction(rule: &FixedShareRule) -> Option<Fraction> {
    match rule.allotment {
        Allotment::Fixed(f) | Allotment::FixedAndResiduary(f) => Some(f),
        Allotment::Residuary | Allotment::ThirdOfRemainder => None,
    }
}
