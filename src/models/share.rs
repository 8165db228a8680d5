//! Share models produced by the distribution pipeline.
//!
//! A [`Share`] is the engine's internal unit: a pooled fraction of the estate
//! held by every heir of one type, together with the rule basis that produced it.

use serde::{Deserialize, Serialize};

use crate::calculation::Fraction;

use super::{HeirType, Language};

/// How a share was arrived at.
///
/// The declaration order is the order in which shares are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareBasis {
    /// A fixed share (fard) that needed no adjustment.
    Fixed,
    /// A fixed 1/6 plus the residue, held by a father or grandfather alongside daughters.
    FixedAndResiduary,
    /// A residuary share (ta'sib).
    Residuary,
    /// A fixed share reduced proportionally by 'Awl.
    AwlAdjusted,
    /// A fixed share increased proportionally by Radd.
    Radd,
    /// No share: the heir was excluded.
    Excluded,
}

impl ShareBasis {
    /// A short human-readable description of the basis.
    pub const fn description(self, language: Language) -> &'static str {
        match language {
            Language::En => match self {
                ShareBasis::Fixed => "Fixed share (fard)",
                ShareBasis::FixedAndResiduary => "Fixed share of 1/6 plus the residue",
                ShareBasis::Residuary => "Residuary share (ta'sib)",
                ShareBasis::AwlAdjusted => "Fixed share reduced by 'Awl",
                ShareBasis::Radd => "Fixed share increased by Radd",
                ShareBasis::Excluded => "Excluded from inheritance",
            },
            Language::Ar => match self {
                ShareBasis::Fixed => "فرض",
                ShareBasis::FixedAndResiduary => "السدس فرضا مع التعصيب",
                ShareBasis::Residuary => "تعصيب",
                ShareBasis::AwlAdjusted => "فرض بعد العول",
                ShareBasis::Radd => "فرض مع الرد",
                ShareBasis::Excluded => "محجوب",
            },
        }
    }
}

/// Why an heir receives nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// A son excludes every sibling.
    SonExcludesSiblings,
    /// A father excludes the paternal grandfather.
    FatherExcludesGrandfather,
    /// A father excludes the paternal grandmother.
    FatherExcludesPaternalGrandmother,
    /// A father excludes every sibling.
    FatherExcludesSiblings,
    /// A paternal grandfather excludes every sibling.
    GrandfatherExcludesSiblings,
    /// A son or daughter excludes maternal siblings.
    ChildExcludesMaternalSiblings,
    /// A mother excludes both grandmothers.
    MotherExcludesGrandmothers,
    /// A full brother excludes paternal siblings.
    FullBrotherExcludesPaternalSiblings,
    /// Two or more full sisters exclude paternal sisters who have no paternal brother.
    FullSistersExcludePaternalSisters,
    /// A closer residuary class took the whole residue.
    CloserResiduary,
    /// Fixed shares consumed the whole estate, leaving no residue.
    EstateExhausted,
}

impl ExclusionReason {
    /// The stable snake_case identifier of the reason.
    pub const fn as_str(self) -> &'static str {
        match self {
            ExclusionReason::SonExcludesSiblings => "son_excludes_siblings",
            ExclusionReason::FatherExcludesGrandfather => "father_excludes_grandfather",
            ExclusionReason::FatherExcludesPaternalGrandmother => {
                "father_excludes_paternal_grandmother"
            }
            ExclusionReason::FatherExcludesSiblings => "father_excludes_siblings",
            ExclusionReason::GrandfatherExcludesSiblings => "grandfather_excludes_siblings",
            ExclusionReason::ChildExcludesMaternalSiblings => "child_excludes_maternal_siblings",
            ExclusionReason::MotherExcludesGrandmothers => "mother_excludes_grandmothers",
            ExclusionReason::FullBrotherExcludesPaternalSiblings => {
                "full_brother_excludes_paternal_siblings"
            }
            ExclusionReason::FullSistersExcludePaternalSisters => {
                "full_sisters_exclude_paternal_sisters"
            }
            ExclusionReason::CloserResiduary => "closer_residuary",
            ExclusionReason::EstateExhausted => "estate_exhausted",
        }
    }

    /// A short human-readable explanation of the exclusion.
    pub const fn description(self, language: Language) -> &'static str {
        match language {
            Language::En => match self {
                ExclusionReason::SonExcludesSiblings => "Excluded by the son",
                ExclusionReason::FatherExcludesGrandfather
                | ExclusionReason::FatherExcludesPaternalGrandmother
                | ExclusionReason::FatherExcludesSiblings => "Excluded by the father",
                ExclusionReason::GrandfatherExcludesSiblings => {
                    "Excluded by the paternal grandfather"
                }
                ExclusionReason::ChildExcludesMaternalSiblings => {
                    "Excluded by the deceased's children"
                }
                ExclusionReason::MotherExcludesGrandmothers => "Excluded by the mother",
                ExclusionReason::FullBrotherExcludesPaternalSiblings => {
                    "Excluded by the full brother"
                }
                ExclusionReason::FullSistersExcludePaternalSisters => {
                    "Excluded by two or more full sisters"
                }
                ExclusionReason::CloserResiduary => "Excluded by a closer residuary heir",
                ExclusionReason::EstateExhausted => "No residue left after fixed shares",
            },
            Language::Ar => match self {
                ExclusionReason::SonExcludesSiblings => "محجوب بالابن",
                ExclusionReason::FatherExcludesGrandfather
                | ExclusionReason::FatherExcludesPaternalGrandmother
                | ExclusionReason::FatherExcludesSiblings => "محجوب بالأب",
                ExclusionReason::GrandfatherExcludesSiblings => "محجوب بالجد",
                ExclusionReason::ChildExcludesMaternalSiblings => "محجوب بالفرع الوارث",
                ExclusionReason::MotherExcludesGrandmothers => "محجوب بالأم",
                ExclusionReason::FullBrotherExcludesPaternalSiblings => "محجوب بالأخ الشقيق",
                ExclusionReason::FullSistersExcludePaternalSisters => {
                    "محجوب بالأختين الشقيقتين"
                }
                ExclusionReason::CloserResiduary => "محجوب بعاصب أقرب",
                ExclusionReason::EstateExhausted => "استغرقت الفروض التركة",
            },
        }
    }
}

/// A pooled share of the estate held by every heir of one type.
///
/// # Example
///
/// ```
/// use faraid_engine::calculation::Fraction;
/// use faraid_engine::models::{HeirType, Share, ShareBasis};
///
/// let share = Share::new(HeirType::Daughter, 2, Fraction::new(2, 3), ShareBasis::Fixed);
/// assert_eq!(share.per_heir_fraction(), Fraction::new(1, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// The heir category holding the share.
    pub heir_type: HeirType,
    /// How many heirs of the category hold it.
    pub count: u32,
    /// The pooled fraction of the whole estate.
    pub fraction: Fraction,
    /// How the fraction was arrived at.
    pub basis: ShareBasis,
    /// Set when `basis` is [`ShareBasis::Excluded`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusion: Option<ExclusionReason>,
}

impl Share {
    /// Creates a share that is not an exclusion.
    pub const fn new(heir_type: HeirType, count: u32, fraction: Fraction, basis: ShareBasis) -> Self {
        Self {
            heir_type,
            count,
            fraction,
            basis,
            exclusion: None,
        }
    }

    /// Creates a zero share for an excluded heir.
    pub const fn excluded(heir_type: HeirType, count: u32, reason: ExclusionReason) -> Self {
        Self {
            heir_type,
            count,
            fraction: Fraction::ZERO,
            basis: ShareBasis::Excluded,
            exclusion: Some(reason),
        }
    }

    /// The fraction held by each individual heir of the category.
    pub fn per_heir_fraction(&self) -> Fraction {
        self.fraction.split(self.count).unwrap_or(Fraction::ZERO)
    }
}
