//! Heir models for the Faraid distribution engine.
//!
//! This module contains the closed [`HeirType`] enumeration, the per-type
//! limits and labels, and the [`HeirInput`] entries a request is made of.

use serde::{Deserialize, Serialize};

/// Display language for labels and descriptions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Arabic.
    Ar,
}

/// Biological sex of an heir category, used for the 2:1 residuary weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Male heir.
    Male,
    /// Female heir.
    Female,
}

/// The relationship family an heir type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KinshipGroup {
    /// Husband or wife of the deceased.
    Spouse,
    /// Son or daughter.
    Descendant,
    /// Parents and grandparents.
    Ascendant,
    /// Full, paternal and maternal siblings.
    Sibling,
}

/// The closed set of heir categories the engine understands.
///
/// The declaration order is the canonical order used when sorting shares.
///
/// # Example
///
/// ```
/// use faraid_engine::models::{HeirType, Language};
///
/// assert_eq!(HeirType::Wife.max_count(), 4);
/// assert_eq!(HeirType::FullBrother.label(Language::En), "Full Brother");
/// assert_eq!(HeirType::Son.label(Language::Ar), "ابن");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HeirType {
    /// Husband of the deceased.
    Husband,
    /// Wife (or wives) of the deceased.
    Wife,
    /// Son.
    Son,
    /// Daughter.
    Daughter,
    /// Father.
    Father,
    /// Mother.
    Mother,
    /// Father's father.
    PaternalGrandfather,
    /// Father's mother.
    PaternalGrandmother,
    /// Mother's mother.
    MaternalGrandmother,
    /// Brother sharing both parents.
    FullBrother,
    /// Sister sharing both parents.
    FullSister,
    /// Brother sharing only the father.
    PaternalBrother,
    /// Sister sharing only the father.
    PaternalSister,
    /// Brother sharing only the mother.
    MaternalBrother,
    /// Sister sharing only the mother.
    MaternalSister,
}

impl HeirType {
    /// Every heir type in canonical order.
    pub const ALL: [HeirType; 15] = [
        HeirType::Husband,
        HeirType::Wife,
        HeirType::Son,
        HeirType::Daughter,
        HeirType::Father,
        HeirType::Mother,
        HeirType::PaternalGrandfather,
        HeirType::PaternalGrandmother,
        HeirType::MaternalGrandmother,
        HeirType::FullBrother,
        HeirType::FullSister,
        HeirType::PaternalBrother,
        HeirType::PaternalSister,
        HeirType::MaternalBrother,
        HeirType::MaternalSister,
    ];

    /// The six sibling types.
    pub const SIBLINGS: [HeirType; 6] = [
        HeirType::FullBrother,
        HeirType::FullSister,
        HeirType::PaternalBrother,
        HeirType::PaternalSister,
        HeirType::MaternalBrother,
        HeirType::MaternalSister,
    ];

    /// The maximum number of heirs of this type a request may declare.
    pub const fn max_count(self) -> u32 {
        match self {
            HeirType::Husband
            | HeirType::Father
            | HeirType::Mother
            | HeirType::PaternalGrandfather
            | HeirType::PaternalGrandmother
            | HeirType::MaternalGrandmother => 1,
            HeirType::Wife => 4,
            _ => 20,
        }
    }

    /// The sex of this heir type.
    pub const fn sex(self) -> Sex {
        match self {
            HeirType::Husband
            | HeirType::Son
            | HeirType::Father
            | HeirType::PaternalGrandfather
            | HeirType::FullBrother
            | HeirType::PaternalBrother
            | HeirType::MaternalBrother => Sex::Male,
            _ => Sex::Female,
        }
    }

    /// The kinship group of this heir type.
    pub const fn group(self) -> KinshipGroup {
        match self {
            HeirType::Husband | HeirType::Wife => KinshipGroup::Spouse,
            HeirType::Son | HeirType::Daughter => KinshipGroup::Descendant,
            HeirType::Father
            | HeirType::Mother
            | HeirType::PaternalGrandfather
            | HeirType::PaternalGrandmother
            | HeirType::MaternalGrandmother => KinshipGroup::Ascendant,
            _ => KinshipGroup::Sibling,
        }
    }

    /// Returns true for husband and wife.
    pub const fn is_spouse(self) -> bool {
        matches!(self.group(), KinshipGroup::Spouse)
    }

    /// The display label of this heir type.
    pub const fn label(self, language: Language) -> &'static str {
        match language {
            Language::En => match self {
                HeirType::Husband => "Husband",
                HeirType::Wife => "Wife",
                HeirType::Son => "Son",
                HeirType::Daughter => "Daughter",
                HeirType::Father => "Father",
                HeirType::Mother => "Mother",
                HeirType::PaternalGrandfather => "Paternal Grandfather",
                HeirType::PaternalGrandmother => "Paternal Grandmother",
                HeirType::MaternalGrandmother => "Maternal Grandmother",
                HeirType::FullBrother => "Full Brother",
                HeirType::FullSister => "Full Sister",
                HeirType::PaternalBrother => "Paternal Brother",
                HeirType::PaternalSister => "Paternal Sister",
                HeirType::MaternalBrother => "Maternal Brother",
                HeirType::MaternalSister => "Maternal Sister",
            },
            Language::Ar => match self {
                HeirType::Husband => "زوج",
                HeirType::Wife => "زوجة",
                HeirType::Son => "ابن",
                HeirType::Daughter => "بنت",
                HeirType::Father => "أب",
                HeirType::Mother => "أم",
                HeirType::PaternalGrandfather => "جد لأب",
                HeirType::PaternalGrandmother => "جدة لأب",
                HeirType::MaternalGrandmother => "جدة لأم",
                HeirType::FullBrother => "أخ شقيق",
                HeirType::FullSister => "أخت شقيقة",
                HeirType::PaternalBrother => "أخ لأب",
                HeirType::PaternalSister => "أخت لأب",
                HeirType::MaternalBrother => "أخ لأم",
                HeirType::MaternalSister => "أخت لأم",
            },
        }
    }
}

/// One entry of a distribution request: an heir type and how many there are.
///
/// # Example
///
/// ```
/// use faraid_engine::models::{HeirInput, HeirType};
///
/// let input: HeirInput = serde_json::from_str(r#"{"type": "daughter", "count": 2}"#).unwrap();
/// assert_eq!(input, HeirInput::new(HeirType::Daughter, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeirInput {
    /// The heir category.
    #[serde(rename = "type")]
    pub heir_type: HeirType,
    /// How many heirs of this category survive the deceased.
    pub count: u32,
}

impl HeirInput {
    /// Creates a new heir entry.
    pub const fn new(heir_type: HeirType, count: u32) -> Self {
        Self { heir_type, count }
    }
}
