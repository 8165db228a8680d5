//! Core data models for the Faraid distribution engine.
//!
//! This module contains all the domain models used throughout the engine.

mod distribution_result;
mod heir;
mod request;
mod share;

pub use distribution_result::{
    AuditStep, AuditTrace, AuditWarning, CalculatedShare, DistributionResult, Resolution, Stage,
};
pub use heir::{HeirInput, HeirType, KinshipGroup, Language, Sex};
pub use request::DistributionRequest;
pub use share::{ExclusionReason, Share, ShareBasis};
