//! parcel-bic: BIC scoring of brain-surface parcellations
//!
//! Given task fMRI contrast maps and a parcellation, this crate computes a
//! Bayesian Information Criterion score for the evaluation of parcellation
//! accuracy with respect to task activation: a mixed-effects model is fit
//! per parcel for every contrast, and the per-parcel BIC values are summed
//! into one scalar per candidate parcellation.
//!
//! # Modules
//! - `bic`: BIC aggregation over contrasts
//! - `model`: the `ParcelModel` fitting interface and the EM mixed-effects
//!   implementation
//! - `labels`: parcel-label conventions (zero-based, contiguous) and helpers
//! - `error`: error types
//!
//! The analysis follows "Which fMRI clustering gives good brain
//! parcellations?" (doi.org/10.3389/fnins.2014.00167), as used in the brain
//! parcellation survey (doi.org/10.1016/j.neuroimage.2017.04.014).

pub mod bic;
pub mod error;
pub mod labels;
pub mod model;

pub use bic::{compute_bic, compute_bic_with};
pub use error::ModelError;
pub use model::{MixedEffects, ParcelFit, ParcelModel};
