//! Per-parcel statistical models
//!
//! The BIC aggregator talks to its fitting routine through the
//! [`ParcelModel`] trait: one contrast slice in, one [`ParcelFit`] record
//! out. The crate ships a single implementation, the EM mixed-effects
//! fitter in `mixed_effects`; anything honoring the same contract plugs in.

pub mod mixed_effects;

pub use mixed_effects::MixedEffects;

use ndarray::{Array1, ArrayView2};

use crate::error::ModelError;

/// Per-parcel fit results for one contrast slice
///
/// All arrays have length `n_parcels`. The aggregator consumes only `bic`;
/// the remaining fields expose the fitted parameters for callers that want
/// them (e.g. effect-size maps).
#[derive(Debug, Clone)]
pub struct ParcelFit {
    /// Marginal log-likelihood of each parcel's data under the fitted model
    pub log_likelihood: Array1<f64>,
    /// Estimated mean activation per parcel (zero under the null)
    pub mu: Array1<f64>,
    /// Between-subject standard deviation per parcel
    pub sigma1: Array1<f64>,
    /// Within-parcel residual standard deviation per parcel
    pub sigma2: Array1<f64>,
    /// Per-parcel BIC values
    pub bic: Array1<f64>,
}

/// A model fit per parcel to subject-level contrast data
pub trait ParcelModel {
    /// Fit the model to one contrast slice
    ///
    /// # Arguments
    /// * `data` - Contrast slice of shape (n_vertices, n_subjects)
    /// * `parcels` - Zero-based parcel label per vertex
    /// * `null` - Fit under the null hypothesis (parcel mean fixed at zero)
    ///   instead of the alternative
    fn parameter_map(
        &self,
        data: ArrayView2<f64>,
        parcels: &[usize],
        null: bool,
    ) -> Result<ParcelFit, ModelError>;
}
