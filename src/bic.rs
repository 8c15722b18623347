//! BIC aggregation over contrasts
//!
//! Scores a parcellation against a set of task contrast maps: each contrast
//! slice is fit per parcel by a [`ParcelModel`] under the alternative
//! hypothesis, and the per-parcel BIC values are summed over parcels and
//! contrasts into a single scalar.

use ndarray::{ArrayView3, Axis};
use tracing::debug;

use crate::error::ModelError;
use crate::model::{MixedEffects, ParcelModel};

/// BIC of a parcellation with respect to a contrast map
///
/// Fits the default [`MixedEffects`] model per parcel for every contrast
/// and sums the resulting BIC values. No normalization by parcel or
/// contrast count is applied; an empty contrast axis yields 0.
///
/// # Arguments
/// * `x` - Contrast map of shape (n_vertices, n_contrasts, n_subjects),
///   e.g. z scores from a subject-level task fMRI analysis
/// * `parcels` - Zero-based parcel label per vertex (one-based survey
///   labels must be decremented by the caller, see `labels::from_one_based`)
///
/// # Returns
/// The summed BIC score, or the first fitting error encountered.
pub fn compute_bic(x: ArrayView3<f64>, parcels: &[usize]) -> Result<f64, ModelError> {
    compute_bic_with(x, parcels, &MixedEffects::default())
}

/// BIC of a parcellation under a caller-supplied fitting model
///
/// Identical to [`compute_bic`] but delegates fitting to `model`. A failure
/// on any contrast aborts the aggregation; no partial total is returned.
pub fn compute_bic_with<M: ParcelModel>(
    x: ArrayView3<f64>,
    parcels: &[usize],
    model: &M,
) -> Result<f64, ModelError> {
    let mut bic = 0.0;
    for (i, slice) in x.axis_iter(Axis(1)).enumerate() {
        let fit = model.parameter_map(slice, parcels, false)?;
        let contrast_bic = fit.bic.sum();
        debug!(contrast = i, contrast_bic, "accumulated contrast BIC");
        bic += contrast_bic;
    }
    Ok(bic)
}
