//! Parcel-label conventions and helpers
//!
//! Labels are zero-based and contiguous: every parcel index in `0..=max`
//! owns at least one vertex. Parcellations distributed by the brain
//! parcellation survey are one-based; callers are responsible for the
//! decrement, and `from_one_based` does it for them. Nothing in this module
//! is invoked by the aggregator itself.

use crate::error::ModelError;

/// Convert one-based survey labels to the zero-based convention
///
/// # Arguments
/// * `labels` - One-based parcel indices, one per vertex
///
/// # Returns
/// Zero-based labels, or `ZeroLabel` if any entry is already 0.
pub fn from_one_based(labels: &[usize]) -> Result<Vec<usize>, ModelError> {
    labels
        .iter()
        .enumerate()
        .map(|(vertex, &l)| {
            if l == 0 {
                Err(ModelError::ZeroLabel { vertex })
            } else {
                Ok(l - 1)
            }
        })
        .collect()
}

/// Number of parcels implied by a zero-based label array (max label + 1)
pub fn n_parcels(parcels: &[usize]) -> usize {
    parcels.iter().max().map_or(0, |&m| m + 1)
}

/// Check that every label in `0..=max` is present
///
/// Diagnostic only; the fitter reports gaps as `EmptyParcel` on its own.
pub fn is_contiguous(parcels: &[usize]) -> bool {
    let n = n_parcels(parcels);
    let mut seen = vec![false; n];
    for &p in parcels {
        seen[p] = true;
    }
    seen.iter().all(|&s| s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_one_based() {
        let labels = vec![1, 3, 2, 1];
        let zero_based = from_one_based(&labels).unwrap();
        assert_eq!(zero_based, vec![0, 2, 1, 0]);
    }

    #[test]
    fn test_from_one_based_rejects_zero() {
        let labels = vec![1, 0, 2];
        match from_one_based(&labels) {
            Err(ModelError::ZeroLabel { vertex }) => assert_eq!(vertex, 1),
            other => panic!("expected ZeroLabel, got {:?}", other),
        }
    }

    #[test]
    fn test_n_parcels() {
        assert_eq!(n_parcels(&[]), 0);
        assert_eq!(n_parcels(&[0, 0, 0]), 1);
        assert_eq!(n_parcels(&[0, 2, 1]), 3);
    }

    #[test]
    fn test_is_contiguous() {
        assert!(is_contiguous(&[0, 1, 2, 1]));
        assert!(is_contiguous(&[]));
        // Gap at 1: only labels 0 and 2 present
        assert!(!is_contiguous(&[0, 2, 2]));
        // One-based labels leave parcel 0 empty
        assert!(!is_contiguous(&[1, 2, 3]));
    }
}
