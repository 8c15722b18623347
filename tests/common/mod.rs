//! Common test utilities for parcel-bic integration tests

use ndarray::Array3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Assign vertices to `n_parcels` contiguous blocks of equal size
///
/// Trailing vertices (when the division is not exact) go to the last parcel.
pub fn block_parcels(n_vertices: usize, n_parcels: usize) -> Vec<usize> {
    let block = n_vertices / n_parcels;
    (0..n_vertices)
        .map(|v| (v / block).min(n_parcels - 1))
        .collect()
}

/// Draw a synthetic contrast map from the mixed-effects generative model
///
/// For each contrast `c` and parcel `p`, vertex values are
/// `means[c][p] + eta_{c,p,s} + noise`, with per-subject effects of standard
/// deviation `sigma1` and vertex noise of standard deviation `sigma2`.
///
/// # Arguments
/// * `parcels` - Zero-based parcel label per vertex
/// * `means` - Per-contrast, per-parcel true activation means
/// * `n_subjects` - Number of subjects
/// * `sigma1`, `sigma2` - Between-subject and residual standard deviations
/// * `seed` - RNG seed, so repeated calls give identical data
///
/// # Returns
/// Contrast map of shape (n_vertices, n_contrasts, n_subjects)
pub fn synthetic_map(
    parcels: &[usize],
    means: &[Vec<f64>],
    n_subjects: usize,
    sigma1: f64,
    sigma2: f64,
    seed: u64,
) -> Array3<f64> {
    let n_vertices = parcels.len();
    let n_contrasts = means.len();
    let n_parcels = parcels.iter().max().map_or(0, |&m| m + 1);

    let mut rng = StdRng::seed_from_u64(seed);
    let subject_effect = Normal::new(0.0, sigma1).unwrap();
    let noise = Normal::new(0.0, sigma2).unwrap();

    // Subject effects drawn once per (contrast, parcel, subject)
    let mut eta = vec![vec![vec![0.0; n_subjects]; n_parcels]; n_contrasts];
    for c in 0..n_contrasts {
        for p in 0..n_parcels {
            for s in 0..n_subjects {
                eta[c][p][s] = subject_effect.sample(&mut rng);
            }
        }
    }

    let mut x = Array3::zeros((n_vertices, n_contrasts, n_subjects));
    for v in 0..n_vertices {
        let p = parcels[v];
        for c in 0..n_contrasts {
            for s in 0..n_subjects {
                x[[v, c, s]] = means[c][p] + eta[c][p][s] + noise.sample(&mut rng);
            }
        }
    }
    x
}
