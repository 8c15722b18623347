//! EM mixed-effects fitter
//!
//! Fits, per parcel, a one-way random-effects model to subject-level
//! contrast data:
//!
//! ```text
//! x_vs = mu + eta_s + eps_vs,   eta_s ~ N(0, sigma1²),  eps_vs ~ N(0, sigma2²)
//! ```
//!
//! where `v` ranges over the parcel's vertices and `s` over subjects. The
//! subject effect `eta_s` is shared by all vertices of the parcel, giving a
//! compound-symmetry covariance within each subject. Parameters are
//! estimated by EM; the marginal log-likelihood is evaluated exactly via the
//! within/between decomposition of the balanced design.
//!
//! Reference:
//! Thirion et al., "Which fMRI clustering gives good brain parcellations?",
//! Front. Neurosci. 2014.

use ndarray::{Array1, ArrayView2};
use tracing::trace;

use super::{ParcelFit, ParcelModel};
use crate::error::ModelError;

/// EM mixed-effects model fitter
///
/// Fit one instance per analysis; the same configuration is applied to
/// every parcel of every contrast slice.
#[derive(Debug, Clone)]
pub struct MixedEffects {
    /// Maximum EM iterations per parcel
    pub max_iter: usize,
    /// Convergence tolerance on the log-likelihood change
    pub tol: f64,
    /// Lower bound applied to both variance components
    pub var_floor: f64,
}

impl Default for MixedEffects {
    fn default() -> Self {
        MixedEffects {
            max_iter: 100,
            tol: 1e-8,
            var_floor: 1e-10,
        }
    }
}

/// Sufficient statistics for one parcel of one contrast slice
///
/// The balanced design makes subject means and the pooled within-subject
/// sum of squares sufficient for the EM updates and the exact likelihood.
struct ParcelStats {
    n_vertices: usize,
    n_subjects: usize,
    /// Mean over the parcel's vertices, per subject
    subject_means: Vec<f64>,
    /// Sum over subjects of the within-subject sum of squares
    ss_within: f64,
}

/// Fitted parameters for one parcel
struct ParcelParams {
    log_likelihood: f64,
    mu: f64,
    sigma1_sq: f64,
    sigma2_sq: f64,
}

impl MixedEffects {
    fn fit_parcel(&self, stats: &ParcelStats, null: bool) -> ParcelParams {
        let n_v = stats.n_vertices as f64;
        let n_s = stats.n_subjects as f64;
        let means = &stats.subject_means;

        let grand = means.iter().sum::<f64>() / n_s;
        let mut mu = if null { 0.0 } else { grand };

        // Initialize from the method-of-moments decomposition
        let between: f64 =
            means.iter().map(|&m| (m - mu) * (m - mu)).sum::<f64>() / n_s;
        let mut sigma2_sq = if stats.n_vertices > 1 {
            (stats.ss_within / (n_s * (n_v - 1.0))).max(self.var_floor)
        } else {
            // Single vertex: within/between split is unidentifiable, start
            // from an even split of the total variance
            (between / 2.0).max(self.var_floor)
        };
        let mut sigma1_sq = (between - sigma2_sq / n_v).max(self.var_floor);

        let mut ll = log_likelihood(stats, mu, sigma1_sq, sigma2_sq);

        for iter in 0..self.max_iter {
            // E-step: posterior mean and variance of each subject effect
            let shrink = sigma1_sq / (sigma1_sq + sigma2_sq / n_v);
            let v_post = shrink * sigma2_sq / n_v;
            let e: Vec<f64> = means.iter().map(|&m| shrink * (m - mu)).collect();

            // M-step
            if !null {
                mu = means
                    .iter()
                    .zip(&e)
                    .map(|(&m, &e_s)| m - e_s)
                    .sum::<f64>()
                    / n_s;
            }
            sigma1_sq = (e.iter().map(|&e_s| e_s * e_s).sum::<f64>() / n_s
                + v_post)
                .max(self.var_floor);

            let resid: f64 = means
                .iter()
                .zip(&e)
                .map(|(&m, &e_s)| {
                    let d = m - mu - e_s;
                    n_v * (d * d + v_post)
                })
                .sum();
            sigma2_sq = ((stats.ss_within + resid) / (n_v * n_s)).max(self.var_floor);

            let ll_new = log_likelihood(stats, mu, sigma1_sq, sigma2_sq);
            let delta = (ll_new - ll).abs();
            ll = ll_new;
            if delta < self.tol {
                trace!(iter, ll, "EM converged");
                break;
            }
        }

        ParcelParams {
            log_likelihood: ll,
            mu,
            sigma1_sq,
            sigma2_sq,
        }
    }
}

/// Exact marginal log-likelihood under compound symmetry
///
/// Per subject, the parcel's vertex vector is N(mu·1, sigma2²·I + sigma1²·J);
/// its density factors into the within-subject scatter and the subject mean:
///
/// ```text
/// -2·ll_s = n_v·ln(2π) + (n_v-1)·ln(σ2²) + ln(σ2² + n_v·σ1²)
///           + SS_w(s)/σ2² + n_v·(x̄_s - mu)² / (σ2² + n_v·σ1²)
/// ```
fn log_likelihood(stats: &ParcelStats, mu: f64, sigma1_sq: f64, sigma2_sq: f64) -> f64 {
    let n_v = stats.n_vertices as f64;
    let n_s = stats.n_subjects as f64;
    let var_mean = sigma2_sq + n_v * sigma1_sq;

    let between: f64 = stats
        .subject_means
        .iter()
        .map(|&m| (m - mu) * (m - mu))
        .sum();

    -0.5 * (n_v * n_s * (2.0 * std::f64::consts::PI).ln()
        + n_s * (n_v - 1.0) * sigma2_sq.ln()
        + n_s * var_mean.ln()
        + stats.ss_within / sigma2_sq
        + n_v * between / var_mean)
}

/// Gather per-parcel sufficient statistics from one contrast slice
fn collect_stats(
    data: ArrayView2<f64>,
    parcels: &[usize],
) -> Result<Vec<ParcelStats>, ModelError> {
    let n_vertices = data.nrows();
    let n_subjects = data.ncols();

    if parcels.len() != n_vertices {
        return Err(ModelError::ShapeMismatch {
            vertices: n_vertices,
            labels: parcels.len(),
        });
    }

    let n_parcels = parcels.iter().max().map_or(0, |&m| m + 1);
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); n_parcels];
    for (v, &p) in parcels.iter().enumerate() {
        members[p].push(v);
    }
    if let Some(p) = members.iter().position(|m| m.is_empty()) {
        return Err(ModelError::EmptyParcel { parcel: p });
    }

    let mut stats = Vec::with_capacity(n_parcels);
    for vertices in &members {
        let n_v = vertices.len() as f64;
        let mut subject_means = vec![0.0; n_subjects];
        let mut ss_within = 0.0;

        for s in 0..n_subjects {
            let mut sum = 0.0;
            for &v in vertices {
                sum += data[[v, s]];
            }
            subject_means[s] = sum / n_v;
        }
        for s in 0..n_subjects {
            let mean = subject_means[s];
            for &v in vertices {
                let d = data[[v, s]] - mean;
                ss_within += d * d;
            }
        }

        stats.push(ParcelStats {
            n_vertices: vertices.len(),
            n_subjects,
            subject_means,
            ss_within,
        });
    }
    Ok(stats)
}

impl ParcelModel for MixedEffects {
    fn parameter_map(
        &self,
        data: ArrayView2<f64>,
        parcels: &[usize],
        null: bool,
    ) -> Result<ParcelFit, ModelError> {
        let stats = collect_stats(data, parcels)?;
        let n_parcels = stats.len();

        // mu and both variances under the alternative, mu pinned at 0
        // under the null
        let n_params = if null { 2.0 } else { 3.0 };

        let mut log_likelihood = Array1::zeros(n_parcels);
        let mut mu = Array1::zeros(n_parcels);
        let mut sigma1 = Array1::zeros(n_parcels);
        let mut sigma2 = Array1::zeros(n_parcels);
        let mut bic = Array1::zeros(n_parcels);

        for (p, parcel_stats) in stats.iter().enumerate() {
            let params = self.fit_parcel(parcel_stats, null);
            let n_obs =
                (parcel_stats.n_vertices * parcel_stats.n_subjects) as f64;

            log_likelihood[p] = params.log_likelihood;
            mu[p] = params.mu;
            sigma1[p] = params.sigma1_sq.sqrt();
            sigma2[p] = params.sigma2_sq.sqrt();
            bic[p] = -2.0 * params.log_likelihood + n_params * n_obs.ln();
        }

        Ok(ParcelFit {
            log_likelihood,
            mu,
            sigma1,
            sigma2,
            bic,
        })
    }
}
