//! Error types for model fitting and label handling

use thiserror::Error;

/// Errors raised while fitting the per-parcel model or normalizing labels.
///
/// The BIC aggregator performs no validation of its own; every failure it
/// reports originates here and aborts the whole aggregation.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The label array and the contrast slice disagree on the vertex count.
    #[error("parcel labels cover {labels} vertices but contrast data has {vertices}")]
    ShapeMismatch { vertices: usize, labels: usize },

    /// A label in `0..=max` has no vertices. Labels must be contiguous from
    /// zero; survey parcellations left one-based typically trip this on
    /// parcel 0.
    #[error("parcel {parcel} has no vertices (labels must be contiguous from 0)")]
    EmptyParcel { parcel: usize },

    /// A zero label was found where one-based labels were expected.
    #[error("label 0 at vertex {vertex} in a one-based parcellation")]
    ZeroLabel { vertex: usize },
}
