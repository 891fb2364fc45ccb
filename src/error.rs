//! Error types for the live-wire core.

use crate::image::Pixel;

/// Errors reported by feature extraction, the shortest-path search and path
/// extraction.
///
/// Zero-length gradient vectors are not an error: the direction term of the
/// local cost is defined as 0 for flat regions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiveWireError {
    /// Image missing, zero-sized, smaller than 3x3, or with a malformed buffer.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// A path was requested before any seed point was set.
    #[error("no seed point has been set")]
    SeedNotSet,

    /// Seed or query coordinates outside `[0, width) x [0, height)`.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A link cost was requested for two pixels that are not 8-connected.
    #[error("pixels {from} and {to} are not 8-connected neighbors")]
    NotNeighbors { from: Pixel, to: Pixel },

    /// The query pixel was never reached by the search.
    #[error("no path to pixel ({x}, {y})")]
    NoPath { x: usize, y: usize },

    /// The search was interrupted through its cancellation flag.
    #[error("live-wire search was cancelled")]
    Cancelled,

    /// A scissors session operation that does not fit its current state.
    #[error("invalid session state: {0}")]
    InvalidSession(&'static str),

    /// Cost weights are negative, non-finite or do not sum to 1.
    #[error("invalid cost weights: {0}")]
    InvalidWeights(String),

    /// The pointer tree is corrupt (cycle or dangling pointer). Always a bug.
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LiveWireError>;
