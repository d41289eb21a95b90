//! Error types for projection requests and the LP seam.
//!
//! - `LpError`: what a linear-program solver may report for one solve.
//! - `ProjectionError`: request-level failures of a projection (or of the
//!   Chebyshev-center helper). Budget exhaustion is not an error; see
//!   `polygon::ExpansionStatus`.

use thiserror::Error;

/// Failure of a single linear-program solve.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LpError {
    #[error("linear program is infeasible")]
    Infeasible,

    #[error("linear program is unbounded")]
    Unbounded,

    #[error("simplex iteration limit reached after {iters} pivots")]
    IterationLimit { iters: usize },

    #[error("inconsistent linear program shape: {0}")]
    Shape(String),
}

/// Request-level failure of a projection.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ProjectionError {
    /// The projection map must have exactly two output rows (`E` is 2×n, `f` has length 2).
    #[error("projection must map to 2D (E has {rows} rows, f has length {offset_len})")]
    InvalidProjectionShape { rows: usize, offset_len: usize },

    #[error("dimension mismatch for {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("expanding-polygon projection requires equality constraints")]
    MissingEqualityConstraints,

    /// Bootstrap could not find three distinct support points.
    #[error("problem is not linearly feasible (found {found} distinct bootstrap points)")]
    NotLinearlyFeasible { found: usize },

    #[error("direction query ({}, {}) failed: {source}", .direction.0, .direction.1)]
    InfeasibleDirection {
        direction: (f64, f64),
        #[source]
        source: LpError,
    },

    /// A successor link is dangling or the cycle does not close.
    #[error("vertex cycle is malformed at vertex {vertex}")]
    DegenerateCycle { vertex: usize },

    #[error("polyhedron is empty (margin violation {margin:.2})")]
    EmptyPolyhedron { margin: f64 },

    #[error(transparent)]
    Lp(#[from] LpError),
}
