//! Linear programming seam.
//!
//! Purpose
//! - Every directional query of the expanding-polygon method is one LP solve
//!   over a fixed constraint set with a varying cost. The solver is a trait so
//!   the projection stays independent of how LPs are solved.
//! - `DenseSimplex` is the in-tree implementation: small, dense, deterministic.
//!
//! Problem form
//! - minimize `cost · x` subject to `G x <= h` and (optionally) `A x = b`,
//!   with `x` free (no sign constraints).

mod simplex;

pub use simplex::{DenseSimplex, SimplexCfg};

use nalgebra::{DMatrix, DVector};

use crate::error::LpError;

/// Borrowed view of one linear program.
#[derive(Clone, Copy, Debug)]
pub struct LinearProgram<'a> {
    pub cost: &'a DVector<f64>,
    pub g: &'a DMatrix<f64>,
    pub h: &'a DVector<f64>,
    pub eq: Option<(&'a DMatrix<f64>, &'a DVector<f64>)>,
}

impl<'a> LinearProgram<'a> {
    /// Number of decision variables.
    #[inline]
    pub fn dim(&self) -> usize {
        self.cost.len()
    }

    /// Check that all blocks agree on the variable count and row counts.
    pub fn check_shape(&self) -> Result<(), LpError> {
        let n = self.dim();
        if self.g.ncols() != n {
            return Err(LpError::Shape(format!(
                "G has {} columns, cost has {} entries",
                self.g.ncols(),
                n
            )));
        }
        if self.g.nrows() != self.h.len() {
            return Err(LpError::Shape(format!(
                "G has {} rows, h has {} entries",
                self.g.nrows(),
                self.h.len()
            )));
        }
        if let Some((a, b)) = self.eq {
            if a.ncols() != n {
                return Err(LpError::Shape(format!(
                    "A has {} columns, cost has {} entries",
                    a.ncols(),
                    n
                )));
            }
            if a.nrows() != b.len() {
                return Err(LpError::Shape(format!(
                    "A has {} rows, b has {} entries",
                    a.nrows(),
                    b.len()
                )));
            }
        }
        Ok(())
    }
}

/// Linear-program solver contract.
///
/// Returns an optimal solution vector of length `lp.dim()`, or fails with
/// `Infeasible` / `Unbounded` when no optimum exists.
pub trait LpSolver {
    fn solve(&mut self, lp: &LinearProgram<'_>) -> Result<DVector<f64>, LpError>;
}

impl<S: LpSolver + ?Sized> LpSolver for &mut S {
    #[inline]
    fn solve(&mut self, lp: &LinearProgram<'_>) -> Result<DVector<f64>, LpError> {
        (**self).solve(lp)
    }
}

/// Solve one LP with the default dense simplex.
pub fn solve_lp(
    cost: &DVector<f64>,
    g: &DMatrix<f64>,
    h: &DVector<f64>,
    eq: Option<(&DMatrix<f64>, &DVector<f64>)>,
) -> Result<DVector<f64>, LpError> {
    DenseSimplex::default().solve(&LinearProgram { cost, g, h, eq })
}
