//! Dense two-phase simplex (Bland's rule).
//!
//! Standard form used internally
//! - Free variables are split `x = x⁺ − x⁻`, every inequality row gets a slack,
//!   and rows whose natural slack cannot start basic (negative `h_i`, or any
//!   equality row) get an artificial column.
//! - Phase 1 minimizes the sum of artificials; phase 2 minimizes the real cost
//!   with artificial columns barred from entering.
//! - Bland's rule (smallest eligible index for entering and leaving) makes the
//!   method terminate on degenerate vertices, which projection LPs hit often.
//!
//! Columns: `[x⁺ (n) | x⁻ (n) | slack (p) | artificial (k) | rhs]`.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use super::{LinearProgram, LpSolver};
use crate::error::LpError;

/// Tolerances and limits of the dense simplex.
#[derive(Clone, Copy, Debug)]
pub struct SimplexCfg {
    /// Magnitude below which a tableau entry or reduced cost counts as zero.
    pub eps_pivot: f64,
    /// Phase-1 residual tolerated as feasible, relative to the largest
    /// right-hand side among rows that carry an artificial.
    pub eps_feas: f64,
    pub max_pivots: usize,
}

impl Default for SimplexCfg {
    fn default() -> Self {
        Self {
            eps_pivot: 1e-9,
            eps_feas: 1e-7,
            max_pivots: 50_000,
        }
    }
}

/// In-tree LP solver over dense tableaus.
#[derive(Clone, Debug, Default)]
pub struct DenseSimplex {
    pub cfg: SimplexCfg,
}

impl DenseSimplex {
    #[inline]
    pub fn new(cfg: SimplexCfg) -> Self {
        Self { cfg }
    }
}

impl LpSolver for DenseSimplex {
    fn solve(&mut self, lp: &LinearProgram<'_>) -> Result<DVector<f64>, LpError> {
        lp.check_shape()?;
        let n = lp.dim();
        let mut tab = Tableau::build(lp);
        let mut pivots = 0usize;

        let phase1: Vec<f64> = (0..tab.ncols)
            .map(|j| if j >= tab.art_start { 1.0 } else { 0.0 })
            .collect();
        tab.run(&phase1, tab.ncols, &self.cfg, &mut pivots)?;
        let residual = tab.objective(&phase1);
        if residual > self.cfg.eps_feas * (1.0 + tab.art_scale) {
            trace!(residual, "phase 1 left artificials positive");
            return Err(LpError::Infeasible);
        }
        tab.drive_out_artificials(self.cfg.eps_pivot);

        let mut phase2 = vec![0.0; tab.ncols];
        for j in 0..n {
            phase2[j] = lp.cost[j];
            phase2[n + j] = -lp.cost[j];
        }
        let allowed = tab.art_start;
        tab.run(&phase2, allowed, &self.cfg, &mut pivots)?;
        trace!(pivots, "simplex optimal");

        let values = tab.column_values();
        Ok(DVector::from_fn(n, |j, _| values[j] - values[n + j]))
    }
}

struct Tableau {
    /// `m × (ncols + 1)`; the last column holds the right-hand side.
    t: DMatrix<f64>,
    basis: Vec<usize>,
    basic: Vec<bool>,
    ncols: usize,
    art_start: usize,
    /// Largest |rhs| over rows that start with an artificial; rows whose slack
    /// is basic from the start (such as the `±R` box) never contribute.
    art_scale: f64,
}

impl Tableau {
    fn build(lp: &LinearProgram<'_>) -> Self {
        let n = lp.dim();
        let p = lp.g.nrows();
        let q = lp.eq.map_or(0, |(a, _)| a.nrows());
        let m = p + q;
        let k = lp.h.iter().filter(|&&hi| hi < 0.0).count() + q;
        let art_start = 2 * n + p;
        let ncols = art_start + k;
        let rhs = ncols;

        let mut t = DMatrix::zeros(m, ncols + 1);
        let mut basis = vec![0usize; m];
        let mut art = art_start;
        let mut art_scale: f64 = 0.0;

        for i in 0..p {
            let sign = if lp.h[i] < 0.0 { -1.0 } else { 1.0 };
            for j in 0..n {
                t[(i, j)] = sign * lp.g[(i, j)];
                t[(i, n + j)] = -sign * lp.g[(i, j)];
            }
            t[(i, 2 * n + i)] = sign;
            t[(i, rhs)] = sign * lp.h[i];
            if sign < 0.0 {
                art_scale = art_scale.max(-lp.h[i]);
                t[(i, art)] = 1.0;
                basis[i] = art;
                art += 1;
            } else {
                basis[i] = 2 * n + i;
            }
        }
        if let Some((a, b)) = lp.eq {
            for r in 0..q {
                let i = p + r;
                let sign = if b[r] < 0.0 { -1.0 } else { 1.0 };
                for j in 0..n {
                    t[(i, j)] = sign * a[(r, j)];
                    t[(i, n + j)] = -sign * a[(r, j)];
                }
                t[(i, rhs)] = sign * b[r];
                art_scale = art_scale.max(b[r].abs());
                t[(i, art)] = 1.0;
                basis[i] = art;
                art += 1;
            }
        }
        debug_assert_eq!(art, ncols);

        let mut basic = vec![false; ncols];
        for &b in &basis {
            basic[b] = true;
        }
        Self {
            t,
            basis,
            basic,
            ncols,
            art_start,
            art_scale,
        }
    }

    #[inline]
    fn rows(&self) -> usize {
        self.basis.len()
    }

    fn reduced_cost(&self, cost: &[f64], j: usize) -> f64 {
        let mut r = cost[j];
        for i in 0..self.rows() {
            r -= cost[self.basis[i]] * self.t[(i, j)];
        }
        r
    }

    fn objective(&self, cost: &[f64]) -> f64 {
        (0..self.rows())
            .map(|i| cost[self.basis[i]] * self.t[(i, self.ncols)])
            .sum()
    }

    /// Simplex iterations over columns `0..allowed` until optimal.
    fn run(
        &mut self,
        cost: &[f64],
        allowed: usize,
        cfg: &SimplexCfg,
        pivots: &mut usize,
    ) -> Result<(), LpError> {
        let rhs = self.ncols;
        loop {
            if *pivots >= cfg.max_pivots {
                return Err(LpError::IterationLimit { iters: *pivots });
            }
            let entering = (0..allowed)
                .filter(|&j| !self.basic[j])
                .find(|&j| self.reduced_cost(cost, j) < -cfg.eps_pivot);
            let Some(col) = entering else {
                return Ok(());
            };

            let mut leave: Option<(usize, f64)> = None;
            for i in 0..self.rows() {
                let a = self.t[(i, col)];
                if a <= cfg.eps_pivot {
                    continue;
                }
                let ratio = self.t[(i, rhs)] / a;
                leave = match leave {
                    None => Some((i, ratio)),
                    Some((li, lr)) => {
                        let tie = (ratio - lr).abs() <= cfg.eps_pivot;
                        if ratio < lr - cfg.eps_pivot || (tie && self.basis[i] < self.basis[li]) {
                            Some((i, ratio))
                        } else {
                            Some((li, lr))
                        }
                    }
                };
            }
            let Some((row, _)) = leave else {
                return Err(LpError::Unbounded);
            };
            self.pivot(row, col);
            *pivots += 1;
        }
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let width = self.ncols + 1;
        let piv = self.t[(row, col)];
        for k in 0..width {
            self.t[(row, k)] /= piv;
        }
        let prow: Vec<f64> = (0..width).map(|k| self.t[(row, k)]).collect();
        for i in 0..self.rows() {
            if i == row {
                continue;
            }
            let f = self.t[(i, col)];
            if f == 0.0 {
                continue;
            }
            for (k, pk) in prow.iter().enumerate() {
                self.t[(i, k)] -= f * pk;
            }
        }
        self.basic[self.basis[row]] = false;
        self.basis[row] = col;
        self.basic[col] = true;
    }

    /// After phase 1, swap zero-valued artificials out of the basis where possible.
    /// Rows with no usable column are redundant and keep their artificial at zero.
    fn drive_out_artificials(&mut self, eps: f64) {
        for i in 0..self.rows() {
            if self.basis[i] < self.art_start {
                continue;
            }
            let replacement =
                (0..self.art_start).find(|&j| !self.basic[j] && self.t[(i, j)].abs() > eps);
            if let Some(j) = replacement {
                self.pivot(i, j);
            }
        }
    }

    fn column_values(&self) -> Vec<f64> {
        let mut values = vec![0.0; self.ncols];
        for (i, &b) in self.basis.iter().enumerate() {
            values[b] = self.t[(i, self.ncols)];
        }
        values
    }
}
