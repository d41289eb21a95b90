//! Problem files: JSON on disk, nalgebra matrices in memory.
//!
//! Format
//! - `{"ineq": {"a": [[..]], "b": [..]}, "eq": {"c": [[..]], "d": [..]}, "proj": {"e": [[..], [..]], "f": [..]}}`
//! - `eq` is optional. Matrices are row-major lists of rows.

use anyhow::{bail, Context, Result};
use nalgebra::{DMatrix, DVector};
use polyproj::api::{AffineProjection, ConstraintSystem, Equalities, Inequalities};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IneqJson {
    pub a: Vec<Vec<f64>>,
    pub b: Vec<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EqJson {
    pub c: Vec<Vec<f64>>,
    pub d: Vec<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProjJson {
    pub e: Vec<Vec<f64>>,
    pub f: Vec<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ProblemJson {
    pub ineq: IneqJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<EqJson>,
    pub proj: ProjJson,
}

/// Output document of `project`.
#[derive(Clone, Debug, Serialize)]
pub struct VerticesJson {
    pub vertices: Vec<[f64; 2]>,
    pub complete: bool,
    pub iterations: usize,
    pub queries: usize,
    pub failed_queries: usize,
}

/// Dense matrix from rows; `cols` is used when there are no rows.
fn matrix(rows: &[Vec<f64>], cols: usize, what: &str) -> Result<DMatrix<f64>> {
    if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
        bail!(
            "{what}: row {bad} has {} entries, expected {cols}",
            rows[bad].len()
        );
    }
    Ok(DMatrix::from_fn(rows.len(), cols, |i, j| rows[i][j]))
}

impl ProblemJson {
    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(path, &bytes)
    }

    /// Parse file contents; `path` only labels errors.
    pub fn parse(path: &Path, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).with_context(|| format!("parsing {}", path.display()))
    }

    /// `[n, inequality rows, equality rows]`.
    pub fn shape(&self) -> Result<[usize; 3]> {
        let p = self.eq.as_ref().map_or(0, |eq| eq.c.len());
        Ok([self.dim()?, self.ineq.a.len(), p])
    }

    /// Column count, taken from the first available matrix row.
    fn dim(&self) -> Result<usize> {
        self.ineq
            .a
            .first()
            .or_else(|| self.proj.e.first())
            .map(Vec::len)
            .context("cannot infer dimension: no inequality rows and no projection rows")
    }

    pub fn inequalities(&self) -> Result<Inequalities> {
        let n = self.dim()?;
        let a = matrix(&self.ineq.a, n, "ineq.a")?;
        Ok(Inequalities::new(a, DVector::from_column_slice(&self.ineq.b))?)
    }

    pub fn system(&self) -> Result<ConstraintSystem> {
        let n = self.dim()?;
        let eq = match &self.eq {
            Some(eq) => Some(Equalities::new(
                matrix(&eq.c, n, "eq.c")?,
                DVector::from_column_slice(&eq.d),
            )?),
            None => None,
        };
        Ok(ConstraintSystem::new(self.inequalities()?, eq)?)
    }

    /// The map is taken as given; a wrong row count is reported by the projection itself.
    pub fn projection(&self) -> Result<AffineProjection> {
        let n = self.dim()?;
        Ok(AffineProjection {
            e: matrix(&self.proj.e, n, "proj.e")?,
            f: DVector::from_column_slice(&self.proj.f),
        })
    }
}
