//! Projection configuration and tolerance defaults.
//!
//! Policy
//! - Defaults reproduce the reference behavior of the expanding-polygon method
//!   (radius 1e5, 1000 LP calls, 1e-2 output spacing). Tolerances are fields so
//!   experiments can vary them without touching call sites.

use crate::error::ProjectionError;

/// Bootstrap points closer than this are considered the same point.
pub const DISTINCT_EPS: f64 = 1e-5;
/// Edge tightness threshold on the cross product `(z − v) × (v − v.next)`.
pub const TIGHT_EPS: f64 = 1e-4;

/// Parameters of one projection request.
#[derive(Clone, Copy, Debug)]
pub struct ProjectionCfg {
    /// Half-width `R` of the synthetic box `|u|, |v| <= R` bounding the search.
    /// Must exceed the true extent of the projection, otherwise the output is clipped.
    pub max_radius: f64,
    /// Budget of LP calls shared by bootstrap and expansion.
    pub max_iter: usize,
    /// Direction (radians) of the first query; drawn in `[0, π)` when `None`.
    pub init_angle: Option<f64>,
    /// Minimum spacing between consecutive output vertices.
    pub min_dist: f64,
    pub distinct_eps: f64,
    pub tight_eps: f64,
    /// Reject systems without an equality block before any solver call.
    pub require_equalities: bool,
    /// Seed for the bootstrap perturbation when the caller does not inject an RNG.
    pub seed: Option<u64>,
}

impl Default for ProjectionCfg {
    fn default() -> Self {
        Self {
            max_radius: 1e5,
            max_iter: 1000,
            init_angle: None,
            min_dist: 1e-2,
            distinct_eps: DISTINCT_EPS,
            tight_eps: TIGHT_EPS,
            require_equalities: true,
            seed: None,
        }
    }
}

impl ProjectionCfg {
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if !(self.max_radius.is_finite() && self.max_radius > 0.0) {
            return Err(ProjectionError::InvalidConfig(format!(
                "max_radius must be finite and > 0, got {}",
                self.max_radius
            )));
        }
        if let Some(theta) = self.init_angle {
            if !theta.is_finite() {
                return Err(ProjectionError::InvalidConfig(
                    "init_angle must be finite".into(),
                ));
            }
        }
        for (name, v) in [
            ("min_dist", self.min_dist),
            ("distinct_eps", self.distinct_eps),
            ("tight_eps", self.tight_eps),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(ProjectionError::InvalidConfig(format!(
                    "{name} must be finite and >= 0, got {v}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = ProjectionCfg::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_iter, 1000);
        assert!(cfg.require_equalities);
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = ProjectionCfg {
            max_radius: -1.0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(ProjectionError::InvalidConfig(_))));
        let cfg = ProjectionCfg {
            min_dist: f64::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = ProjectionCfg {
            init_angle: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
