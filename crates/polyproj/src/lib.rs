//! 2D projections of convex polyhedra by direction queries.
//!
//! Given `{x : A x <= b, C x = d}` and an affine map `y = E x + f` onto the
//! plane, the expanding-polygon method recovers the projected polygon by
//! repeatedly asking an LP for the support point in a direction and pushing out
//! edges until all of them are tight.
//!
//! Layout
//! - `system`: constraint blocks, the 2D projection, the extended LP system.
//! - `lp`: solver seam (`LpSolver`) and the in-tree dense simplex.
//! - `oracle`: support-point queries over an extended system.
//! - `polygon`: vertex cycle, bootstrap, expansion, output ordering.
//! - `project`: the front door tying these together.
//! - `polyhedron`: Chebyshev center via the same LP seam.
//!
//! References
//! - T. Bretl and S. Lall, "Testing Static Equilibrium for Legged Robots",
//!   IEEE Transactions on Robotics, 2008.

pub mod api;
pub mod cfg;
pub mod error;
pub mod lp;
pub mod oracle;
pub mod polygon;
pub mod polyhedron;
pub mod project;
pub mod system;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::ProjectionCfg;
pub use error::{LpError, ProjectionError};
pub use project::{project_polygon, project_polygon_default, PolygonProjection};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::ProjectionCfg;
    pub use crate::error::{LpError, ProjectionError};
    pub use crate::lp::{DenseSimplex, LpSolver};
    pub use crate::project::{project_polygon, project_polygon_default, PolygonProjection};
    pub use crate::system::{AffineProjection, ConstraintSystem, Equalities, Inequalities};
    pub use nalgebra::Vector2 as Vec2;
}
