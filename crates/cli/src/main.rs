use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use polyproj::api::{chebyshev_center, project_polygon_default, DenseSimplex, ProjectionCfg};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

mod problem;
mod provenance;

use problem::{ProblemJson, VerticesJson};
use provenance::{current_git_rev, write_sidecar, InputDigest, Record};

#[derive(Parser)]
#[command(name = "polyproj")]
#[command(about = "2D projections of convex polyhedra")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Project a problem file and write the polygon vertices as JSON
    Project {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        cfg: CfgArgs,
    },
    /// Print the Chebyshev center of the inequality block of a problem file
    Chebyshev {
        #[arg(long)]
        input: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

/// Overrides for `ProjectionCfg`; unset flags keep the library defaults.
#[derive(Args, Debug, Default)]
struct CfgArgs {
    #[arg(long)]
    max_radius: Option<f64>,
    #[arg(long)]
    max_iter: Option<usize>,
    /// First query direction in radians
    #[arg(long)]
    init_angle: Option<f64>,
    #[arg(long)]
    min_dist: Option<f64>,
    #[arg(long)]
    distinct_eps: Option<f64>,
    #[arg(long)]
    tight_eps: Option<f64>,
    /// Accept systems without equality constraints
    #[arg(long)]
    allow_missing_eq: bool,
    #[arg(long)]
    seed: Option<u64>,
}

impl CfgArgs {
    fn resolve(&self) -> ProjectionCfg {
        let d = ProjectionCfg::default();
        ProjectionCfg {
            max_radius: self.max_radius.unwrap_or(d.max_radius),
            max_iter: self.max_iter.unwrap_or(d.max_iter),
            init_angle: self.init_angle.or(d.init_angle),
            min_dist: self.min_dist.unwrap_or(d.min_dist),
            distinct_eps: self.distinct_eps.unwrap_or(d.distinct_eps),
            tight_eps: self.tight_eps.unwrap_or(d.tight_eps),
            require_equalities: !self.allow_missing_eq,
            seed: self.seed.or(d.seed),
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Project { input, out, cfg } => project(&input, &out, &cfg.resolve()),
        Action::Chebyshev { input } => chebyshev(&input),
        Action::Report => report(),
    }
}

fn project(input: &Path, out: &Path, cfg: &ProjectionCfg) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), "project");
    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let problem = ProblemJson::parse(input, &bytes)?;
    let digest = InputDigest::new(input, &bytes, problem.shape()?);
    let system = problem.system()?;
    let proj = problem.projection()?;
    let res = project_polygon_default(&system, &proj, cfg)
        .with_context(|| format!("projecting {}", input.display()))?;
    if !res.is_complete() {
        tracing::warn!(max_iter = cfg.max_iter, "budget exhausted; polygon is an inner approximation");
    }

    let doc = VerticesJson {
        vertices: res.vertices.iter().map(|p| [p.x, p.y]).collect(),
        complete: res.is_complete(),
        iterations: res.iterations,
        queries: res.queries,
        failed_queries: res.failed_queries,
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let record = Record {
        input: digest,
        params: json!({
            "max_radius": cfg.max_radius,
            "max_iter": cfg.max_iter,
            "init_angle": cfg.init_angle,
            "min_dist": cfg.min_dist,
            "distinct_eps": cfg.distinct_eps,
            "tight_eps": cfg.tight_eps,
            "require_equalities": cfg.require_equalities,
            "seed": cfg.seed,
        }),
        summary: json!({
            "vertices": doc.vertices.len(),
            "complete": doc.complete,
            "queries": doc.queries,
            "failed_queries": doc.failed_queries,
        }),
    };
    let sidecar = write_sidecar(out, &record)?;
    tracing::info!(vertices = doc.vertices.len(), sidecar = %sidecar.display(), "wrote");
    Ok(())
}

fn chebyshev(input: &Path) -> Result<()> {
    let problem = ProblemJson::read(input)?;
    let ineq = problem.inequalities()?;
    let ball = chebyshev_center(&ineq, DenseSimplex::default())
        .with_context(|| format!("chebyshev center of {}", input.display()))?;
    let obj = json!({
        "center": ball.center.as_slice(),
        "radius": ball.radius,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": current_git_rev(),
        "polyproj_version": polyproj::VERSION,
        "defaults": {
            "max_radius": ProjectionCfg::default().max_radius,
            "max_iter": ProjectionCfg::default().max_iter,
            "min_dist": ProjectionCfg::default().min_dist,
        },
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn unset_flags_keep_defaults() {
        let cfg = CfgArgs::default().resolve();
        let d = ProjectionCfg::default();
        assert_eq!(cfg.max_iter, d.max_iter);
        assert_eq!(cfg.max_radius, d.max_radius);
        assert!(cfg.require_equalities);

        let args = Cmd::parse_from([
            "polyproj", "project", "--input", "p.json", "--out", "o.json", "--max-iter", "7",
            "--allow-missing-eq",
        ]);
        let Action::Project { cfg, .. } = args.action else {
            panic!("expected project");
        };
        let cfg = cfg.resolve();
        assert_eq!(cfg.max_iter, 7);
        assert!(!cfg.require_equalities);
    }

    #[test]
    fn project_writes_vertices_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("square.json");
        std::fs::write(
            &input,
            serde_json::to_vec(&json!({
                "ineq": {"a": [[1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, -1.0, 0.0]],
                         "b": [1.0, 1.0, 1.0, 1.0]},
                "eq": {"c": [[1.0, 1.0, -1.0]], "d": [0.0]},
                "proj": {"e": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]], "f": [0.0, 0.0]}
            }))
            .unwrap(),
        )
        .unwrap();
        let out = dir.path().join("out").join("square_vertices.json");
        let cfg = ProjectionCfg {
            seed: Some(1),
            ..Default::default()
        };
        project(&input, &out, &cfg).unwrap();

        let doc: Value = serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(doc["vertices"].as_array().unwrap().len(), 4);
        assert_eq!(doc["complete"], true);
        let sidecar = dir.path().join("out").join("square_vertices.provenance.json");
        let prov: Value = serde_json::from_slice(&std::fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(prov["params"]["seed"], 1);
        assert_eq!(prov["input"]["shape"], json!([3, 4, 1]));
        assert_eq!(prov["summary"]["vertices"], 4);
    }

    #[test]
    fn project_surfaces_library_errors() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.json");
        std::fs::write(
            &input,
            r#"{"ineq": {"a": [[1.0]], "b": [1.0]},
                "proj": {"e": [[1.0], [1.0], [1.0]], "f": [0.0, 0.0, 0.0]}}"#,
        )
        .unwrap();
        let err = project(&input, &dir.path().join("o.json"), &ProjectionCfg::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("projection must map to 2D"), "{err:#}");
    }
}
