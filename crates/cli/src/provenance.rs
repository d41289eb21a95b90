//! Sidecar records for `project` outputs.
//!
//! Each vertices file `out/<stem>.json` gets `out/<stem>.provenance.json` with
//! the code revision, the input problem (path, size, fingerprint, shape), the
//! resolved projection parameters, and a summary of the result.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::hash_map::DefaultHasher;
use std::ffi::OsString;
use std::fs;
use std::hash::Hasher;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Identity of the problem file a result was computed from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InputDigest {
    pub path: String,
    pub bytes: usize,
    /// Hex fingerprint of the raw file contents (not cryptographic).
    pub fingerprint: String,
    /// `[n, inequality rows, equality rows]`.
    pub shape: [usize; 3],
}

impl InputDigest {
    pub fn new(path: &Path, contents: &[u8], shape: [usize; 3]) -> Self {
        let mut h = DefaultHasher::new();
        h.write(contents);
        Self {
            path: path.to_string_lossy().into_owned(),
            bytes: contents.len(),
            fingerprint: format!("{:016x}", h.finish()),
            shape,
        }
    }
}

/// Contents of one sidecar apart from code revision and callsite.
pub struct Record {
    pub input: InputDigest,
    pub params: Value,
    pub summary: Value,
}

/// Write the sidecar for `artifact` and return its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, record: &Record) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let sidecar = sidecar_path(artifact);
    if let Some(dir) = sidecar.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let at = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "polyproj_version": polyproj::VERSION,
        "callsite": format!("{}:{}", at.file(), at.line()),
        "input": record.input,
        "params": record.params,
        "summary": record.summary,
        "output": artifact.to_string_lossy(),
    });
    fs::write(&sidecar, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", sidecar.display()))?;
    Ok(sidecar)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("vertices"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Commit hash from `GIT_COMMIT` (build time, then run time) or `git rev-parse HEAD`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    if let Some(rev) = from_env {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_name_uses_stem() {
        let derived = sidecar_path(Path::new("/tmp/out/square.json"));
        assert_eq!(derived, Path::new("/tmp/out/square.provenance.json"));
    }

    #[test]
    fn fingerprint_tracks_contents() {
        let p = Path::new("p.json");
        let a = InputDigest::new(p, b"{\"ineq\": 1}", [2, 4, 1]);
        let b = InputDigest::new(p, b"{\"ineq\": 1}", [2, 4, 1]);
        let c = InputDigest::new(p, b"{\"ineq\": 2}", [2, 4, 1]);
        assert_eq!(a, b);
        assert_ne!(a.fingerprint, c.fingerprint);
        assert_eq!(a.fingerprint.len(), 16);
        assert_eq!(a.bytes, 11);
    }

    #[test]
    fn sidecar_records_input_params_and_summary() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("nested").join("poly.json");
        let record = Record {
            input: InputDigest::new(Path::new("in.json"), b"{}", [3, 6, 1]),
            params: json!({"max_iter": 50}),
            summary: json!({"vertices": 4}),
        };
        let path = write_sidecar(&artifact, &record).unwrap();
        assert_eq!(path, dir.path().join("nested").join("poly.provenance.json"));
        let doc: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(doc["output"], artifact.to_string_lossy().as_ref());
        assert_eq!(doc["input"]["shape"], json!([3, 6, 1]));
        assert_eq!(doc["params"]["max_iter"], 50);
        assert_eq!(doc["summary"]["vertices"], 4);
        assert_eq!(doc["polyproj_version"], polyproj::VERSION);
    }
}
