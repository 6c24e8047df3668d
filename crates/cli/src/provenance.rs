//! Provenance sidecars for run outputs.

use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced a set of output files.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
    pub results: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            results: Value::Null,
        }
    }

    pub fn with_results(mut self, results: Value) -> Self {
        self.results = results;
        self
    }
}

/// Write `<artifact>.provenance.json` next to `artifact`, listing every file in
/// `outputs` along with the git revision, crate version and callsite.
#[track_caller]
pub fn write_sidecar(artifact: &Path, outputs: &[&Path], payload: &Payload) -> Result<PathBuf> {
    let path = sidecar_path(artifact);
    let callsite = Location::caller();
    let doc = json!({
        "code_rev": current_git_rev(),
        "version": rainbow::VERSION,
        "callsite": { "file": callsite.file(), "line": callsite.line() },
        "command": payload.command,
        "params": payload.params,
        "results": payload.results,
        "outputs": outputs.iter().map(|p| p.to_string_lossy()).collect::<Vec<_>>(),
    });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "artifact".into());
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Build-time `GIT_COMMIT`, then the runtime variable, then `git rev-parse`.
pub fn current_git_rev() -> String {
    let non_empty = |s: String| (!s.is_empty()).then_some(s);
    option_env!("GIT_COMMIT")
        .map(str::to_string)
        .and_then(non_empty)
        .or_else(|| std::env::var("GIT_COMMIT").ok().and_then(non_empty))
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status.success().then_some(())?;
            String::from_utf8(out.stdout)
                .ok()
                .map(|s| s.trim().to_string())
                .and_then(non_empty)
        })
        .unwrap_or_else(|| "unknown".to_string())
}
