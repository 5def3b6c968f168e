use anyhow::{Context, Result};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Parameters of one cartogram run, as recorded next to its output.
#[derive(Clone, Debug, Serialize)]
pub struct RunParams {
    pub input: String,
    pub field: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    pub projection: String,
    pub planar: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver_cmd: Option<String>,
}

/// Quality figures of the produced map.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Summary {
    pub features: usize,
    /// Mean of `|ln area_error|` over features with a finite positive error.
    pub mean_abs_log_error: Option<f64>,
    pub max_abs_log_error: Option<f64>,
}

impl Summary {
    pub fn from_errors(errors: &[f64]) -> Self {
        let logs: Vec<f64> = errors
            .iter()
            .filter(|e| e.is_finite() && **e > 0.0)
            .map(|e| e.ln().abs())
            .collect();
        let (mean, max) = if logs.is_empty() {
            (None, None)
        } else {
            let mean = logs.iter().sum::<f64>() / logs.len() as f64;
            (Some(mean), logs.iter().copied().reduce(f64::max))
        };
        Self {
            features: errors.len(),
            mean_abs_log_error: mean,
            max_abs_log_error: max,
        }
    }
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    library_version: &'static str,
    params: &'a RunParams,
    summary: &'a Summary,
    outputs: Vec<String>,
}

/// Write `<artifact>.provenance.json` with the git commit, library version,
/// run parameters, quality summary and every file the run produced.
pub fn write_sidecar<P: AsRef<Path>>(
    artifact: P,
    params: &RunParams,
    summary: &Summary,
    extra_outputs: &[PathBuf],
) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    let outputs = std::iter::once(artifact)
        .chain(extra_outputs.iter().map(PathBuf::as_path))
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let doc = Sidecar {
        code_rev: current_git_rev(),
        library_version: cartogram::VERSION,
        params,
        summary,
        outputs,
    };
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("cartogram"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
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
