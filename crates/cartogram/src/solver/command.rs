//! Solver backed by an external executable.
//!
//! Protocol: `<program> <args...> <field>` reads a GeoJSON FeatureCollection on
//! stdin and writes the resulting FeatureCollection on stdout. A non-zero exit
//! status is a failure; its stderr is kept in the error message.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{DiffusionSolver, SolverLoader};
use crate::error::SolverError;
use crate::geojson;
use crate::geom::FeatureCollection;

/// Loads a [`CommandSolver`] after checking that the program runs.
#[derive(Clone, Debug)]
pub struct CommandLoader {
    pub program: String,
    pub args: Vec<String>,
    /// Arguments of the load-time probe; default `--version`.
    pub probe_args: Vec<String>,
}

impl CommandLoader {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            probe_args: vec!["--version".to_string()],
        }
    }
}

#[async_trait]
impl SolverLoader for CommandLoader {
    async fn load(&self) -> Result<Arc<dyn DiffusionSolver>, SolverError> {
        let out = Command::new(&self.program)
            .args(&self.probe_args)
            .stdin(Stdio::null())
            .output()
            .await?;
        if !out.status.success() {
            return Err(format!(
                "solver probe `{} {}` failed with {}",
                self.program,
                self.probe_args.join(" "),
                out.status
            )
            .into());
        }
        tracing::debug!(program = %self.program, "diffusion solver available");
        Ok(Arc::new(CommandSolver {
            program: self.program.clone(),
            args: self.args.clone(),
        }))
    }
}

/// External-process diffusion solver.
#[derive(Clone, Debug)]
pub struct CommandSolver {
    pub program: String,
    pub args: Vec<String>,
}

#[async_trait]
impl DiffusionSolver for CommandSolver {
    async fn make_cartogram(
        &self,
        fc: &FeatureCollection,
        field: &str,
    ) -> Result<FeatureCollection, SolverError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(field)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        let mut stdin = child.stdin.take().ok_or("solver stdin not captured")?;
        let input = geojson::to_string(fc).into_bytes();
        let write = async move {
            // a solver that exits early is judged by its exit status, not the pipe
            match stdin.write_all(&input).await {
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                r => r,
            }
        };
        let (_, out) = tokio::try_join!(write, child.wait_with_output())?;
        if !out.status.success() {
            return Err(format!(
                "solver `{}` exited with {}: {}",
                self.program,
                out.status,
                String::from_utf8_lossy(&out.stderr).trim()
            )
            .into());
        }
        let text = String::from_utf8(out.stdout)?;
        Ok(geojson::from_str(&text)?)
    }
}
