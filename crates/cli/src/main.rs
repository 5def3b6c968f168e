use anyhow::{bail, Context, Result};
use cartogram::diagnostics::{area_errors_in, set_area_errors, AreaFrame};
use cartogram::geojson;
use cartogram::projection::projection_from_name;
use cartogram::solver::{CommandLoader, SolverHandle};
use cartogram::{compute, Method, ProjectionContext};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod provenance;
mod table;

use provenance::{RunParams, Summary};

#[derive(Parser)]
#[command(name = "cartogram")]
#[command(about = "Compute area cartograms from GeoJSON polygons")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Compute a cartogram and write it with a provenance sidecar
    Run(RunArgs),
    /// Print build provenance, plus error figures of a diagnostics CSV if given
    Report {
        #[arg(long)]
        diagnostics: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    Scaling,
    ForceField,
    Diffusion,
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    #[arg(long, value_enum)]
    method: MethodArg,
    /// GeoJSON FeatureCollection in lon/lat degrees
    #[arg(long)]
    input: PathBuf,
    /// Numeric property the areas should follow
    #[arg(long)]
    field: String,
    #[arg(long)]
    out: PathBuf,
    /// Force-field passes
    #[arg(long, default_value_t = 5)]
    iterations: usize,
    #[arg(long, default_value = "equirectangular")]
    projection: String,
    /// Work in the projected plane instead of on the sphere
    #[arg(long)]
    planar: bool,
    /// Diffusion solver executable
    #[arg(long)]
    solver_cmd: Option<String>,
    /// Extra argument passed to the solver before the field name (repeatable)
    #[arg(long = "solver-arg", allow_hyphen_values = true)]
    solver_args: Vec<String>,
    /// Also write a per-feature CSV table
    #[arg(long)]
    diagnostics: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run(args) => run(args).await.map(|_| ()),
        Action::Report { diagnostics } => report(diagnostics.as_deref()),
    }
}

async fn run(args: RunArgs) -> Result<Summary> {
    tracing::info!(input = %args.input.display(), out = %args.out.display(), method = ?args.method, "run");
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let fc = geojson::from_str(&text).with_context(|| format!("parsing {}", args.input.display()))?;

    let projection = projection_from_name(&args.projection)?;
    let ctx = if args.planar {
        ProjectionContext::planar(projection)
    } else {
        ProjectionContext::geographic(projection)
    };

    let handle;
    let method = match args.method {
        MethodArg::Scaling => Method::Scaling,
        MethodArg::ForceField => Method::ForceField {
            iterations: args.iterations,
        },
        MethodArg::Diffusion => {
            let Some(cmd) = &args.solver_cmd else {
                bail!("--method diffusion needs --solver-cmd");
            };
            handle = SolverHandle::new(CommandLoader::new(cmd.clone(), args.solver_args.clone()));
            Method::Diffusion { solver: &handle }
        }
    };

    let mut out = compute(&fc, &args.field, method, &ctx).await?;
    // force field equalizes areas in the projection plane, even for a geographic map
    let frame = match args.method {
        MethodArg::ForceField => AreaFrame::ProjectionPlane,
        MethodArg::Scaling | MethodArg::Diffusion => AreaFrame::Context,
    };
    let errors = area_errors_in(frame, &out, &args.field, &ctx);
    if args.method != MethodArg::Scaling {
        set_area_errors(&mut out, &errors);
    }

    write_file(&args.out, geojson::to_string(&out).as_bytes())?;
    let mut extra = Vec::new();
    if let Some(path) = &args.diagnostics {
        let mut df = table::diagnostics_frame(&fc, &out, &args.field, &ctx, frame)?;
        table::write_csv(&mut df, path)?;
        extra.push(path.clone());
    }

    let summary = Summary::from_errors(&errors);
    let params = RunParams {
        input: args.input.to_string_lossy().into_owned(),
        field: args.field.clone(),
        method: method.name().to_string(),
        iterations: matches!(args.method, MethodArg::ForceField).then_some(args.iterations),
        projection: ctx.projection.name().to_string(),
        planar: args.planar,
        solver_cmd: args.solver_cmd.clone(),
    };
    let sidecar = provenance::write_sidecar(&args.out, &params, &summary, &extra)?;
    tracing::info!(
        features = summary.features,
        mean_abs_log_error = ?summary.mean_abs_log_error,
        sidecar = %sidecar.display(),
        "written"
    );
    Ok(summary)
}

fn report(diagnostics: Option<&Path>) -> Result<()> {
    let summary = diagnostics
        .map(|path| table::read_area_errors(path).map(|e| Summary::from_errors(&e)))
        .transpose()?;
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "library_version": cartogram::VERSION,
        "diagnostics": diagnostics.map(|p| p.to_string_lossy().into_owned()),
        "summary": summary,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}
