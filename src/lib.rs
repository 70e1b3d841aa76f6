// src/lib.rs

pub mod bundle;
pub mod cli;
pub mod config;
pub mod discover;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod pipeline;
pub mod plan;
pub mod process;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::bundle::CommandBundler;
use crate::cli::CliArgs;
use crate::config::{ConfigFile, default_config_path, load_and_validate, load_or_default};
use crate::errors::{PipelineError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::pipeline::PipelineExecutor;
use crate::plan::{OutputTarget, PipelinePlanner, PipelineStages};
use crate::process::env::LOG_ENV_KEY;
use crate::process::{ProcessEnv, ScriptRunner, ScriptRunnerConfig};
use crate::types::{PipelineShape, SourcePresence};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - project directory + config loading
/// - planning (shape and stages)
/// - the command bundler and the config script runner
/// - the executor, raced against Ctrl-C
pub async fn run(args: CliArgs) -> Result<()> {
    let fs = RealFileSystem;
    let project_dir = discover::find_project_dir(&fs, &args.dir)?;

    let cfg = match &args.config {
        Some(path) => load_and_validate(&fs, path)?,
        None => load_or_default(&fs, default_config_path(&project_dir))?,
    };

    let (presence, stages) = plan_project(&fs, &cfg, &project_dir)?;
    let shape = PipelineShape::from_presence(presence);

    if args.dry_run {
        print_dry_run(&project_dir, shape, presence, &stages);
        return Ok(());
    }

    let runner = config_runner(&args, &cfg, &project_dir, &stages);
    let bundler = Arc::new(CommandBundler::new(cfg.bundler.clone()));
    let executor = PipelineExecutor::new(bundler, runner);

    // Dropping the executor on Ctrl-C kills the script and aborts running
    // bundler tasks; their children are spawned with kill_on_drop.
    tokio::select! {
        result = executor.execute(shape, stages) => result,
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "failed to listen for Ctrl+C");
            }
            Err(PipelineError::Interrupted)
        }
    }
}

/// The script runner that executes the bundled config.
fn config_runner(
    args: &CliArgs,
    cfg: &ConfigFile,
    project_dir: &Path,
    stages: &PipelineStages,
) -> ScriptRunner {
    let mut env = ProcessEnv::production(project_dir, args.no_cache, args.offline);
    if let Some(level) = args.log_level {
        env.set(LOG_ENV_KEY, level.as_str());
    }
    env.extend(&cfg.process.env);

    let artifact = stages.config.output.path().display().to_string();
    debug!(%artifact, "config artifact for runner");

    ScriptRunner::new(ScriptRunnerConfig {
        name: "config-runner".to_string(),
        executable: cfg.process.executable.clone(),
        args: vec![artifact],
        working_dir: project_dir.to_path_buf(),
        env,
    })
}

/// Simple dry-run output: print shape, detected sources and planned stages.
fn print_dry_run(
    project_dir: &Path,
    shape: PipelineShape,
    presence: SourcePresence,
    stages: &PipelineStages,
) {
    println!("bundlegen dry-run");
    println!("  project = {}", project_dir.display());
    println!("  shape = {shape}");
    println!(
        "  sources: hooks={} webhooks={} operations={}",
        presence.hooks, presence.webhooks, presence.operations
    );
    println!();

    println!("stages ({}):", stages.iter().count());
    for stage in stages.iter() {
        println!("  - {}", stage.name);
        match &stage.output {
            OutputTarget::File(p) => println!("      outfile: {}", p.display()),
            OutputTarget::Dir(p) => println!("      outdir: {}", p.display()),
        }
        println!("      entry points ({}):", stage.entry_points.len());
        for entry in &stage.entry_points {
            println!("        {}", entry.display());
        }
        if !stage.ignore.is_empty() {
            println!("      ignore: {:?}", stage.ignore);
        }
    }

    debug!("dry-run complete (no execution)");
}

/// Detect the sources of a project directory and build its stages.
pub fn plan_project(
    fs: &dyn FileSystem,
    cfg: &ConfigFile,
    project_dir: &Path,
) -> Result<(SourcePresence, PipelineStages)> {
    let planner = PipelinePlanner::new(fs, &cfg.layout);
    let presence = planner.detect(project_dir)?;
    let stages = planner.stages(project_dir, presence)?;
    Ok((presence, stages))
}
