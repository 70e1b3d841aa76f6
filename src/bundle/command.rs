// src/bundle/command.rs

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::bundle::backend::{BundleFuture, Bundler};
use crate::config::BundlerSection;
use crate::discover::{EntryFilter, relative_str};
use crate::errors::{PipelineError, Result};
use crate::plan::{OutputTarget, StageSpec};
use crate::process::exit_code_of;

/// Number of stderr lines kept in a bundle failure message.
const STDERR_TAIL_LINES: usize = 20;

/// Bundles a stage by running an external bundler command.
///
/// The command line is `<cmd> <args...> <entry points...> --outfile=<file>`
/// (or `--outdir=<dir>`), run in the stage's working directory.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    config: BundlerSection,
}

impl CommandBundler {
    pub fn new(config: BundlerSection) -> Self {
        Self { config }
    }

    async fn run(&self, stage: StageSpec) -> Result<()> {
        if stage.entry_points.is_empty() {
            info!(stage = %stage.name, "no entry points to bundle; skipping");
            return Ok(());
        }

        let entry_points = filtered_entry_points(&stage)?;
        if entry_points.is_empty() {
            return Err(PipelineError::BundleFailed {
                stage: stage.name.clone(),
                reason: format!(
                    "all {} entry points are excluded by the ignore list",
                    stage.entry_points.len()
                ),
            });
        }

        let output_flag = match &stage.output {
            OutputTarget::File(p) => format!("--outfile={}", p.display()),
            OutputTarget::Dir(p) => format!("--outdir={}", p.display()),
        };

        let mut cmd = Command::new(&self.config.cmd);
        cmd.args(&self.config.args)
            .args(&entry_points)
            .arg(&output_flag)
            .current_dir(&stage.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(
            stage = %stage.name,
            cmd = %self.config.cmd,
            entries = entry_points.len(),
            output = %stage.output,
            "bundling"
        );

        let output = cmd.output().await.map_err(|e| PipelineError::BundleFailed {
            stage: stage.name.clone(),
            reason: format!("spawning bundler '{}': {e}", self.config.cmd),
        })?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(stage = %stage.name, "stdout: {}", line);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let code = exit_code_of(output.status);
            return Err(PipelineError::BundleFailed {
                stage: stage.name.clone(),
                reason: format!("bundler exited with code {code}: {}", stderr_tail(&stderr)),
            });
        }
        for line in stderr.lines() {
            warn!(stage = %stage.name, "stderr: {}", line);
        }

        if let Some(callback) = &stage.on_after_bundle {
            callback(&stage).map_err(|e| PipelineError::BundleFailed {
                stage: stage.name.clone(),
                reason: format!("post-bundle hook failed: {e:#}"),
            })?;
        }

        debug!(stage = %stage.name, "bundle finished");
        Ok(())
    }
}

impl Bundler for CommandBundler {
    fn bundle(&self, stage: StageSpec) -> BundleFuture<'_> {
        Box::pin(self.run(stage))
    }
}

/// Drop entry points covered by the stage's ignore list.
fn filtered_entry_points(stage: &StageSpec) -> Result<Vec<PathBuf>> {
    if stage.ignore.is_empty() {
        return Ok(stage.entry_points.clone());
    }

    let filter = EntryFilter::ignore_only(&stage.ignore)?;
    let kept = stage
        .entry_points
        .iter()
        .filter(|entry| {
            let rel = if entry.is_absolute() {
                relative_str(&stage.working_dir, entry)
            } else {
                Some(entry.to_string_lossy().replace('\\', "/"))
            };
            match rel {
                Some(rel) if filter.is_ignored(&rel) => {
                    debug!(stage = %stage.name, entry = %rel, "entry point ignored");
                    false
                }
                _ => true,
            }
        })
        .cloned()
        .collect();
    Ok(kept)
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "no output on stderr".to_string();
    }
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
