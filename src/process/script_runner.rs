// src/process/script_runner.rs

//! Production [`SupervisedProcess`]: runs a script with an executable such as
//! `node`, forwarding its output to the log.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};

use anyhow::{Context, anyhow};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::{
    CompletionSignal, ProcessEnv, ProcessStatus, StopFuture, SupervisedProcess, exit_code_of,
};

#[derive(Debug, Clone)]
pub struct ScriptRunnerConfig {
    /// Diagnostic name, e.g. `config-runner`.
    pub name: String,
    pub executable: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub env: ProcessEnv,
}

/// Runs one script at most once.
///
/// The child is spawned with `kill_on_drop(true)` and owned by a supervisor
/// task. Dropping the runner closes the cancel channel, which makes the
/// supervisor kill the child, so an aborted pipeline never leaks the process.
#[derive(Debug)]
pub struct ScriptRunner {
    config: ScriptRunnerConfig,
    status: Arc<Mutex<ProcessStatus>>,
    cancel: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ScriptRunner {
    pub fn new(config: ScriptRunnerConfig) -> Self {
        Self {
            config,
            status: Arc::new(Mutex::new(ProcessStatus::NotStarted)),
            cancel: None,
            handle: None,
        }
    }

    pub fn status(&self) -> ProcessStatus {
        *lock_status(&self.status)
    }
}

impl SupervisedProcess for ScriptRunner {
    fn run(&mut self) -> CompletionSignal {
        let (done_tx, done_rx) = oneshot::channel::<()>();

        {
            let mut status = lock_status(&self.status);
            let current = *status;
            if current != ProcessStatus::NotStarted {
                warn!(
                    runner = %self.config.name,
                    status = ?current,
                    "runner already started; not spawning again"
                );
                // `done_tx` is dropped here, so the signal reads as closed.
                return done_rx;
            }
            *status = ProcessStatus::Running;
        }

        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let config = self.config.clone();
        let status = Arc::clone(&self.status);

        let handle = tokio::spawn(async move {
            let outcome = match run_script(&config, cancel_rx).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(runner = %config.name, error = %err, "script execution error");
                    ProcessStatus::Exited {
                        success: false,
                        code: -1,
                    }
                }
            };
            *lock_status(&status) = outcome;
            // The receiver may be gone if nobody waits for completion.
            let _ = done_tx.send(());
            debug!(runner = %config.name, "supervisor task finished");
        });

        self.cancel = Some(cancel_tx);
        self.handle = Some(handle);
        done_rx
    }

    fn is_successful(&self) -> bool {
        matches!(
            *lock_status(&self.status),
            ProcessStatus::Exited { success: true, .. }
        )
    }

    fn exit_code(&self) -> i32 {
        match *lock_status(&self.status) {
            ProcessStatus::Exited { code, .. } => code,
            _ => -1,
        }
    }

    fn stop(&mut self) -> StopFuture<'_> {
        Box::pin(async move {
            let Some(handle) = self.handle.take() else {
                debug!(runner = %self.config.name, "runner not running; nothing to stop");
                return Ok(());
            };

            if let Some(cancel) = self.cancel.take() {
                if cancel.send(()).is_err() {
                    debug!(runner = %self.config.name, "process already finished while stopping");
                }
            }

            handle
                .await
                .map_err(|e| anyhow!("joining supervisor of '{}': {e}", self.config.name))?;
            Ok(())
        })
    }
}

/// Spawn the script and wait for it to exit or for a stop request.
async fn run_script(
    config: &ScriptRunnerConfig,
    mut cancel_rx: oneshot::Receiver<()>,
) -> anyhow::Result<ProcessStatus> {
    info!(
        runner = %config.name,
        executable = %config.executable,
        args = ?config.args,
        "starting script"
    );

    let mut cmd = Command::new(&config.executable);
    cmd.args(&config.args)
        .current_dir(&config.working_dir)
        .envs(config.env.iter())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning '{}' for {}", config.executable, config.name))?;

    // Always consume both pipes so buffers don't fill.
    if let Some(stdout) = child.stdout.take() {
        let name = config.name.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(runner = %name, "{}", line);
            }
        });
    }
    if let Some(stderr) = child.stderr.take() {
        let name = config.name.clone();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                warn!(runner = %name, "stderr: {}", line);
            }
        });
    }

    tokio::select! {
        status_res = child.wait() => {
            let status = status_res
                .with_context(|| format!("waiting for process of {}", config.name))?;
            let code = exit_code_of(status);

            info!(
                runner = %config.name,
                exit_code = code,
                success = status.success(),
                "script exited"
            );

            Ok(ProcessStatus::Exited { success: status.success(), code })
        }

        cancel = &mut cancel_rx => {
            match cancel {
                Ok(()) => debug!(runner = %config.name, "stop requested; killing process"),
                Err(_) => debug!(runner = %config.name, "runner dropped; killing process"),
            }
            if let Err(e) = child.kill().await {
                warn!(runner = %config.name, error = %e, "failed to kill script process");
            }
            Ok(ProcessStatus::Stopped)
        }
    }
}

fn lock_status(status: &Mutex<ProcessStatus>) -> std::sync::MutexGuard<'_, ProcessStatus> {
    status.lock().unwrap_or_else(|e| e.into_inner())
}
