// src/process/mod.rs

//! Supervised-process layer.
//!
//! - [`SupervisedProcess`] is the contract the executor relies on: a
//!   non-blocking `run` that hands back a completion signal, status queries,
//!   and an idempotent `stop`.
//! - [`script_runner`] is the production implementation on top of
//!   `tokio::process::Command`.
//! - [`env`] builds the production-mode environment for the spawned script.

pub mod env;
pub mod script_runner;

use std::future::Future;
use std::pin::Pin;
use std::process::ExitStatus;

use tokio::sync::oneshot;

use crate::errors::Result;

pub use env::ProcessEnv;
pub use script_runner::{ScriptRunner, ScriptRunnerConfig};

/// Single-fire completion signal. A closed channel also means "exited".
pub type CompletionSignal = oneshot::Receiver<()>;

pub type StopFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Lifecycle of a supervised process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    NotStarted,
    Running,
    Exited { success: bool, code: i32 },
    Stopped,
}

/// Trait abstracting the one long-running process of a pipeline run.
///
/// Every method may be called in any order, including before `run` and
/// after the process exited.
pub trait SupervisedProcess: Send {
    /// Start the process. Only the first call spawns anything; later calls
    /// return an already-closed signal.
    fn run(&mut self) -> CompletionSignal;

    fn is_successful(&self) -> bool;

    /// Exit code of the finished process, `-1` when there is none.
    fn exit_code(&self) -> i32;

    /// Stop the process if it is still running. Idempotent.
    fn stop(&mut self) -> StopFuture<'_>;
}

impl<P: SupervisedProcess + ?Sized> SupervisedProcess for Box<P> {
    fn run(&mut self) -> CompletionSignal {
        (**self).run()
    }

    fn is_successful(&self) -> bool {
        (**self).is_successful()
    }

    fn exit_code(&self) -> i32 {
        (**self).exit_code()
    }

    fn stop(&mut self) -> StopFuture<'_> {
        (**self).stop()
    }
}

/// Exit code with the shell convention `128 + signal` for signalled exits,
/// `-1` when neither is available.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}
