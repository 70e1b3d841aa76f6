use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use bundlegen::process::{CompletionSignal, StopFuture, SupervisedProcess};
use tokio::sync::oneshot;

/// Shared view of what happened to a [`FakeProcess`], kept by the test after
/// the process itself moved into the executor.
#[derive(Debug, Clone, Default)]
pub struct ProcessTracker {
    inner: Arc<Mutex<TrackerState>>,
}

#[derive(Debug, Default)]
struct TrackerState {
    starts: usize,
    stops: usize,
    started_before_stop: bool,
}

impl ProcessTracker {
    pub fn starts(&self) -> usize {
        self.inner.lock().unwrap().starts
    }

    pub fn stops(&self) -> usize {
        self.inner.lock().unwrap().stops
    }

    /// True when the first stop happened after a start.
    pub fn started_before_stop(&self) -> bool {
        self.inner.lock().unwrap().started_before_stop
    }
}

/// How the fake process finishes once run.
#[derive(Debug, Clone, Copy)]
pub enum FakeExit {
    Success,
    Code(i32),
    /// Completion signal is dropped without firing; the process reports
    /// success afterwards.
    ClosedSignal,
}

/// A fake supervised process that finishes immediately with a preset exit.
#[derive(Debug)]
pub struct FakeProcess {
    exit: FakeExit,
    finished: bool,
    fail_stop: bool,
    tracker: ProcessTracker,
}

impl FakeProcess {
    pub fn new(exit: FakeExit) -> (Self, ProcessTracker) {
        let tracker = ProcessTracker::default();
        (
            Self {
                exit,
                finished: false,
                fail_stop: false,
                tracker: tracker.clone(),
            },
            tracker,
        )
    }

    pub fn succeeding() -> (Self, ProcessTracker) {
        Self::new(FakeExit::Success)
    }

    pub fn failing_with(code: i32) -> (Self, ProcessTracker) {
        Self::new(FakeExit::Code(code))
    }

    /// Make `stop` return an error. The stop is still counted.
    pub fn with_failing_stop(mut self) -> Self {
        self.fail_stop = true;
        self
    }
}

impl SupervisedProcess for FakeProcess {
    fn run(&mut self) -> CompletionSignal {
        let (tx, rx) = oneshot::channel();
        self.tracker.inner.lock().unwrap().starts += 1;
        self.finished = true;
        if !matches!(self.exit, FakeExit::ClosedSignal) {
            let _ = tx.send(());
        }
        rx
    }

    fn is_successful(&self) -> bool {
        self.finished && !matches!(self.exit, FakeExit::Code(_))
    }

    fn exit_code(&self) -> i32 {
        match (self.finished, self.exit) {
            (true, FakeExit::Code(code)) => code,
            (true, _) => 0,
            (false, _) => -1,
        }
    }

    fn stop(&mut self) -> StopFuture<'_> {
        Box::pin(async move {
            let mut state = self.tracker.inner.lock().unwrap();
            if state.stops == 0 {
                state.started_before_stop = state.starts > 0;
            }
            state.stops += 1;
            if self.fail_stop {
                return Err(anyhow!("injected stop failure").into());
            }
            Ok(())
        })
    }
}
