//! A [`CommandRunner`] that records invocations instead of spawning them.
//!
//! It imitates the two CMake side effects the launcher depends on: the
//! configure step creates the `-B` directory, and a successful build step
//! can drop an empty executable at a chosen path.

use std::collections::VecDeque;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use webgpu_launch::{CommandRunner, Invocation, StepStatus};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// What the launcher asked to run.
    pub invocation: Invocation,
    /// Whether the watched path existed when the call arrived.
    pub watched_existed: bool,
}

impl RecordedCall {
    /// Shell-like rendering of the invocation, e.g. `cmake --build build-wgpu`.
    pub fn command_line(&self) -> String {
        self.invocation.to_string()
    }
}

/// Scripted stand-in for the external processes.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<RecordedCall>>,
    statuses: Mutex<VecDeque<StepStatus>>,
    executable: Option<PathBuf>,
    watch: Option<PathBuf>,
}

impl RecordingRunner {
    /// Runner where every call exits successfully.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner returning `statuses` in call order, then success.
    pub fn with_statuses(statuses: impl IntoIterator<Item = StepStatus>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Creates `path` when a `--build` call succeeds.
    #[must_use]
    pub fn producing(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Records whether `path` exists at the start of every call.
    #[must_use]
    pub fn watching(mut self, path: impl Into<PathBuf>) -> Self {
        self.watch = Some(path.into());
        self
    }

    /// Calls seen so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Command lines seen so far, in order.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCall::command_line).collect()
    }

    fn next_status(&self) -> StepStatus {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(StepStatus::exited(0))
    }

    fn simulate(&self, invocation: &Invocation, status: StepStatus) -> io::Result<()> {
        let args = invocation.args();
        if let Some(dir) = flag_value(args, "-B") {
            fs::create_dir_all(invocation.cwd().join(dir))?;
        }
        if status.success() && flag_value(args, "--build").is_some() {
            if let Some(exe) = &self.executable {
                create_file(exe)?;
            }
        }
        Ok(())
    }
}

fn flag_value<'a>(args: &'a [OsString], flag: &str) -> Option<&'a OsString> {
    args.iter()
        .position(|a| a == OsStr::new(flag))
        .and_then(|i| args.get(i + 1))
}

fn create_file(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, b"")
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<StepStatus> {
        let watched_existed = self.watch.as_deref().is_some_and(Path::exists);
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                invocation: invocation.clone(),
                watched_existed,
            });
        let status = self.next_status();
        self.simulate(invocation, status)?;
        Ok(status)
    }
}
