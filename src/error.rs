//! Error types surfaced by the launcher.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::launcher::Step;
use crate::process::StepStatus;

/// Failures that stop a launch sequence.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The build directory existed but could not be removed.
    #[error("failed to remove build directory `{}`", path.display())]
    Clean {
        /// Directory that was being removed.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
    /// The project root could not be made absolute.
    #[error("cannot resolve project root `{}`", path.display())]
    ProjectRoot {
        /// Root as configured.
        path: PathBuf,
        /// Error raised while resolving it.
        #[source]
        source: io::Error,
    },
    /// A program could not be started at all.
    #[error("failed to start `{program}`")]
    Spawn {
        /// Program as it was invoked.
        program: String,
        /// Error raised by the operating system.
        #[source]
        source: io::Error,
    },
    /// Configure or build finished unsuccessfully.
    #[error("{step} step failed with {status}")]
    StepFailed {
        /// Which step failed.
        step: Step,
        /// How the process ended.
        status: StepStatus,
    },
    /// The build finished but the expected binary is not there.
    #[error("executable `{}` was not produced by the build", path.display())]
    MissingExecutable {
        /// Path that was checked.
        path: PathBuf,
    },
}

/// Failures while assembling [`LaunchSettings`](crate::config::LaunchSettings).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer held a value of the wrong type or could not be read.
    #[error("failed to load launcher settings: {0}")]
    Extract(#[from] Box<figment::Error>),
    /// A value parsed but cannot be used.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Setting key.
        field: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extract(Box::new(err))
    }
}
