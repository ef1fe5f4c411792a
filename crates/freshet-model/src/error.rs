//! Error types for staging and launching model runs.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors raised while preparing or executing a model run.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The inputs directory does not exist or is not a directory.
    #[error("'{0}' is not a valid inputs directory")]
    InvalidInputsDir(PathBuf),

    /// The inputs directory has no settings file.
    #[error("settings file '{0}' does not exist")]
    MissingSettingsFile(PathBuf),

    /// No executable was supplied and discovery found none.
    #[error("a model executable must be provided")]
    NoExecutable,

    /// The executable path does not point at an executable file.
    #[error("'{0}' is not an executable file")]
    NotExecutable(PathBuf),

    /// The working directory is missing or unusable.
    #[error("'{0}' is not a valid working directory")]
    InvalidWorkingDir(PathBuf),

    /// The working directory aliases the inputs tree; a run in place would
    /// corrupt the inputs.
    #[error("working directory '{0}' must differ from the inputs directory")]
    WorkingDirIsInputs(PathBuf),

    /// The model binary exited with a failure status.
    #[error("model run failed with {status}")]
    RunFailed {
        /// Exit status of the child process.
        status: ExitStatus,
        /// Captured standard error, empty when output was not captured.
        stderr: String,
    },

    /// The input snapshot lock was poisoned by a panicking clone.
    #[error("input snapshot lock poisoned")]
    SnapshotPoisoned,

    /// Filesystem or process I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Settings could not be written for the run.
    #[error(transparent)]
    Settings(#[from] freshet_settings::SettingsError),
}
