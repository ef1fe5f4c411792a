//! Model executable discovery and validation.
//!
//! Discovery is explicit: the embedding application calls [`discover`]
//! once (or supplies its own path) and hands the result to
//! [`crate::Launcher`]. Nothing here is cached in module state.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ModelError;

/// Binary name searched for on `PATH`.
const EXE_NAME: &str = "geotop";

/// Environment variable consulted when `PATH` has no model binary.
const EXE_ENV: &str = "GEOTOP_EXE";

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Look for the model binary on `PATH`, then in the `GEOTOP_EXE`
/// environment variable. Returns `None` when neither yields an executable
/// file.
pub fn discover() -> Option<PathBuf> {
    if let Some(paths) = env::var_os("PATH") {
        for dir in env::split_paths(&paths) {
            let candidate = dir.join(EXE_NAME);
            if is_executable(&candidate) {
                debug!("found model executable on PATH: {}", candidate.display());
                return Some(candidate);
            }
        }
    }

    if let Some(path) = env::var_os(EXE_ENV) {
        let candidate = PathBuf::from(path);
        if is_executable(&candidate) {
            debug!(
                "found model executable via {EXE_ENV}: {}",
                candidate.display()
            );
            return Some(candidate);
        }
    }

    None
}

/// Validate an explicit executable path, falling back to [`discover`] when
/// none is given.
pub fn resolve(explicit: Option<PathBuf>) -> Result<PathBuf, ModelError> {
    let path = match explicit {
        Some(path) => path,
        None => discover().ok_or(ModelError::NoExecutable)?,
    };
    if !is_executable(&path) {
        return Err(ModelError::NotExecutable(path));
    }
    Ok(path)
}
