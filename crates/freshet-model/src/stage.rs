//! Input-tree staging: validate the inputs directory once, then clone it
//! into writable working directories for each run.
//!
//! An [`InputStore`] can keep an in-memory snapshot of the whole tree so
//! that later clones do not depend on the inputs directory staying
//! untouched on disk. The snapshot is behind a `Mutex`: one clone at a
//! time reads it, acquired for the duration of [`InputStore::clone_into`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::ModelError;

/// Name of the settings file every inputs tree must contain.
pub const SETTINGS_FILE_NAME: &str = "geotop.inpts";

#[derive(Debug)]
struct StoredFile {
    rel: PathBuf,
    contents: Vec<u8>,
}

/// A validated inputs tree, cloneable into working directories.
#[derive(Debug)]
pub struct InputStore {
    root: PathBuf,
    snapshot: Option<Mutex<Vec<StoredFile>>>,
}

fn collect_files(dir: &Path, root: &Path, out: &mut Vec<StoredFile>) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, root, out)?;
        } else {
            out.push(StoredFile {
                rel: path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .to_path_buf(),
                contents: fs::read(&path)?,
            });
        }
    }
    Ok(())
}

fn copy_tree(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let path = entry?.path();
        let target = dst.join(path.file_name().unwrap_or_default());
        if path.is_dir() {
            copy_tree(&path, &target)?;
        } else {
            fs::copy(&path, &target)?;
        }
    }
    Ok(())
}

impl InputStore {
    /// Open an inputs directory, checking it exists and contains a
    /// settings file. With `store` set the whole tree is read into memory
    /// now, making later clones independent of the directory's state.
    pub fn open(root: impl Into<PathBuf>, store: bool) -> Result<Self, ModelError> {
        let root: PathBuf = root.into();
        if !root.is_dir() {
            return Err(ModelError::InvalidInputsDir(root));
        }
        let settings_path = root.join(SETTINGS_FILE_NAME);
        if !settings_path.is_file() {
            return Err(ModelError::MissingSettingsFile(settings_path));
        }

        let snapshot = if store {
            let mut files = Vec::new();
            collect_files(&root, &root, &mut files)?;
            debug!(
                "stored {} files from {} in memory",
                files.len(),
                root.display()
            );
            Some(Mutex::new(files))
        } else {
            None
        };

        Ok(Self { root, snapshot })
    }

    /// The inputs directory this store was opened on.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the settings file inside the inputs tree.
    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_FILE_NAME)
    }

    /// Copy the inputs tree into `working_dir`, from the in-memory
    /// snapshot when one was taken, otherwise straight from disk.
    pub fn clone_into(&self, working_dir: &Path) -> Result<(), ModelError> {
        match &self.snapshot {
            Some(snapshot) => {
                let files = snapshot.lock().map_err(|_| ModelError::SnapshotPoisoned)?;
                for file in files.iter() {
                    let target = working_dir.join(&file.rel);
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&target, &file.contents)?;
                }
                Ok(())
            }
            None => Ok(copy_tree(&self.root, working_dir)?),
        }
    }
}
