//! Launching the model binary over a staged working directory.
//!
//! A [`Launcher`] owns the inputs tree, the resolved executable and the
//! parsed base settings. Each run stages the inputs into a working
//! directory, lets a [`RunnableModel`] prepare it (typically by patching
//! the settings file), executes `<exe> <working_dir>`, and hands the
//! directory back to the model for postprocessing. [`Launcher::run`] does
//! all of this in a fresh temporary directory, leaving no trace.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{info, warn};

use freshet_settings::{apply_overrides, KeywordSchema, Overrides, Settings};

use crate::error::ModelError;
use crate::stage::{InputStore, SETTINGS_FILE_NAME};

/// How the child process is run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Treat a non-zero exit status as an error.
    pub check: bool,
    /// Capture stdout/stderr instead of inheriting them.
    pub capture_output: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            check: true,
            capture_output: true,
        }
    }
}

/// Pre/post hooks around one model invocation.
///
/// `preprocess` prepares the staged working directory (settings, extra
/// input files); `postprocess` reads whatever the model wrote and distills
/// the run's result. Implementations must not touch the inputs tree.
pub trait RunnableModel {
    /// Result extracted from a finished run.
    type Output;

    /// Prepare the staged working directory for execution.
    fn preprocess(&self, working_dir: &Path, overrides: &Overrides) -> Result<(), ModelError>;

    /// Extract the result from the finished working directory.
    fn postprocess(&self, working_dir: &Path) -> Result<Self::Output, ModelError>;
}

/// Patch the settings file inside `working_dir` with `overrides`.
///
/// This is the canonical preprocess step: most [`RunnableModel`]
/// implementations call it and then add their own input preparation.
pub fn patch_settings_file(
    working_dir: &Path,
    overrides: &Overrides,
    schema: &KeywordSchema,
) -> Result<(), ModelError> {
    let path = working_dir.join(SETTINGS_FILE_NAME);
    if !path.is_file() {
        return Err(ModelError::MissingSettingsFile(path));
    }
    let original = fs::read_to_string(&path)?;
    fs::write(&path, apply_overrides(&original, overrides, schema))?;
    Ok(())
}

/// A model that only patches the settings file and reports nothing back.
/// Useful for fire-and-forget runs from the command line.
#[derive(Debug, Clone)]
pub struct PlainRun {
    schema: KeywordSchema,
}

impl PlainRun {
    /// Plain run against the given schema.
    pub fn new(schema: KeywordSchema) -> Self {
        Self { schema }
    }
}

impl RunnableModel for PlainRun {
    type Output = ();

    fn preprocess(&self, working_dir: &Path, overrides: &Overrides) -> Result<(), ModelError> {
        patch_settings_file(working_dir, overrides, &self.schema)
    }

    fn postprocess(&self, _working_dir: &Path) -> Result<(), ModelError> {
        Ok(())
    }
}

/// Stages inputs and executes the model binary.
#[derive(Debug)]
pub struct Launcher {
    inputs: InputStore,
    exe: PathBuf,
    options: RunOptions,
    settings: Settings,
}

impl Launcher {
    /// Build a launcher over `inputs_dir` with a resolved executable.
    ///
    /// The settings file is parsed once here; [`Launcher::settings`] gives
    /// callers the base configuration for diffing and massaging.
    pub fn new(
        inputs_dir: impl Into<PathBuf>,
        exe: PathBuf,
        schema: &KeywordSchema,
        options: RunOptions,
    ) -> Result<Self, ModelError> {
        let inputs = InputStore::open(inputs_dir, true)?;
        let text = fs::read_to_string(inputs.settings_path())?;
        let settings = Settings::parse(&text, schema);
        info!(
            "parsed {} settings from {}",
            settings.len(),
            inputs.settings_path().display()
        );
        Ok(Self {
            inputs,
            exe,
            options,
            settings,
        })
    }

    /// The settings parsed from the inputs tree.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The inputs store backing this launcher.
    pub fn inputs(&self) -> &InputStore {
        &self.inputs
    }

    fn check_working_dir(&self, working_dir: &Path) -> Result<(), ModelError> {
        if !working_dir.is_dir() {
            return Err(ModelError::InvalidWorkingDir(working_dir.to_path_buf()));
        }
        let canonical_work = working_dir.canonicalize()?;
        let canonical_inputs = self.inputs.root().canonicalize()?;
        if canonical_work == canonical_inputs {
            return Err(ModelError::WorkingDirIsInputs(working_dir.to_path_buf()));
        }
        Ok(())
    }

    /// Evaluate the model in `working_dir`: stage, preprocess, execute,
    /// postprocess.
    pub fn run_in<M: RunnableModel>(
        &self,
        model: &M,
        working_dir: &Path,
        overrides: &Overrides,
    ) -> Result<M::Output, ModelError> {
        self.check_working_dir(working_dir)?;
        self.inputs.clone_into(working_dir)?;
        model.preprocess(working_dir, overrides)?;

        info!(
            "running {} in {}",
            self.exe.display(),
            working_dir.display()
        );
        let mut command = Command::new(&self.exe);
        command.arg(working_dir);

        let (status, stderr) = if self.options.capture_output {
            command.stdout(Stdio::piped()).stderr(Stdio::piped());
            let output = command.output()?;
            (
                output.status,
                String::from_utf8_lossy(&output.stderr).into_owned(),
            )
        } else {
            (command.status()?, String::new())
        };

        if !status.success() {
            warn!("model exited with {status}");
            if self.options.check {
                return Err(ModelError::RunFailed { status, stderr });
            }
        }

        model.postprocess(working_dir)
    }

    /// Evaluate the model in a fresh temporary directory, without side
    /// effects on the inputs tree or the caller's filesystem.
    pub fn run<M: RunnableModel>(
        &self,
        model: &M,
        overrides: &Overrides,
    ) -> Result<M::Output, ModelError> {
        let tmp = tempfile::tempdir()?;
        self.run_in(model, tmp.path(), overrides)
    }
}
