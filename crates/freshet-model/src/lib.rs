//! Staging and launching of GEOtop runs.
//!
//! GEOtop is a separate executable taking one argument, the directory it
//! runs in: inputs are read from there and outputs written back there.
//! This crate wraps that contract: it resolves the executable, keeps a
//! validated (optionally in-memory) copy of the inputs tree, clones it
//! into per-run working directories, and drives the run through the
//! pre/post hooks of a [`RunnableModel`].
//!
//! The settings file inside each staged directory is rewritten through
//! `freshet-settings` before the binary starts, so every run carries an
//! annotated record of how it differs from the base configuration.

pub mod error;
pub mod exe;
pub mod runner;
pub mod stage;

pub use error::ModelError;
pub use runner::{patch_settings_file, Launcher, PlainRun, RunOptions, RunnableModel};
pub use stage::{InputStore, SETTINGS_FILE_NAME};
