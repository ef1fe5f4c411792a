//!
//! Stages a GEOtop inputs directory and launches a model run.
//!
//! Usage: `run <inputs-dir> [--exe PATH] [--workdir DIR] [--overrides FILE]`

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};

use freshet_model::{exe, Launcher, PlainRun, RunOptions};
use freshet_settings::{KeywordSchema, Overrides};

#[derive(Parser, Debug)]
#[command(name = "run")]
#[command(about = "Stage a GEOtop inputs directory and run the model")]
struct Args {
    /// Path to the inputs directory (must contain geotop.inpts)
    inputs_dir: PathBuf,

    /// Path to the model executable.
    /// Defaults to `geotop` on PATH, then the GEOTOP_EXE environment
    /// variable.
    #[arg(long)]
    exe: Option<PathBuf>,

    /// Run in this directory instead of a throwaway temporary one
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// JSON file of setting overrides to apply before the run
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Let the model's stdout/stderr through to the terminal
    #[arg(long)]
    show_output: bool,
}

fn main() {
    freshet_tools::init_logging();

    let args = Args::parse();

    if !args.inputs_dir.is_dir() {
        error!("'{}' is not a directory", args.inputs_dir.display());
        process::exit(1);
    }

    let exe = match exe::resolve(args.exe) {
        Ok(path) => path,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    info!("Model executable: {}", exe.display());

    let overrides = match &args.overrides {
        Some(path) => {
            let text = match fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) => {
                    error!("Error reading '{}': {}", path.display(), e);
                    process::exit(1);
                }
            };
            match Overrides::from_json(&text) {
                Ok(overrides) => overrides,
                Err(e) => {
                    error!("Invalid overrides in '{}': {}", path.display(), e);
                    process::exit(1);
                }
            }
        }
        None => Overrides::new(),
    };

    let schema = KeywordSchema::builtin();
    let options = RunOptions {
        check: true,
        capture_output: !args.show_output,
    };
    let launcher = match Launcher::new(&args.inputs_dir, exe, schema, options) {
        Ok(launcher) => launcher,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };
    info!(
        "Loaded {} settings from {}",
        launcher.settings().len(),
        args.inputs_dir.display()
    );

    let model = PlainRun::new(schema.clone());
    let result = match &args.workdir {
        Some(workdir) => launcher.run_in(&model, workdir, &overrides),
        None => launcher.run(&model, &overrides),
    };

    match result {
        Ok(()) => info!("Run complete"),
        Err(e) => {
            error!("Run failed: {e}");
            process::exit(1);
        }
    }
}
