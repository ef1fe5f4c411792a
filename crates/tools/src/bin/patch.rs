//!
//! Applies a JSON override set to a GEOtop settings file.
//!
//! Usage: `patch <inpts-file> --overrides FILE [-o OUTPUT]`
//!
//! Without `-o` the patched file is printed to stdout, so the change can
//! be inspected before touching anything on disk.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};

use freshet_settings::{patch, KeywordSchema, Overrides};

#[derive(Parser, Debug)]
#[command(name = "patch")]
#[command(about = "Apply a JSON override set to a GEOtop settings file")]
struct Args {
    /// Path to the settings file to patch
    inpts_file: PathBuf,

    /// JSON object of overrides; `null` values delete settings
    #[arg(long)]
    overrides: PathBuf,

    /// Write the patched file here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Leave out the annotation comments
    #[arg(long)]
    no_annotations: bool,
}

fn main() {
    freshet_tools::init_logging();

    let args = Args::parse();

    let original = match fs::read_to_string(&args.inpts_file) {
        Ok(text) => text,
        Err(e) => {
            error!("Error reading '{}': {}", args.inpts_file.display(), e);
            process::exit(1);
        }
    };

    let overrides_text = match fs::read_to_string(&args.overrides) {
        Ok(text) => text,
        Err(e) => {
            error!("Error reading '{}': {}", args.overrides.display(), e);
            process::exit(1);
        }
    };
    let overrides = match Overrides::from_json(&overrides_text) {
        Ok(overrides) => overrides,
        Err(e) => {
            error!("Invalid overrides in '{}': {}", args.overrides.display(), e);
            process::exit(1);
        }
    };
    info!("Applying {} overrides", overrides.len());

    let patched = patch(
        &original,
        &overrides,
        KeywordSchema::builtin(),
        !args.no_annotations,
    );

    match &args.output {
        Some(path) => {
            if let Err(e) = fs::write(path, patched) {
                error!("Error writing '{}': {}", path.display(), e);
                process::exit(1);
            }
            info!("Wrote {}", path.display());
        }
        None => print!("{patched}"),
    }
}
