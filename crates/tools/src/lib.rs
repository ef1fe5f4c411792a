//! Freshet Tools
//!
//! CLI tools for running and patching GEOtop simulations.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging with a default filter.
///
/// Use the `RUST_LOG` environment variable to override the default filter.
/// Default is `info` for freshet crates and `warn` for others.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("warn,freshet_tools=info,freshet_model=info,freshet_settings=info")
    });

    fmt().with_env_filter(filter).with_target(false).init();
}
