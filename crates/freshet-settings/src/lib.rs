//! Parsing and patching of GEOtop settings files.
//!
//! GEOtop reads its configuration from `geotop.inpts`, a line-oriented
//! UTF-8 text format: `!` starts a comment, blank lines are ignored, and
//! every other line is a `KEY = value` setting. The type of each value is
//! not encoded in the file; it comes from a keyword schema bundled with
//! this crate.
//!
//! # Modules
//!
//! - [`schema`] — keyword → type table, loaded once and read-only
//! - [`value`] — the typed value union
//! - [`codec`] — stateless line parse/print
//! - [`settings`] — ordered mapping of one run's settings
//! - [`patch`] — rewrite a file with an override set, annotated
//!
//! # Example
//!
//! ```
//! use freshet_settings::{apply_overrides, KeywordSchema, Overrides};
//!
//! let schema = KeywordSchema::builtin();
//! let mut overrides = Overrides::new();
//! overrides.set("Latitude", 46.5);
//!
//! let patched = apply_overrides("Latitude = 45\n", &overrides, schema);
//! assert!(patched.contains("Latitude = 46.5"));
//! ```

pub mod codec;
pub mod error;
pub mod patch;
pub mod schema;
pub mod settings;
pub mod value;

pub use codec::{is_comment_or_blank, parse_line, print_setting};
pub use error::{SchemaError, SettingsError};
pub use patch::{apply_overrides, patch, Override, Overrides};
pub use schema::{KeywordSchema, KeywordType};
pub use settings::Settings;
pub use value::SettingValue;
