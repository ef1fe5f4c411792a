//! The patch engine: rewrite a settings file with a set of overrides.
//!
//! Patching is a single pass over the original lines. Comment and blank
//! lines pass through verbatim. A setting line whose keyword appears in
//! the override set is overwritten (with an annotation of the previous
//! value), canonically re-printed (when the override equals the old
//! value), or commented out (when the override is a [`Override::Delete`]
//! tombstone). Lines that fail to parse are annotated and preserved,
//! never dropped. Override keys the original file never mentions are
//! appended in a trailing section.
//!
//! The engine never fails: per-line errors downgrade to annotations, and
//! an override key outside the schema falls back to an unverified literal
//! line. With annotations enabled the output carries a full audit trail
//! of what changed.

use chrono::Local;
use indexmap::IndexMap;
use serde::Deserialize;

use crate::codec::{self, is_comment_or_blank};
use crate::schema::KeywordSchema;
use crate::value::SettingValue;

/// Leading text of the header line the engine writes; a line starting with
/// this from an earlier patch is replaced rather than accumulated.
const HEADER_PREFIX: &str = "! GEOtop input file written by freshet";

/// Annotation prefix for overwrite/delete/error comments.
const NOTE_PREFIX: &str = "! freshet:";

/// One desired change to a settings file.
#[derive(Debug, Clone, PartialEq)]
pub enum Override {
    /// Set the keyword to this value (overwriting or appending).
    Set(SettingValue),
    /// Remove the keyword: its line is commented out in the output.
    Delete,
}

/// Ordered set of desired overrides, keyed by keyword.
///
/// The JSON representation is a plain object; `null` marks a deletion:
///
/// ```json
/// { "Latitude": 46.5, "SoilLayerThicknesses": [10, 20, 30], "PointAll": null }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "IndexMap<String, Option<SettingValue>>")]
pub struct Overrides {
    entries: IndexMap<String, Override>,
}

impl From<IndexMap<String, Option<SettingValue>>> for Overrides {
    fn from(raw: IndexMap<String, Option<SettingValue>>) -> Self {
        let entries = raw
            .into_iter()
            .map(|(key, value)| {
                let ov = match value {
                    Some(value) => Override::Set(value),
                    None => Override::Delete,
                };
                (key, ov)
            })
            .collect();
        Self { entries }
    }
}

impl Overrides {
    /// Empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an override set from a JSON object.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Request `key` to be set to `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> &mut Self {
        self.entries.insert(key.into(), Override::Set(value.into()));
        self
    }

    /// Request `key` to be deleted.
    pub fn delete(&mut self, key: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), Override::Delete);
        self
    }

    /// Number of requested changes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no changes are requested.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate requested changes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Override)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Patch `original` settings-file text with `overrides`.
///
/// Returns the new file content; the original is never modified. With
/// `annotate` set, every overwrite, deletion, addition and unparseable
/// line gets an explanatory comment.
pub fn patch(
    original: &str,
    overrides: &Overrides,
    schema: &KeywordSchema,
    annotate: bool,
) -> String {
    let mut remaining = overrides.entries.clone();
    let mut out = String::with_capacity(original.len() + 256);

    out.push_str(&format!(
        "{HEADER_PREFIX} {}\n",
        Local::now().format("%x %X")
    ));

    let mut prev: Option<&str> = None;
    for line in original.lines() {
        let last = prev;
        prev = Some(line);

        if is_comment_or_blank(line) {
            // Drop the header of a previous patch so repeated patching
            // stays byte-identical apart from the timestamp.
            if line.starts_with(HEADER_PREFIX) {
                continue;
            }
            out.push_str(line);
            out.push('\n');
            continue;
        }

        match codec::parse_line(line, schema) {
            Err(err) => {
                if annotate {
                    let note = format!("{NOTE_PREFIX} {err}");
                    // A preserved line keeps its annotation from an earlier
                    // patch; don't stack another copy on top of it.
                    if last != Some(note.as_str()) {
                        out.push_str(&note);
                        out.push('\n');
                    }
                }
                out.push_str(line);
                out.push('\n');
            }
            Ok((key, old_value)) => match remaining.shift_remove(&key) {
                None => {
                    out.push_str(line);
                    out.push('\n');
                }
                Some(Override::Delete) => {
                    if annotate {
                        out.push_str(&format!(
                            "{NOTE_PREFIX} {key} deleted, was {old_value}\n"
                        ));
                    }
                    out.push('!');
                    out.push_str(line);
                    out.push('\n');
                }
                Some(Override::Set(new_value)) => {
                    if new_value == old_value {
                        // Unchanged: re-emit the canonical printed form.
                        out.push_str(&codec::format_line(&key, &old_value));
                    } else {
                        if annotate {
                            out.push_str(&format!(
                                "{NOTE_PREFIX} {key} overwritten, was {old_value}\n"
                            ));
                        }
                        out.push_str(&codec::format_line(&key, &new_value));
                    }
                }
            },
        }
    }

    let has_additions = remaining
        .values()
        .any(|ov| matches!(ov, Override::Set(_)));
    if has_additions {
        out.push('\n');
        if annotate {
            out.push_str("! Settings added by freshet\n");
        }
        for (key, ov) in remaining {
            let Override::Set(value) = ov else {
                // A tombstone for a keyword the file never had.
                continue;
            };
            match codec::print_setting(&key, &value, schema) {
                Ok(line) => out.push_str(&line),
                Err(err) => {
                    // Keep the entry, but flag that it bypassed the schema.
                    if annotate {
                        out.push_str(&format!("{NOTE_PREFIX} {err}\n"));
                    }
                    out.push_str(&codec::format_line(&key, &value));
                }
            }
        }
    }

    out
}

/// The collaborator entry point used by the launcher: patch with
/// annotations enabled.
pub fn apply_overrides(original: &str, overrides: &Overrides, schema: &KeywordSchema) -> String {
    patch(original, overrides, schema, true)
}
