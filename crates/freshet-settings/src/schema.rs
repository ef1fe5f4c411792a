//! Keyword schema: the static mapping from keyword name to value type.
//!
//! The schema is loaded once (either from the bundled `keywords.json` or
//! from caller-supplied JSON) and read-only afterwards. Every parse and
//! print goes through it; a setting for a keyword it does not list cannot
//! be constructed.

use std::sync::LazyLock;

use indexmap::IndexMap;
use tracing::warn;

use crate::error::SchemaError;

/// Primitive type tag attached to a keyword.
///
/// `Other` carries a tag string the codec does not know how to coerce.
/// Such entries load fine (schema files may be newer than this crate) but
/// their values degrade to verbatim text with a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordType {
    /// IEEE double.
    Float,
    /// Signed integer.
    Int,
    /// `1` is true, any other integer is false.
    Bool,
    /// Trimmed remainder of the line, verbatim.
    Text,
    /// Comma-separated floats.
    Array,
    /// Recognized entry with an unrecognized tag.
    Other(String),
}

impl KeywordType {
    /// The tag string used in schema resources.
    pub fn tag(&self) -> &str {
        match self {
            KeywordType::Float => "float",
            KeywordType::Int => "int",
            KeywordType::Bool => "bool",
            KeywordType::Text => "string",
            KeywordType::Array => "array",
            KeywordType::Other(tag) => tag,
        }
    }
}

/// Immutable keyword → type table.
#[derive(Debug, Clone, Default)]
pub struct KeywordSchema {
    entries: IndexMap<String, KeywordType>,
}

/// `[A-Z][A-Za-z0-9_]*`
fn is_keyword_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

static BUILTIN: LazyLock<KeywordSchema> = LazyLock::new(|| {
    KeywordSchema::from_json(include_str!("../keywords.json"))
        .expect("bundled keywords.json is valid")
});

impl KeywordSchema {
    /// Load a schema from a JSON object of `keyword: tag` pairs.
    ///
    /// Fails on structurally invalid JSON or on keyword names outside
    /// `[A-Z][A-Za-z0-9_]*`. Unrecognized tag strings are kept as
    /// [`KeywordType::Other`] and reported on the warning channel.
    pub fn from_json(source: &str) -> Result<Self, SchemaError> {
        let raw: IndexMap<String, String> = serde_json::from_str(source)?;

        let mut entries = IndexMap::with_capacity(raw.len());
        for (name, tag) in raw {
            if !is_keyword_name(&name) {
                return Err(SchemaError::InvalidName(name));
            }
            let ty = match tag.as_str() {
                "float" => KeywordType::Float,
                "int" => KeywordType::Int,
                "bool" => KeywordType::Bool,
                "string" => KeywordType::Text,
                "array" => KeywordType::Array,
                _ => {
                    warn!("keyword {name} has unrecognized type tag '{tag}'");
                    KeywordType::Other(tag)
                }
            };
            entries.insert(name, ty);
        }
        Ok(Self { entries })
    }

    /// Load a schema from a JSON file, for embedders carrying their own
    /// keyword table.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, SchemaError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    /// Build a schema from explicit entries (mainly for tests and embedders
    /// wrapping other binaries).
    pub fn from_entries<I, K>(entries: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (K, KeywordType)>,
        K: Into<String>,
    {
        let mut map = IndexMap::new();
        for (name, ty) in entries {
            let name = name.into();
            if !is_keyword_name(&name) {
                return Err(SchemaError::InvalidName(name));
            }
            map.insert(name, ty);
        }
        Ok(Self { entries: map })
    }

    /// The schema bundled with the crate, covering the GEOtop keyword set.
    pub fn builtin() -> &'static KeywordSchema {
        &BUILTIN
    }

    /// Type tag for `key`, if the keyword is known.
    pub fn get(&self, key: &str) -> Option<&KeywordType> {
        self.entries.get(key)
    }

    /// Whether `key` is a known keyword.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the schema has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeywordType)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
