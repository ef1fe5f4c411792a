//! Ordered keyword → value mapping parsed from a settings file.

use indexmap::IndexMap;
use tracing::warn;

use crate::codec::{self, is_comment_or_blank};
use crate::error::SettingsError;
use crate::schema::{KeywordSchema, KeywordType};
use crate::value::SettingValue;

/// The settings of one model run, in order of first appearance.
///
/// Built by reading a settings file top to bottom: comment and blank lines
/// are skipped, malformed or unknown setting lines are warned about and
/// skipped (the reader is fail-soft; the patch engine is the place where
/// such lines are preserved), and a duplicated keyword keeps its original
/// position but takes the later value.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    entries: IndexMap<String, SettingValue>,
}

fn type_matches(ty: &KeywordType, value: &SettingValue) -> bool {
    matches!(
        (ty, value),
        (KeywordType::Float, SettingValue::Float(_))
            | (KeywordType::Float, SettingValue::Int(_))
            | (KeywordType::Int, SettingValue::Int(_))
            | (KeywordType::Bool, SettingValue::Bool(_))
            | (KeywordType::Text, SettingValue::Text(_))
            | (KeywordType::Array, SettingValue::Array(_))
            | (KeywordType::Other(_), _)
    )
}

impl Settings {
    /// Empty settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse full settings-file text, fail-soft.
    pub fn parse(text: &str, schema: &KeywordSchema) -> Self {
        let mut settings = Self::new();
        for line in text.lines() {
            if is_comment_or_blank(line) {
                continue;
            }
            match codec::parse_line(line, schema) {
                Ok((key, value)) => {
                    settings.entries.insert(key, value);
                }
                Err(err) => warn!("{err}, skipping"),
            }
        }
        settings
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.entries.get(key)
    }

    /// Insert or replace a setting, enforcing the schema invariants: the
    /// keyword must be known and the value variant must agree with its tag
    /// (integers are accepted where floats are expected).
    pub fn set(
        &mut self,
        key: &str,
        value: SettingValue,
        schema: &KeywordSchema,
    ) -> Result<(), SettingsError> {
        let ty = schema
            .get(key)
            .ok_or_else(|| SettingsError::UnknownKeyword(key.to_string()))?;
        if !type_matches(ty, &value) {
            return Err(SettingsError::TypeMismatch {
                key: key.to_string(),
                expected: ty.tag().to_string(),
                found: value.variant().to_string(),
            });
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    /// Remove a setting, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<SettingValue> {
        self.entries.shift_remove(key)
    }

    /// Whether `key` is set.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of settings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no settings are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate settings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Serialize every setting back to file text, one line each, in
    /// insertion order.
    pub fn dump(&self, schema: &KeywordSchema) -> Result<String, SettingsError> {
        let mut out = String::new();
        for (key, value) in &self.entries {
            out.push_str(&codec::print_setting(key, value, schema)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> &'static KeywordSchema {
        KeywordSchema::builtin()
    }

    const INPTS: &str = "\
! Matsch B2 point simulation
Latitude = 46.5
Longitude = 10.5

WindCompaction = 1
SoilLayerThicknesses = 10, 20, 30
";

    #[test]
    fn parses_a_file_in_order() {
        let settings = Settings::parse(INPTS, schema());
        assert_eq!(settings.len(), 4);
        let keys: Vec<&str> = settings.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "Latitude",
                "Longitude",
                "WindCompaction",
                "SoilLayerThicknesses"
            ]
        );
        assert_eq!(settings.get("Latitude"), Some(&SettingValue::Float(46.5)));
    }

    #[test]
    fn later_duplicates_win() {
        let settings = Settings::parse("Latitude = 1\nLatitude = 2\n", schema());
        assert_eq!(settings.len(), 1);
        assert_eq!(settings.get("Latitude"), Some(&SettingValue::Float(2.0)));
    }

    #[test]
    fn malformed_and_unknown_lines_are_skipped() {
        let text = "Latitude = 46.5\nnot a setting\nNotAKeyword = 1\nLongitude = 10.5\n";
        let settings = Settings::parse(text, schema());
        assert_eq!(settings.len(), 2);
        assert!(settings.contains("Latitude"));
        assert!(settings.contains("Longitude"));
    }

    #[test]
    fn set_enforces_schema() {
        let mut settings = Settings::new();
        settings
            .set("Latitude", SettingValue::Float(46.5), schema())
            .unwrap();
        // Integers are fine where floats are expected.
        settings
            .set("Longitude", SettingValue::Int(10), schema())
            .unwrap();

        let err = settings
            .set("NotAKeyword", SettingValue::Int(1), schema())
            .unwrap_err();
        assert!(matches!(err, SettingsError::UnknownKeyword(_)));

        let err = settings
            .set("WindCompaction", SettingValue::Text("yes".into()), schema())
            .unwrap_err();
        assert!(matches!(err, SettingsError::TypeMismatch { .. }));
    }

    #[test]
    fn dump_reproduces_parseable_text() {
        let settings = Settings::parse(INPTS, schema());
        let dumped = settings.dump(schema()).unwrap();
        let reparsed = Settings::parse(&dumped, schema());
        assert_eq!(reparsed.len(), settings.len());
        for (key, value) in settings.iter() {
            assert_eq!(reparsed.get(key), Some(value));
        }
    }
}
