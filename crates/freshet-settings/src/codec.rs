//! The settings codec: one line in, one typed setting out, and back.
//!
//! Setting lines have the shape `KEY = value` with a keyword matching
//! `[A-Z]\w*`; everything after the `=` up to the end of the line is the
//! value text, coerced according to the keyword's schema tag. Comment
//! lines start with `!` (after optional whitespace) and blank lines are
//! whitespace-only; neither is a setting.
//!
//! Both directions are stateless and side-effect-free apart from the
//! warning channel used for unrecognized type tags.

use tracing::warn;

use crate::error::SettingsError;
use crate::schema::{KeywordSchema, KeywordType};
use crate::value::SettingValue;

/// Whether the line is a comment or blank line (passed through verbatim by
/// every reader and by the patch engine).
pub fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('!')
}

/// `[A-Z]\w*`
fn is_key(text: &str) -> bool {
    let mut chars = text.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split a setting line into its key and raw value text.
fn split_line(line: &str) -> Result<(&str, &str), SettingsError> {
    let malformed = || SettingsError::MalformedLine(line.trim_end_matches(['\n', '\r']).to_string());

    let body = line.trim_start();
    let eq = body.find('=').ok_or_else(malformed)?;
    let key = body[..eq].trim_end();
    if !is_key(key) {
        return Err(malformed());
    }
    let value = body[eq + 1..].trim();
    Ok((key, value))
}

/// Parse one setting line into a `(key, value)` pair.
///
/// Fails with [`SettingsError::MalformedLine`] when the line does not have
/// the `KEY = value` shape and with [`SettingsError::UnknownKeyword`] when
/// the keyword is not in the schema. Value text that cannot be coerced to
/// the keyword's numeric tag propagates the numeric parse failure. A
/// keyword carrying an unrecognized tag parses to verbatim text with a
/// warning instead of an error.
pub fn parse_line(
    line: &str,
    schema: &KeywordSchema,
) -> Result<(String, SettingValue), SettingsError> {
    let (key, raw) = split_line(line)?;

    let ty = schema
        .get(key)
        .ok_or_else(|| SettingsError::UnknownKeyword(key.to_string()))?;

    let value = match ty {
        KeywordType::Float => SettingValue::Float(parse_float(key, raw)?),
        KeywordType::Int => SettingValue::Int(parse_int(key, raw)?),
        // By convention 1 means true and any other integer means false.
        KeywordType::Bool => SettingValue::Bool(parse_int(key, raw)? == 1),
        KeywordType::Text => SettingValue::Text(raw.to_string()),
        KeywordType::Array => {
            let values = raw
                .split(',')
                .map(|token| parse_float(key, token.trim()))
                .collect::<Result<Vec<f64>, _>>()?;
            SettingValue::Array(values)
        }
        KeywordType::Other(tag) => {
            warn!("keyword {key} has unknown type '{tag}', keeping value verbatim");
            SettingValue::Text(raw.to_string())
        }
    };

    Ok((key.to_string(), value))
}

fn parse_float(key: &str, token: &str) -> Result<f64, SettingsError> {
    token.parse().map_err(|source| SettingsError::InvalidFloat {
        key: key.to_string(),
        value: token.to_string(),
        source,
    })
}

fn parse_int(key: &str, token: &str) -> Result<i64, SettingsError> {
    token.parse().map_err(|source| SettingsError::InvalidInt {
        key: key.to_string(),
        value: token.to_string(),
        source,
    })
}

/// Render a `(key, value)` pair as a setting line, without consulting the
/// schema. The patch engine uses this as the fallback for override keys
/// that failed schema validation.
pub fn format_line(key: &str, value: &SettingValue) -> String {
    format!("{key} = {value}\n")
}

/// Print one setting as a line of file text.
///
/// Fails with [`SettingsError::UnknownKeyword`] when the keyword is not in
/// the schema; a keyword carrying an unrecognized tag prints verbatim with
/// a warning. For every well-typed pair the printed line parses back to an
/// equal pair ([`SettingValue`]'s `Display` uses shortest-round-trip float
/// text).
pub fn print_setting(
    key: &str,
    value: &SettingValue,
    schema: &KeywordSchema,
) -> Result<String, SettingsError> {
    let ty = schema
        .get(key)
        .ok_or_else(|| SettingsError::UnknownKeyword(key.to_string()))?;

    if let KeywordType::Other(tag) = ty {
        warn!("keyword {key} has unknown type '{tag}', printing value verbatim");
    }

    Ok(format_line(key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> &'static KeywordSchema {
        KeywordSchema::builtin()
    }

    #[test]
    fn comment_and_blank_detection() {
        assert!(is_comment_or_blank(""));
        assert!(is_comment_or_blank("   \t"));
        assert!(is_comment_or_blank("! a comment"));
        assert!(is_comment_or_blank("   ! indented comment"));
        assert!(!is_comment_or_blank("Latitude = 46.5"));
    }

    #[test]
    fn parses_each_type() {
        let (key, value) = parse_line("Latitude = 46.5", schema()).unwrap();
        assert_eq!(key, "Latitude");
        assert_eq!(value, SettingValue::Float(46.5));

        let (_, value) = parse_line("SoilLayerNumber = 5", schema()).unwrap();
        assert_eq!(value, SettingValue::Int(5));

        let (_, value) = parse_line("WindCompaction = 1", schema()).unwrap();
        assert_eq!(value, SettingValue::Bool(true));
        let (_, value) = parse_line("WindCompaction = 0", schema()).unwrap();
        assert_eq!(value, SettingValue::Bool(false));
        // Any integer other than 1 is false, not just 0.
        let (_, value) = parse_line("WindCompaction = 2", schema()).unwrap();
        assert_eq!(value, SettingValue::Bool(false));

        let (_, value) = parse_line("MeteoFile = meteo/station", schema()).unwrap();
        assert_eq!(value, SettingValue::Text("meteo/station".into()));

        let (_, value) = parse_line("SoilLayerThicknesses = 10,20,30", schema()).unwrap();
        assert_eq!(value, SettingValue::Array(vec![10.0, 20.0, 30.0]));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let (key, value) = parse_line("   Latitude   =   46.5  \n", schema()).unwrap();
        assert_eq!(key, "Latitude");
        assert_eq!(value, SettingValue::Float(46.5));

        let (_, value) = parse_line("SoilLayerThicknesses = 10 , 20 , 30", schema()).unwrap();
        assert_eq!(value, SettingValue::Array(vec![10.0, 20.0, 30.0]));
    }

    #[test]
    fn rejects_unknown_keyword() {
        let err = parse_line("NotAKeyword = 1", schema()).unwrap_err();
        assert!(matches!(err, SettingsError::UnknownKeyword(key) if key == "NotAKeyword"));
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in ["not a setting", "= 1", "lowercase = 1", "Latitude 46.5"] {
            let err = parse_line(line, schema()).unwrap_err();
            assert!(
                matches!(&err, SettingsError::MalformedLine(text) if line.starts_with(text.as_str())),
                "expected MalformedLine for {line:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn propagates_numeric_failures() {
        let err = parse_line("Latitude = north", schema()).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidFloat { .. }));

        let err = parse_line("SoilLayerNumber = 5.5", schema()).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidInt { .. }));

        // Empty array tokens fail.
        let err = parse_line("SoilLayerThicknesses = 10,,30", schema()).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidFloat { .. }));
    }

    #[test]
    fn unknown_tag_degrades_to_text() {
        let (_, value) = parse_line("SpecialPlotBegin = 01/06/2014 00:00", schema()).unwrap();
        assert_eq!(value, SettingValue::Text("01/06/2014 00:00".into()));
    }

    #[test]
    fn prints_each_type() {
        let schema = schema();
        assert_eq!(
            print_setting("Latitude", &SettingValue::Float(46.5), schema).unwrap(),
            "Latitude = 46.5\n"
        );
        assert_eq!(
            print_setting("WindCompaction", &SettingValue::Bool(true), schema).unwrap(),
            "WindCompaction = 1\n"
        );
        assert_eq!(
            print_setting("WindCompaction", &SettingValue::Bool(false), schema).unwrap(),
            "WindCompaction = 0\n"
        );
        assert_eq!(
            print_setting(
                "SoilLayerThicknesses",
                &SettingValue::Array(vec![10.0, 20.0, 30.0]),
                schema
            )
            .unwrap(),
            "SoilLayerThicknesses = 10, 20, 30\n"
        );
        assert!(matches!(
            print_setting("NotAKeyword", &SettingValue::Int(1), schema),
            Err(SettingsError::UnknownKeyword(_))
        ));
    }

    #[test]
    fn roundtrip_holds_for_well_typed_pairs() {
        let schema = schema();
        let cases = [
            ("Latitude", SettingValue::Float(46.5)),
            ("Latitude", SettingValue::Float(-0.125)),
            ("Latitude", SettingValue::Float(1e-9)),
            ("SoilLayerNumber", SettingValue::Int(-3)),
            ("WindCompaction", SettingValue::Bool(true)),
            ("WindCompaction", SettingValue::Bool(false)),
            ("MeteoFile", SettingValue::Text("path/to meteo".into())),
            (
                "SoilLayerThicknesses",
                SettingValue::Array(vec![10.0, 20.5, 0.001]),
            ),
        ];
        for (key, value) in cases {
            let line = print_setting(key, &value, schema).unwrap();
            let (parsed_key, parsed_value) = parse_line(&line, schema).unwrap();
            assert_eq!(parsed_key, key);
            assert_eq!(parsed_value, value, "roundtrip failed for {line:?}");
        }
    }
}
