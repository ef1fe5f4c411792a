//! Typed setting values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The value held by one setting.
///
/// The variant must agree with the keyword's schema tag. Values are built
/// by [`crate::codec::parse_line`] when reading a file, or directly by
/// callers assembling override sets (the untagged serde representation
/// accepts plain JSON scalars and arrays).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// On/off flag, written as `1`/`0` in the settings file.
    Bool(bool),
    /// Integer count, index or step width.
    Int(i64),
    /// Scalar.
    Float(f64),
    /// Free-form text: paths, column headers, dates.
    Text(String),
    /// Comma-separated list of floats, one entry per layer/station/class.
    Array(Vec<f64>),
}

impl SettingValue {
    /// Numeric view, promoting integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingValue::Float(v) => Some(*v),
            SettingValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Integer view.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Flag view.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Text view.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Array view.
    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            SettingValue::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Short variant name, used in diagnostics.
    pub fn variant(&self) -> &'static str {
        match self {
            SettingValue::Bool(_) => "bool",
            SettingValue::Int(_) => "int",
            SettingValue::Float(_) => "float",
            SettingValue::Text(_) => "string",
            SettingValue::Array(_) => "array",
        }
    }
}

/// Renders the value exactly as it appears on the right-hand side of a
/// setting line: booleans as `1`/`0`, arrays as a bare comma list.
impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(v) => write!(f, "{}", if *v { 1 } else { 0 }),
            SettingValue::Int(v) => write!(f, "{v}"),
            SettingValue::Float(v) => write!(f, "{v}"),
            SettingValue::Text(v) => write!(f, "{v}"),
            SettingValue::Array(values) => {
                let mut first = true;
                for v in values {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

impl From<f64> for SettingValue {
    fn from(v: f64) -> Self {
        SettingValue::Float(v)
    }
}

impl From<i64> for SettingValue {
    fn from(v: i64) -> Self {
        SettingValue::Int(v)
    }
}

impl From<bool> for SettingValue {
    fn from(v: bool) -> Self {
        SettingValue::Bool(v)
    }
}

impl From<&str> for SettingValue {
    fn from(v: &str) -> Self {
        SettingValue::Text(v.to_string())
    }
}

impl From<Vec<f64>> for SettingValue {
    fn from(v: Vec<f64>) -> Self {
        SettingValue::Array(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_file_syntax() {
        assert_eq!(SettingValue::Bool(true).to_string(), "1");
        assert_eq!(SettingValue::Bool(false).to_string(), "0");
        assert_eq!(SettingValue::Int(42).to_string(), "42");
        assert_eq!(SettingValue::Float(46.5).to_string(), "46.5");
        assert_eq!(SettingValue::Text("meteo.txt".into()).to_string(), "meteo.txt");
        assert_eq!(
            SettingValue::Array(vec![10.0, 20.0, 30.0]).to_string(),
            "10, 20, 30"
        );
        assert_eq!(SettingValue::Array(vec![]).to_string(), "");
    }

    #[test]
    fn untagged_json_roundtrip() {
        let v: SettingValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, SettingValue::Bool(true));
        let v: SettingValue = serde_json::from_str("3").unwrap();
        assert_eq!(v, SettingValue::Int(3));
        let v: SettingValue = serde_json::from_str("46.5").unwrap();
        assert_eq!(v, SettingValue::Float(46.5));
        let v: SettingValue = serde_json::from_str("\"output/\"").unwrap();
        assert_eq!(v, SettingValue::Text("output/".into()));
        let v: SettingValue = serde_json::from_str("[10, 20]").unwrap();
        assert_eq!(v, SettingValue::Array(vec![10.0, 20.0]));
    }

    #[test]
    fn float_view_promotes_ints() {
        assert_eq!(SettingValue::Int(3).as_float(), Some(3.0));
        assert_eq!(SettingValue::Float(0.5).as_float(), Some(0.5));
        assert_eq!(SettingValue::Bool(true).as_float(), None);
    }
}
