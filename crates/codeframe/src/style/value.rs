//! Style values: a literal CSS value or a `[dark, light]` pair.

use serde::{Deserialize, Deserializer};

use crate::theme::ThemeKind;

/// A style setting value as written in overrides and static defaults.
///
/// # Example
///
/// ```rust
/// use codeframe::{StyleValue, ThemeKind};
///
/// let radius = StyleValue::from("4px");
/// assert_eq!(radius.for_kind(ThemeKind::Dark), "4px");
///
/// let border = StyleValue::per_kind("#30363d", "#d0d7de");
/// assert_eq!(border.for_kind(ThemeKind::Light), "#d0d7de");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleValue {
    /// The same value for every theme.
    Literal(String),
    /// One value for dark themes, another for light themes.
    PerKind { dark: String, light: String },
}

impl StyleValue {
    /// Creates a per-kind pair.
    pub fn per_kind(dark: impl Into<String>, light: impl Into<String>) -> Self {
        StyleValue::PerKind {
            dark: dark.into(),
            light: light.into(),
        }
    }

    /// Picks the value that applies to a theme of `kind`.
    pub fn for_kind(&self, kind: ThemeKind) -> &str {
        match self {
            StyleValue::Literal(value) => value,
            StyleValue::PerKind { dark, light } => match kind {
                ThemeKind::Dark => dark,
                ThemeKind::Light => light,
            },
        }
    }

    /// Returns `true` for a `[dark, light]` pair.
    pub fn is_per_kind(&self) -> bool {
        matches!(self, StyleValue::PerKind { .. })
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Literal(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Literal(value)
    }
}

impl From<(&str, &str)> for StyleValue {
    fn from((dark, light): (&str, &str)) -> Self {
        StyleValue::per_kind(dark, light)
    }
}

/// Scalars accepted where a CSS value is expected. YAML authors write
/// `codeLineHeight: 1.6` without quotes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    fn into_css(self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Text(s) => s,
        }
    }
}

impl<'de> Deserialize<'de> for StyleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(Scalar),
            Pair([Scalar; 2]),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::One(value) => StyleValue::Literal(value.into_css()),
            Raw::Pair([dark, light]) => StyleValue::PerKind {
                dark: dark.into_css(),
                light: light.into_css(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_ignores_kind() {
        let value = StyleValue::from("1px");
        assert_eq!(value.for_kind(ThemeKind::Dark), "1px");
        assert_eq!(value.for_kind(ThemeKind::Light), "1px");
        assert!(!value.is_per_kind());
    }

    #[test]
    fn test_per_kind_picks_by_kind() {
        let value: StyleValue = ("#000", "#fff").into();
        assert_eq!(value.for_kind(ThemeKind::Dark), "#000");
        assert_eq!(value.for_kind(ThemeKind::Light), "#fff");
        assert!(value.is_per_kind());
    }

    #[test]
    fn test_deserialize_string_and_numbers() {
        let value: StyleValue = serde_yaml::from_str("'0.3rem'").unwrap();
        assert_eq!(value, StyleValue::from("0.3rem"));

        let value: StyleValue = serde_yaml::from_str("1.6").unwrap();
        assert_eq!(value, StyleValue::from("1.6"));

        let value: StyleValue = serde_yaml::from_str("400").unwrap();
        assert_eq!(value, StyleValue::from("400"));
    }

    #[test]
    fn test_deserialize_pair() {
        let value: StyleValue = serde_json::from_str(r##"["#111", "#eee"]"##).unwrap();
        assert_eq!(value, StyleValue::per_kind("#111", "#eee"));
    }

    #[test]
    fn test_deserialize_rejects_maps_and_triples() {
        assert!(serde_yaml::from_str::<StyleValue>("{a: b}").is_err());
        assert!(serde_yaml::from_str::<StyleValue>("[a, b, c]").is_err());
    }
}
