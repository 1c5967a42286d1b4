//! Theme kind: whether a theme is designed for a dark or a light background.

use serde::{Deserialize, Serialize};

/// The background a theme is designed for.
///
/// The kind drives per-kind style values (`[dark, light]` pairs), the
/// `prefers-color-scheme` media query and the contrast direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    /// Dark background, light text.
    Dark,
    /// Light background, dark text.
    Light,
}

impl ThemeKind {
    /// Returns the other kind.
    pub fn opposite(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }

    /// Returns the kind as used in CSS (`dark` / `light`).
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }
}

impl std::fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite() {
        assert_eq!(ThemeKind::Dark.opposite(), ThemeKind::Light);
        assert_eq!(ThemeKind::Light.opposite(), ThemeKind::Dark);
    }

    #[test]
    fn test_deserialize_lowercase() {
        let kind: ThemeKind = serde_yaml::from_str("dark").unwrap();
        assert_eq!(kind, ThemeKind::Dark);
        assert_eq!(kind.to_string(), "dark");
    }
}
