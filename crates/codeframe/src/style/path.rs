//! Style setting paths and their CSS variable names.
//!
//! A path is one or more identifier segments joined by `.`: core settings use
//! a bare property (`codeBackground`), plugin settings are prefixed with the
//! plugin name (`frames.shadowColor`). Segments are restricted to ASCII
//! letters, digits and `_` (not starting with a digit), so joining them with
//! `-` in the variable name can always be undone.

use crate::error::{EngineError, Result};

/// Prefix of every generated CSS variable.
pub const CSS_VAR_PREFIX: &str = "--cf-";

/// A validated style setting path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleSettingPath(String);

impl StyleSettingPath {
    /// Validates and wraps a path.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidStyleSettingPath`] when the path is empty
    /// or a segment is not an identifier.
    pub fn parse(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(invalid(&path, "path is empty"));
        }
        for segment in path.split('.') {
            if let Some(reason) = check_segment(segment) {
                return Err(invalid(&path, &reason));
            }
        }
        Ok(Self(path))
    }

    /// Builds the path for `property` declared by `contributor`.
    ///
    /// The core contributor (`None`) declares bare paths.
    pub fn for_contributor(contributor: Option<&str>, property: &str) -> Result<Self> {
        match contributor {
            Some(name) => Self::parse(format!("{name}.{property}")),
            None => Self::parse(property),
        }
    }

    /// Recovers a path from a variable name produced by [`css_var_name`].
    ///
    /// [`css_var_name`]: StyleSettingPath::css_var_name
    pub fn from_css_var_name(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(CSS_VAR_PREFIX)?;
        Self::parse(rest.replace('-', ".")).ok()
    }

    /// Returns the dotted path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns the CSS variable name, e.g. `--cf-frames-shadowColor`.
    pub fn css_var_name(&self) -> String {
        css_var_name(&self.0)
    }

    /// Returns a `var()` reference to this setting.
    pub fn css_var(&self) -> String {
        css_var(&self.0)
    }
}

impl std::fmt::Display for StyleSettingPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StyleSettingPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// CSS variable name for a dotted path. The path is not validated.
pub fn css_var_name(path: &str) -> String {
    let mut name = String::with_capacity(CSS_VAR_PREFIX.len() + path.len());
    name.push_str(CSS_VAR_PREFIX);
    name.extend(path.chars().map(|c| if c == '.' { '-' } else { c }));
    name
}

/// `var(--cf-...)` reference for a dotted path. The path is not validated.
pub fn css_var(path: &str) -> String {
    format!("var({})", css_var_name(path))
}

fn check_segment(segment: &str) -> Option<String> {
    let mut chars = segment.chars();
    match chars.next() {
        None => Some("empty segment".to_string()),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            Some(format!("segment '{segment}' must start with a letter or '_'"))
        }
        _ if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_')) => Some(format!(
            "segment '{segment}' may only contain ASCII letters, digits and '_'"
        )),
        _ => None,
    }
}

fn invalid(path: &str, reason: &str) -> EngineError {
    EngineError::InvalidStyleSettingPath {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
