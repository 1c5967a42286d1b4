//! Compact CSS rule rendering.

use std::fmt::{self, Display, Write as _};

/// A style rule: a selector list and its declarations.
///
/// Renders compactly as `a,b{x:1;y:2}`. A rule without declarations renders
/// as nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssRule {
    selectors: Vec<String>,
    declarations: Vec<(String, String)>,
}

impl CssRule {
    /// Creates a rule for a single selector.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selectors: vec![selector.into()],
            declarations: Vec::new(),
        }
    }

    /// Creates a rule for a selector list.
    pub fn with_selectors<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selectors: selectors.into_iter().map(Into::into).collect(),
            declarations: Vec::new(),
        }
    }

    /// Appends a declaration.
    pub fn declare(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(property, value);
        self
    }

    /// Appends a declaration in place.
    pub fn push(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.declarations.push((property.into(), value.into()));
    }

    /// Appends several declarations.
    pub fn declare_all<'a, I>(mut self, declarations: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (property, value) in declarations {
            self.push(property, value);
        }
        self
    }

    /// Returns the selector list.
    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Returns `true` if the rule has no declarations.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Appends the rendered rule to `out`.
    pub fn write_to(&self, out: &mut String) {
        if self.is_empty() {
            return;
        }
        let _ = write!(out, "{self}");
    }
}

impl Display for CssRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        f.write_str(&self.selectors.join(","))?;
        f.write_char('{')?;
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_char(';')?;
            }
            write!(f, "{property}:{value}")?;
        }
        f.write_char('}')
    }
}

/// Wraps `body` in an at-rule block, e.g. `@media (x){body}`.
///
/// Returns an empty string for an empty body.
pub fn at_rule(name: &str, prelude: &str, body: &str) -> String {
    if body.is_empty() {
        return String::new();
    }
    if prelude.is_empty() {
        format!("@{name}{{{body}}}")
    } else {
        format!("@{name} {prelude}{{{body}}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_compact() {
        let rule = CssRule::new(".a")
            .declare("color", "red")
            .declare("--x", "var(--y,inherit)");
        assert_eq!(rule.to_string(), ".a{color:red;--x:var(--y,inherit)}");
    }

    #[test]
    fn test_selector_list() {
        let rule = CssRule::with_selectors([".a", ".b .c"]).declare("margin", "0");
        assert_eq!(rule.to_string(), ".a,.b .c{margin:0}");
    }

    #[test]
    fn test_empty_rule_renders_nothing() {
        let mut out = String::from("x");
        CssRule::new(".a").write_to(&mut out);
        assert_eq!(out, "x");
        assert_eq!(CssRule::new(".a").to_string(), "");
    }

    #[test]
    fn test_at_rule() {
        assert_eq!(
            at_rule("media", "(prefers-color-scheme: light)", "a{b:c}"),
            "@media (prefers-color-scheme: light){a{b:c}}"
        );
        assert_eq!(at_rule("media", "(x)", ""), "");
    }
}
