//! Built-in themes used when no themes are configured.

use once_cell::sync::Lazy;

use super::kind::ThemeKind;
use super::theme::{Theme, TokenColor, EDITOR_BACKGROUND, EDITOR_FOREGROUND};

static GITHUB_DARK: Lazy<Theme> = Lazy::new(|| {
    Theme::new("github-dark", ThemeKind::Dark)
        .with_color(EDITOR_BACKGROUND, "#24292e")
        .with_color(EDITOR_FOREGROUND, "#e1e4e8")
        .with_color("editor.selectionBackground", "#3392ff44")
        .with_color("editorLineNumber.foreground", "#444d56")
        .with_color("editorLineNumber.activeForeground", "#e1e4e8")
        .with_color("editorGroup.border", "#1b1f23")
        .with_color("scrollbarSlider.background", "#6a737d33")
        .with_color("scrollbarSlider.hoverBackground", "#6a737d44")
        .with_color("focusBorder", "#005cc5")
        .with_token_color(
            TokenColor::new(["comment", "punctuation.definition.comment"])
                .with_foreground("#6a737d"),
        )
        .with_token_color(TokenColor::new(["keyword", "storage"]).with_foreground("#f97583"))
        .with_token_color(TokenColor::new(["string"]).with_foreground("#9ecbff"))
        .with_token_color(
            TokenColor::new(["constant", "variable.other.constant"]).with_foreground("#79b8ff"),
        )
        .with_token_color(TokenColor::new(["entity.name.function"]).with_foreground("#b392f0"))
        .with_token_color(TokenColor::new(["variable"]).with_foreground("#ffab70"))
        .with_token_color(TokenColor::new(["markup.italic"]).with_font_style("italic"))
});

static GITHUB_LIGHT: Lazy<Theme> = Lazy::new(|| {
    Theme::new("github-light", ThemeKind::Light)
        .with_color(EDITOR_BACKGROUND, "#ffffff")
        .with_color(EDITOR_FOREGROUND, "#24292e")
        .with_color("editor.selectionBackground", "#0366d625")
        .with_color("editorLineNumber.foreground", "#1b1f234d")
        .with_color("editorLineNumber.activeForeground", "#24292e")
        .with_color("editorGroup.border", "#e1e4e8")
        .with_color("scrollbarSlider.background", "#959da533")
        .with_color("scrollbarSlider.hoverBackground", "#959da544")
        .with_color("focusBorder", "#2188ff")
        .with_token_color(
            TokenColor::new(["comment", "punctuation.definition.comment"])
                .with_foreground("#6a737d"),
        )
        .with_token_color(TokenColor::new(["keyword", "storage"]).with_foreground("#d73a49"))
        .with_token_color(TokenColor::new(["string"]).with_foreground("#032f62"))
        .with_token_color(
            TokenColor::new(["constant", "variable.other.constant"]).with_foreground("#005cc5"),
        )
        .with_token_color(TokenColor::new(["entity.name.function"]).with_foreground("#6f42c1"))
        .with_token_color(TokenColor::new(["variable"]).with_foreground("#e36209"))
        .with_token_color(TokenColor::new(["markup.italic"]).with_font_style("italic"))
});

/// Look up a built-in theme by name.
///
/// Returns `None` if the name is not recognized.
pub fn builtin_theme(name: &str) -> Option<Theme> {
    match name {
        "github-dark" => Some(GITHUB_DARK.clone()),
        "github-light" => Some(GITHUB_LIGHT.clone()),
        _ => None,
    }
}

/// Names of all built-in themes.
pub const fn builtin_names() -> &'static [&'static str] {
    &["github-dark", "github-light"]
}

impl Theme {
    /// The default dark theme (`github-dark`).
    pub fn builtin_dark() -> Self {
        GITHUB_DARK.clone()
    }

    /// The default light theme (`github-light`).
    pub fn builtin_light() -> Self {
        GITHUB_LIGHT.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds() {
        assert_eq!(Theme::builtin_dark().kind(), ThemeKind::Dark);
        assert_eq!(Theme::builtin_light().kind(), ThemeKind::Light);
    }

    #[test]
    fn test_builtin_lookup_by_name() {
        for name in builtin_names() {
            let theme = builtin_theme(name).unwrap();
            assert_eq!(theme.name(), *name);
            assert!(theme.bg().is_some());
        }
        assert!(builtin_theme("solarized").is_none());
    }
}
