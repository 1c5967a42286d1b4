//! Theme struct holding the palette a style variant is derived from.
//!
//! A theme is a snapshot of an editor color theme: a name, a kind
//! (dark/light), VS Code-style workbench colors, and the token colors used
//! for syntax highlighting. It can be built programmatically or
//! deserialized from YAML/JSON in the VS Code theme shape.
//!
//! # Construction Methods
//!
//! ## Programmatic (Builder API)
//!
//! ```rust
//! use codeframe::{Theme, ThemeKind, TokenColor};
//!
//! let theme = Theme::new("midnight", ThemeKind::Dark)
//!     .with_bg("#101418")
//!     .with_fg("#d8dee9")
//!     .with_color("editor.selectionBackground", "#3b4252")
//!     .with_token_color(TokenColor::new(["comment"]).with_foreground("#616e88"));
//!
//! assert_eq!(theme.bg(), Some("#101418"));
//! ```
//!
//! ## From YAML
//!
//! ```rust
//! use codeframe::{Theme, ThemeKind};
//!
//! let theme = Theme::from_yaml(r##"
//! name: paper
//! type: light
//! colors:
//!   editor.background: "#fdfdfd"
//!   editor.foreground: "#1f2328"
//! tokenColors:
//!   - scope: comment, punctuation.definition.comment
//!     settings:
//!       foreground: "#6e7781"
//! "##).unwrap();
//!
//! assert_eq!(theme.kind(), ThemeKind::Light);
//! assert_eq!(theme.bg(), Some("#fdfdfd"));
//! assert_eq!(theme.token_colors()[0].scopes().len(), 2);
//! ```
//!
//! # Mutability
//!
//! Themes are plain owned values. The engine takes its own copies during
//! construction, so adjusting contrast on them never leaks back into a theme
//! the caller still holds.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::kind::ThemeKind;
use crate::error::{EngineError, Result};
use crate::style::StyleOverrides;

/// Workbench color key holding the editor background.
pub const EDITOR_BACKGROUND: &str = "editor.background";
/// Workbench color key holding the editor foreground.
pub const EDITOR_FOREGROUND: &str = "editor.foreground";

/// A named color theme.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    name: String,
    #[serde(rename = "type")]
    kind: ThemeKind,
    #[serde(default)]
    fg: Option<String>,
    #[serde(default)]
    bg: Option<String>,
    /// Workbench colors keyed like `editor.background`.
    #[serde(default)]
    colors: BTreeMap<String, String>,
    #[serde(default)]
    token_colors: Vec<TokenColor>,
    /// Overrides that apply to this theme only.
    #[serde(default)]
    style_overrides: StyleOverrides,
}

impl Theme {
    /// Creates an empty theme.
    pub fn new(name: impl Into<String>, kind: ThemeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fg: None,
            bg: None,
            colors: BTreeMap::new(),
            token_colors: Vec::new(),
            style_overrides: StyleOverrides::new(),
        }
    }

    /// Parses a theme from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the YAML is invalid or does not
    /// have the theme shape.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Parses a theme from JSON (e.g. an exported VS Code theme).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Loads a theme from a `.json`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Replaces the name, returning `self` for chaining.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the default foreground color.
    pub fn with_fg(mut self, fg: impl Into<String>) -> Self {
        self.fg = Some(fg.into());
        self
    }

    /// Sets the default background color.
    pub fn with_bg(mut self, bg: impl Into<String>) -> Self {
        self.bg = Some(bg.into());
        self
    }

    /// Sets a workbench color.
    pub fn with_color(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.colors.insert(key.into(), value.into());
        self
    }

    /// Appends a token color rule.
    pub fn with_token_color(mut self, token_color: TokenColor) -> Self {
        self.token_colors.push(token_color);
        self
    }

    /// Sets the overrides that apply to this theme only.
    pub fn with_style_overrides(mut self, overrides: StyleOverrides) -> Self {
        self.style_overrides = overrides;
        self
    }

    /// Returns the theme name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the theme kind.
    pub fn kind(&self) -> ThemeKind {
        self.kind
    }

    /// Returns the default foreground, falling back to `editor.foreground`.
    pub fn fg(&self) -> Option<&str> {
        self.fg.as_deref().or_else(|| self.color(EDITOR_FOREGROUND))
    }

    /// Returns the default background, falling back to `editor.background`.
    pub fn bg(&self) -> Option<&str> {
        self.bg.as_deref().or_else(|| self.color(EDITOR_BACKGROUND))
    }

    /// Looks up a workbench color.
    pub fn color(&self, key: &str) -> Option<&str> {
        self.colors.get(key).map(String::as_str)
    }

    /// Returns all workbench colors.
    pub fn colors(&self) -> &BTreeMap<String, String> {
        &self.colors
    }

    /// Returns the token color rules.
    pub fn token_colors(&self) -> &[TokenColor] {
        &self.token_colors
    }

    /// Returns the token color rules for in-place adjustment.
    pub fn token_colors_mut(&mut self) -> &mut [TokenColor] {
        &mut self.token_colors
    }

    /// Returns the overrides that apply to this theme only.
    pub fn style_overrides(&self) -> &StyleOverrides {
        &self.style_overrides
    }

    /// Default foreground slot, materialized from `editor.foreground` so
    /// contrast adjustment covers themes that only define workbench colors.
    pub(crate) fn fg_slot_mut(&mut self) -> &mut Option<String> {
        if self.fg.is_none() {
            self.fg = self.colors.get(EDITOR_FOREGROUND).cloned();
        }
        &mut self.fg
    }
}

/// A syntax highlighting rule: scopes plus the colors applied to them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenColor {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_scopes")]
    scope: Vec<String>,
    #[serde(default)]
    pub(crate) settings: TokenSettings,
}

/// Colors and font style of a [`TokenColor`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSettings {
    #[serde(default)]
    pub(crate) foreground: Option<String>,
    #[serde(default)]
    font_style: Option<String>,
}

impl TokenColor {
    /// Creates a rule for the given scopes.
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: None,
            scope: scopes.into_iter().map(Into::into).collect(),
            settings: TokenSettings::default(),
        }
    }

    /// Sets the foreground color.
    pub fn with_foreground(mut self, color: impl Into<String>) -> Self {
        self.settings.foreground = Some(color.into());
        self
    }

    /// Sets the font style (`italic`, `bold`, `underline`, ...).
    pub fn with_font_style(mut self, style: impl Into<String>) -> Self {
        self.settings.font_style = Some(style.into());
        self
    }

    /// Returns the rule's display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the scopes this rule applies to.
    pub fn scopes(&self) -> &[String] {
        &self.scope
    }

    /// Returns the foreground color.
    pub fn foreground(&self) -> Option<&str> {
        self.settings.foreground.as_deref()
    }

    /// Returns the font style.
    pub fn font_style(&self) -> Option<&str> {
        self.settings.font_style.as_deref()
    }
}

/// Accepts both `scope: "a, b"` and `scope: [a, b]`.
fn deserialize_scopes<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scopes {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Scopes::deserialize(deserializer)? {
        Scopes::One(list) => list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Scopes::Many(scopes) => scopes,
    })
}
