//! Engine configuration and its normalization.
//!
//! [`EngineConfig`] is what callers write: every option is optional, and it
//! can be built in code or loaded from YAML. [`EngineConfig::resolve`] turns
//! it into a [`ResolvedConfig`] with every default applied and the
//! deprecated single-`theme` option folded into `themes`. The raw config is
//! never modified.
//!
//! # YAML
//!
//! ```rust
//! use codeframe::EngineConfig;
//!
//! let config = EngineConfig::from_yaml(r##"
//! themes: [github-light, github-dark]
//! cascadeLayer: code
//! themeCssSelector: "[data-color-mode='{name}']"
//! styleOverrides:
//!   borderRadius: 0
//!   dark:
//!     borderColor: "#30363d"
//! "##).unwrap();
//!
//! let resolved = config.resolve().unwrap();
//! assert_eq!(resolved.themes().len(), 2);
//! assert!(resolved.use_dark_mode_media_query());
//! assert_eq!(resolved.cascade_layer(), "code");
//! ```
//!
//! Function-valued options (`customize_theme`, plugins, a selector closure)
//! can only be set in code.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::error::{BoxError, EngineError, Result};
use crate::plugin::Plugin;
use crate::style::StyleOverrides;
use crate::theme::{builtin_names, builtin_theme, Theme};

/// Default minimum contrast ratio for syntax highlighting colors.
pub const DEFAULT_MIN_CONTRAST: f64 = 5.5;

/// Default root selector for theme variables.
pub const DEFAULT_THEME_CSS_ROOT: &str = ":root";

/// Callback run once per theme before contrast adjustment.
pub type CustomizeThemeFn = Arc<dyn Fn(Theme) -> std::result::Result<Theme, BoxError> + Send + Sync>;

/// Produces the CSS selector that activates a theme.
pub type ThemeSelectorFn =
    Arc<dyn Fn(&Theme) -> std::result::Result<Option<String>, BoxError> + Send + Sync>;

/// How per-theme selectors are generated.
#[derive(Clone)]
pub enum ThemeSelector {
    /// No per-theme selector blocks.
    Disabled,
    /// Returns the selector for a theme, or `None` to skip that theme.
    Function(ThemeSelectorFn),
}

impl ThemeSelector {
    /// `[data-theme='<name>']`.
    pub fn data_attribute() -> Self {
        Self::template("[data-theme='{name}']")
    }

    /// Substitutes the theme name for every `{name}` in `template`.
    ///
    /// The name is escaped as a CSS identifier, which keeps it valid both
    /// bare (`.{name}`) and inside a quoted attribute value.
    pub fn template(template: impl Into<String>) -> Self {
        let template = template.into();
        Self::from_fn(move |theme| {
            let mut name = String::new();
            // Writing to a String cannot fail.
            let _ = cssparser::serialize_identifier(theme.name(), &mut name);
            Some(template.replace("{name}", &name))
        })
    }

    /// Wraps a selector function that cannot fail.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Theme) -> Option<String> + Send + Sync + 'static,
    {
        ThemeSelector::Function(Arc::new(move |theme: &Theme| Ok::<_, BoxError>(f(theme))))
    }

    /// Wraps a selector function that may fail. Its error is passed through
    /// as [`EngineError::Caller`].
    pub fn try_from_fn<F>(f: F) -> Self
    where
        F: Fn(&Theme) -> std::result::Result<Option<String>, BoxError> + Send + Sync + 'static,
    {
        ThemeSelector::Function(Arc::new(f))
    }

    /// Returns the selector for `theme`, or `None` if disabled or skipped.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Caller`] with whatever the selector function
    /// returned.
    pub fn select(&self, theme: &Theme) -> Result<Option<String>> {
        match self {
            ThemeSelector::Disabled => Ok(None),
            ThemeSelector::Function(f) => f(theme).map_err(EngineError::Caller),
        }
    }

    /// Returns `true` for [`ThemeSelector::Disabled`].
    pub fn is_disabled(&self) -> bool {
        matches!(self, ThemeSelector::Disabled)
    }
}

impl Default for ThemeSelector {
    fn default() -> Self {
        Self::data_attribute()
    }
}

impl std::fmt::Debug for ThemeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeSelector::Disabled => f.write_str("Disabled"),
            ThemeSelector::Function(_) => f.write_str("Function(<fn>)"),
        }
    }
}

/// `false` disables, `true` keeps the default, a string is a template.
impl<'de> Deserialize<'de> for ThemeSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Template(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Flag(false) => ThemeSelector::Disabled,
            Raw::Flag(true) => ThemeSelector::default(),
            Raw::Template(template) => ThemeSelector::template(template),
        })
    }
}

/// Raw engine configuration. Every option is optional.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(deserialize_with = "deserialize_themes")]
    themes: Option<Vec<Theme>>,
    #[serde(deserialize_with = "deserialize_theme")]
    theme: Option<Theme>,
    min_syntax_highlighting_color_contrast: Option<f64>,
    use_dark_mode_media_query: Option<bool>,
    theme_css_root: Option<String>,
    theme_css_selector: Option<ThemeSelector>,
    cascade_layer: Option<String>,
    use_style_reset: Option<bool>,
    use_themed_scrollbars: Option<bool>,
    use_themed_selection_colors: Option<bool>,
    style_overrides: Option<StyleOverrides>,
    #[serde(skip)]
    customize_theme: Option<CustomizeThemeFn>,
    #[serde(skip)]
    plugins: Vec<Plugin>,
}

impl EngineConfig {
    /// Creates a configuration with every option unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] on invalid YAML, unknown keys or
    /// unknown built-in theme names.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Loads a configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Sets the themes. The first one is the base theme.
    pub fn themes(mut self, themes: impl IntoIterator<Item = Theme>) -> Self {
        self.themes = Some(themes.into_iter().collect());
        self
    }

    /// Sets a single theme.
    #[deprecated(note = "use `themes` instead")]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Sets the minimum contrast ratio. `0` disables adjustment.
    pub fn min_syntax_highlighting_color_contrast(mut self, ratio: f64) -> Self {
        self.min_syntax_highlighting_color_contrast = Some(ratio);
        self
    }

    /// Forces the `prefers-color-scheme` block on or off.
    pub fn use_dark_mode_media_query(mut self, enabled: bool) -> Self {
        self.use_dark_mode_media_query = Some(enabled);
        self
    }

    /// Sets the root selector theme variables are declared on.
    pub fn theme_css_root(mut self, root: impl Into<String>) -> Self {
        self.theme_css_root = Some(root.into());
        self
    }

    /// Sets how per-theme selectors are generated.
    pub fn theme_css_selector(mut self, selector: ThemeSelector) -> Self {
        self.theme_css_selector = Some(selector);
        self
    }

    /// Wraps generated CSS in `@layer <name>`. Empty disables.
    pub fn cascade_layer(mut self, layer: impl Into<String>) -> Self {
        self.cascade_layer = Some(layer.into());
        self
    }

    /// Toggles the style reset in the base styles.
    pub fn use_style_reset(mut self, enabled: bool) -> Self {
        self.use_style_reset = Some(enabled);
        self
    }

    /// Toggles themed scrollbars in the base styles.
    pub fn use_themed_scrollbars(mut self, enabled: bool) -> Self {
        self.use_themed_scrollbars = Some(enabled);
        self
    }

    /// Toggles themed selection colors in the base styles.
    pub fn use_themed_selection_colors(mut self, enabled: bool) -> Self {
        self.use_themed_selection_colors = Some(enabled);
        self
    }

    /// Sets the global style overrides.
    pub fn style_overrides(mut self, overrides: StyleOverrides) -> Self {
        self.style_overrides = Some(overrides);
        self
    }

    /// Sets a callback that may adjust or replace each theme.
    pub fn customize_theme<F>(mut self, f: F) -> Self
    where
        F: Fn(Theme) -> std::result::Result<Theme, BoxError> + Send + Sync + 'static,
    {
        self.customize_theme = Some(Arc::new(f));
        self
    }

    /// Appends a plugin.
    pub fn plugin(mut self, plugin: Plugin) -> Self {
        self.plugins.push(plugin);
        self
    }

    /// Applies defaults and migrations.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoThemes`] if `themes` is explicitly empty.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let themes = match (&self.themes, &self.theme) {
            (Some(themes), _) => themes.clone(),
            (None, Some(theme)) => vec![theme.clone()],
            (None, None) => vec![Theme::builtin_dark(), Theme::builtin_light()],
        };
        if themes.is_empty() {
            return Err(EngineError::NoThemes);
        }

        let use_dark_mode_media_query = self.use_dark_mode_media_query.unwrap_or_else(|| {
            themes.len() == 2 && themes[0].kind() != themes[1].kind()
        });

        Ok(ResolvedConfig {
            themes,
            min_syntax_highlighting_color_contrast: self
                .min_syntax_highlighting_color_contrast
                .unwrap_or(DEFAULT_MIN_CONTRAST),
            use_dark_mode_media_query,
            theme_css_root: self
                .theme_css_root
                .clone()
                .unwrap_or_else(|| DEFAULT_THEME_CSS_ROOT.to_string()),
            theme_css_selector: self.theme_css_selector.clone().unwrap_or_default(),
            cascade_layer: self.cascade_layer.clone().unwrap_or_default(),
            use_style_reset: self.use_style_reset.unwrap_or(true),
            use_themed_scrollbars: self.use_themed_scrollbars.unwrap_or(true),
            use_themed_selection_colors: self.use_themed_selection_colors.unwrap_or(false),
            style_overrides: self.style_overrides.clone().unwrap_or_default(),
            customize_theme: self.customize_theme.clone(),
            plugins: self.plugins.clone(),
        })
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("themes", &self.themes)
            .field("theme", &self.theme)
            .field(
                "min_syntax_highlighting_color_contrast",
                &self.min_syntax_highlighting_color_contrast,
            )
            .field("use_dark_mode_media_query", &self.use_dark_mode_media_query)
            .field("theme_css_root", &self.theme_css_root)
            .field("theme_css_selector", &self.theme_css_selector)
            .field("cascade_layer", &self.cascade_layer)
            .field("style_overrides", &self.style_overrides)
            .field("customize_theme", &self.customize_theme.as_ref().map(|_| "<fn>"))
            .field("plugins", &self.plugins)
            .finish_non_exhaustive()
    }
}

/// Configuration with every default applied. Immutable.
#[derive(Clone)]
pub struct ResolvedConfig {
    themes: Vec<Theme>,
    min_syntax_highlighting_color_contrast: f64,
    use_dark_mode_media_query: bool,
    theme_css_root: String,
    theme_css_selector: ThemeSelector,
    cascade_layer: String,
    use_style_reset: bool,
    use_themed_scrollbars: bool,
    use_themed_selection_colors: bool,
    style_overrides: StyleOverrides,
    customize_theme: Option<CustomizeThemeFn>,
    plugins: Vec<Plugin>,
}

impl ResolvedConfig {
    /// Themes as configured, before customization and contrast adjustment.
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn min_syntax_highlighting_color_contrast(&self) -> f64 {
        self.min_syntax_highlighting_color_contrast
    }

    pub fn use_dark_mode_media_query(&self) -> bool {
        self.use_dark_mode_media_query
    }

    pub fn theme_css_root(&self) -> &str {
        &self.theme_css_root
    }

    pub fn theme_css_selector(&self) -> &ThemeSelector {
        &self.theme_css_selector
    }

    pub fn cascade_layer(&self) -> &str {
        &self.cascade_layer
    }

    pub fn use_style_reset(&self) -> bool {
        self.use_style_reset
    }

    pub fn use_themed_scrollbars(&self) -> bool {
        self.use_themed_scrollbars
    }

    pub fn use_themed_selection_colors(&self) -> bool {
        self.use_themed_selection_colors
    }

    pub fn style_overrides(&self) -> &StyleOverrides {
        &self.style_overrides
    }

    pub fn customize_theme(&self) -> Option<&CustomizeThemeFn> {
        self.customize_theme.as_ref()
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("themes", &self.themes.iter().map(Theme::name).collect::<Vec<_>>())
            .field(
                "min_syntax_highlighting_color_contrast",
                &self.min_syntax_highlighting_color_contrast,
            )
            .field("use_dark_mode_media_query", &self.use_dark_mode_media_query)
            .field("theme_css_root", &self.theme_css_root)
            .field("theme_css_selector", &self.theme_css_selector)
            .field("cascade_layer", &self.cascade_layer)
            .field("plugins", &self.plugins.iter().map(Plugin::name).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// A theme given inline or by built-in name.
#[derive(Deserialize)]
#[serde(untagged)]
enum ThemeRef {
    Name(String),
    Inline(Box<Theme>),
}

impl ThemeRef {
    fn into_theme<E: serde::de::Error>(self) -> std::result::Result<Theme, E> {
        match self {
            ThemeRef::Inline(theme) => Ok(*theme),
            ThemeRef::Name(name) => builtin_theme(&name).ok_or_else(|| {
                E::custom(format!(
                    "unknown theme '{name}' (built-in themes: {})",
                    builtin_names().join(", ")
                ))
            }),
        }
    }
}

fn deserialize_themes<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Vec<Theme>>, D::Error> {
    Vec::<ThemeRef>::deserialize(deserializer)?
        .into_iter()
        .map(ThemeRef::into_theme)
        .collect::<std::result::Result<Vec<_>, D::Error>>()
        .map(Some)
}

fn deserialize_theme<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Theme>, D::Error> {
    ThemeRef::deserialize(deserializer)?.into_theme().map(Some)
}
