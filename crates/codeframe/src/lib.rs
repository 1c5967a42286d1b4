//! # Codeframe - Multi-theme CSS for code blocks
//!
//! Codeframe turns a list of editor color themes into the stylesheets a page
//! needs to show highlighted code in any of them, switching between themes
//! with nothing but CSS.
//!
//! ## The pipeline
//!
//! 1. **Themes** ([`Theme`]) carry workbench colors and syntax token colors.
//!    Each has a [`ThemeKind`]: dark or light.
//! 2. **Contrast**: token colors that are too faint against the theme's code
//!    background are pushed lighter or darker until they reach
//!    `min_syntax_highlighting_color_contrast` (WCAG ratio, default 5.5).
//! 3. **Style settings**: the core and every [`Plugin`] declare named
//!    settings (`codeBackground`, `frames.shadowColor`, ...). Each setting
//!    resolves per theme from [`StyleOverrides`], a value derived from the
//!    theme, or a static default.
//! 4. **Style variants**: one [`StyleVariant`] per theme maps CSS variable
//!    names (`--cf-codeBackground`) to resolved values.
//! 5. **CSS**: the first variant is the base. It declares every variable;
//!    the others only declare what differs, scoped by a
//!    `prefers-color-scheme` media query and per-theme selectors.
//!
//! ## Quick start
//!
//! ```rust
//! use codeframe::{Engine, EngineConfig, StyleOverrides, Theme};
//!
//! let config = EngineConfig::new()
//!     .themes([Theme::builtin_dark(), Theme::builtin_light()])
//!     .style_overrides(StyleOverrides::new().with("borderRadius", "0"));
//! let engine = Engine::new(&config)?;
//!
//! // Theme-dependent variables and token color selection
//! let theme_css = engine.theme_styles()?;
//! assert!(theme_css.contains("--cf-borderRadius:0"));
//! assert!(theme_css.contains("@media (prefers-color-scheme: light)"));
//!
//! // Theme-independent block styles
//! let base_css = futures::executor::block_on(engine.base_styles())?;
//! assert!(base_css.contains(".codeframe pre{"));
//! # Ok::<(), codeframe::EngineError>(())
//! ```
//!
//! ## Configuration
//!
//! [`EngineConfig`] is built in code or loaded from YAML:
//!
//! ```yaml
//! themes: [github-dark, github-light]
//! minSyntaxHighlightingColorContrast: 7
//! themeCssSelector: "[data-color-scheme='{name}']"
//! cascadeLayer: codeframe
//! styleOverrides:
//!   borderRadius: 0
//!   codeBackground: ["#0d1117", "#ffffff"]
//!   dark:
//!     borderColor: "#30363d"
//! ```
//!
//! ## Plugins
//!
//! A [`Plugin`] adds style settings under its own name and may contribute
//! base styles and script modules, either as fixed values or as async
//! functions of the engine state ([`Contribution`]). Contributions are
//! awaited one plugin at a time, in configured order.
//!
//! ## Errors
//!
//! Every fallible call returns [`EngineError`]. Errors returned by
//! caller-supplied functions pass through unchanged as
//! [`EngineError::Caller`]. Diagnostics go through `tracing`; the crate never
//! installs a subscriber.

pub mod colorspace;
mod config;
mod context;
pub mod contrast;
pub mod css;
mod engine;
mod error;
mod plugin;
pub mod style;
pub mod theme;

pub use colorspace::{contrast_ratio, relative_luminance, Rgba};
pub use config::{
    CustomizeThemeFn, EngineConfig, ResolvedConfig, ThemeSelector, ThemeSelectorFn,
    DEFAULT_MIN_CONTRAST, DEFAULT_THEME_CSS_ROOT,
};
pub use context::{BoxFuture, Contribution, ContributionFn, StyleContext};
pub use engine::Engine;
pub use error::{BoxError, EngineError, Result};
pub use plugin::Plugin;
pub use style::{
    css_var, css_var_name, Contributor, CssVarDeclarations, ResolveContext, StyleOverrides,
    StyleSettingDef, StyleSettingPath, StyleValue, StyleVariant,
};
pub use theme::{Theme, ThemeKind, TokenColor, TokenSettings};
