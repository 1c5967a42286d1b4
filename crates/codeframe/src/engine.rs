//! The engine: theme preparation and the stylesheet accessors.
//!
//! Construction runs the whole theme pipeline once:
//!
//! 1. normalize the configuration ([`EngineConfig::resolve`]),
//! 2. register the style settings of the core and every plugin,
//! 3. give each theme to `customize_theme`,
//! 4. raise its syntax colors to the minimum contrast against its resolved
//!    code background,
//! 5. resolve one [`StyleVariant`] per theme.
//!
//! The accessors then only render: [`Engine::theme_styles`] emits the
//! differential theme stylesheet, [`Engine::base_styles`] and
//! [`Engine::js_modules`] collect the theme-independent contributions.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::colorspace::Rgba;
use crate::config::{EngineConfig, ResolvedConfig};
use crate::context::StyleContext;
use crate::contrast::adjust_theme;
use crate::css::{
    core_base_styles, flatten_nested_css, wrap_in_cascade_layer, BaseStyleOptions,
    ThemeCssEmitter, ThemeCssOptions,
};
use crate::error::{EngineError, Result};
use crate::style::{
    core_contributor, resolve_style_variants, Contributor, StyleOverrides, StyleSettingRegistry,
    StyleSettingResolver, StyleVariant, CODE_BACKGROUND,
};
use crate::theme::Theme;

/// Prepared themes and style variants for one configuration.
///
/// An engine is immutable once built and can be shared between threads.
///
/// # Example
///
/// ```rust
/// use codeframe::{Engine, EngineConfig, Theme};
///
/// let engine = Engine::new(
///     &EngineConfig::new()
///         .themes([Theme::builtin_dark(), Theme::builtin_light()])
///         .cascade_layer("ec"),
/// )?;
///
/// assert_eq!(engine.style_variants().len(), 2);
/// let css = engine.theme_styles()?;
/// assert!(css.starts_with("@layer ec {:root{"));
/// # Ok::<(), codeframe::EngineError>(())
/// ```
#[derive(Debug)]
pub struct Engine {
    config: ResolvedConfig,
    registry: StyleSettingRegistry,
    themes: Vec<Arc<Theme>>,
    variants: Vec<StyleVariant>,
}

impl Engine {
    /// Builds an engine.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NoThemes`] for an empty theme list.
    /// - [`EngineError::DuplicateStyleSetting`] or
    ///   [`EngineError::InvalidStyleSettingPath`] for bad plugin settings.
    /// - Resolution errors for settings without a value.
    /// - [`EngineError::Caller`] for an error from `customize_theme`.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let config = config.resolve()?;

        let contributors: Vec<Contributor> = std::iter::once(core_contributor())
            .chain(config.plugins().iter().map(|plugin| plugin.contributor()))
            .collect();
        let registry = StyleSettingRegistry::new(&contributors)?;

        warn_unknown_overrides(&registry, config.style_overrides(), None);

        let resolver = StyleSettingResolver::new(&registry, config.style_overrides());
        let min_contrast = config.min_syntax_highlighting_color_contrast();

        let mut themes = Vec::with_capacity(config.themes().len());
        for theme in config.themes() {
            let mut theme = match config.customize_theme() {
                Some(customize) => customize(theme.clone()).map_err(EngineError::Caller)?,
                None => theme.clone(),
            };
            warn_unknown_overrides(&registry, theme.style_overrides(), Some(theme.name()));

            if min_contrast > 0.0 {
                let background = resolver.resolve_path(&theme, CODE_BACKGROUND)?;
                match Rgba::parse(&background) {
                    Some(color) if color.is_opaque() => {
                        let adjusted = adjust_theme(&mut theme, min_contrast, color);
                        debug!(theme = theme.name(), adjusted, "applied minimum contrast");
                    }
                    Some(_) => warn!(
                        theme = theme.name(),
                        background = %background,
                        "code background is translucent, skipping contrast adjustment"
                    ),
                    None => warn!(
                        theme = theme.name(),
                        background = %background,
                        "code background is not a concrete color, skipping contrast adjustment"
                    ),
                }
            }

            themes.push(Arc::new(theme));
        }

        let variants = resolve_style_variants(&themes, &registry, config.style_overrides())?;

        Ok(Self {
            config,
            registry,
            themes,
            variants,
        })
    }

    /// The normalized configuration.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Every declared style setting.
    pub fn style_settings(&self) -> &StyleSettingRegistry {
        &self.registry
    }

    /// Customized and contrast-adjusted themes, in configured order.
    pub fn themes(&self) -> &[Arc<Theme>] {
        &self.themes
    }

    /// One style variant per theme; the first is the base variant.
    pub fn style_variants(&self) -> &[StyleVariant] {
        &self.variants
    }

    /// The differential theme stylesheet.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DarkModeMediaQuery`] if the media query is
    /// enabled but no theme has the kind opposite to the base theme, and
    /// [`EngineError::Caller`] if the theme selector function fails.
    pub fn theme_styles(&self) -> Result<String> {
        let options = ThemeCssOptions {
            root: self.config.theme_css_root(),
            selector: self.config.theme_css_selector(),
            use_dark_mode_media_query: self.config.use_dark_mode_media_query(),
            cascade_layer: self.config.cascade_layer(),
        };
        ThemeCssEmitter::new(&self.variants, options).emit()
    }

    /// The theme-independent stylesheet: core styles, then plugin styles in
    /// plugin order.
    ///
    /// # Errors
    ///
    /// Errors from computed plugin contributions surface as
    /// [`EngineError::Caller`].
    pub async fn base_styles(&self) -> Result<String> {
        let mut css = core_base_styles(BaseStyleOptions {
            use_style_reset: self.config.use_style_reset(),
            use_themed_scrollbars: self.config.use_themed_scrollbars(),
            use_themed_selection_colors: self.config.use_themed_selection_colors(),
        });

        let cx = self.context();
        for plugin in self.config.plugins() {
            if let Some(contribution) = plugin.base_styles_contribution() {
                let styles = contribution.resolve(&cx).await?;
                debug!(plugin = plugin.name(), len = styles.len(), "collected base styles");
                css.push_str(&styles);
            }
        }

        Ok(wrap_in_cascade_layer(
            &flatten_nested_css(&css),
            self.config.cascade_layer(),
        ))
    }

    /// Script modules of all plugins in plugin order, without duplicates.
    ///
    /// # Errors
    ///
    /// Errors from computed plugin contributions surface as
    /// [`EngineError::Caller`].
    pub async fn js_modules(&self) -> Result<Vec<String>> {
        let cx = self.context();
        let mut seen = HashSet::new();
        let mut modules = Vec::new();
        for plugin in self.config.plugins() {
            let Some(contribution) = plugin.js_modules_contribution() else {
                continue;
            };
            for module in contribution.resolve(&cx).await? {
                if seen.insert(module.clone()) {
                    modules.push(module);
                }
            }
        }
        Ok(modules)
    }

    fn context(&self) -> StyleContext<'_> {
        StyleContext {
            config: &self.config,
            style_variants: &self.variants,
        }
    }
}

fn warn_unknown_overrides(
    registry: &StyleSettingRegistry,
    overrides: &StyleOverrides,
    theme: Option<&str>,
) {
    for path in overrides.paths() {
        if !registry.contains(path) {
            warn!(path, theme, "ignoring override for undeclared style setting");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::theme::{ThemeKind, TokenColor};
    use crate::Plugin;
    use futures::executor::block_on;

    fn pair() -> Vec<Theme> {
        vec![
            Theme::new("night", ThemeKind::Dark)
                .with_bg("#101010")
                .with_fg("#e0e0e0")
                .with_token_color(TokenColor::new(["comment"]).with_foreground("#202020")),
            Theme::new("day", ThemeKind::Light)
                .with_bg("#fafafa")
                .with_fg("#202020"),
        ]
    }

    #[test]
    fn test_contrast_uses_resolved_background() {
        let engine = Engine::new(&EngineConfig::new().themes(pair())).unwrap();
        let comment = engine.themes()[0].token_colors()[0].foreground().unwrap();
        let ratio = crate::colorspace::contrast_ratio(
            Rgba::parse(comment).unwrap(),
            Rgba::parse("#101010").unwrap(),
        );
        assert!(ratio >= 5.5 - 1e-6, "ratio {ratio}");
    }

    #[test]
    fn test_contrast_disabled() {
        let engine = Engine::new(
            &EngineConfig::new()
                .themes(pair())
                .min_syntax_highlighting_color_contrast(0.0),
        )
        .unwrap();
        assert_eq!(
            engine.themes()[0].token_colors()[0].foreground(),
            Some("#202020")
        );
    }

    #[test]
    fn test_non_concrete_background_skips_contrast() {
        let overrides = StyleOverrides::new().with("codeBackground", "var(--page-bg)");
        let engine = Engine::new(
            &EngineConfig::new()
                .themes(pair())
                .style_overrides(overrides),
        )
        .unwrap();
        assert_eq!(
            engine.themes()[0].token_colors()[0].foreground(),
            Some("#202020")
        );
        assert_eq!(
            engine.style_variants()[0].value("codeBackground"),
            Some("var(--page-bg)")
        );
    }

    #[test]
    fn test_translucent_background_skips_contrast() {
        let light = || {
            Theme::new("paper", ThemeKind::Light)
                .with_bg("#ffffff")
                .with_fg("#24292e")
                .with_token_color(TokenColor::new(["comment"]).with_foreground("#6a737d"))
        };
        for background in ["transparent", "#ffffff10", "rgba(255, 255, 255, 0.5)"] {
            let overrides = StyleOverrides::new().with("codeBackground", background);
            let engine = Engine::new(
                &EngineConfig::new()
                    .themes([light()])
                    .style_overrides(overrides),
            )
            .unwrap();
            let theme = &engine.themes()[0];
            assert_eq!(theme.fg(), Some("#24292e"), "background {background}");
            assert_eq!(
                theme.token_colors()[0].foreground(),
                Some("#6a737d"),
                "background {background}"
            );
        }
    }

    #[test]
    fn test_customize_theme_runs_before_resolution() {
        let config = EngineConfig::new()
            .themes(pair())
            .customize_theme(|theme| Ok(theme.with_bg("#000000")));
        let engine = Engine::new(&config).unwrap();
        for variant in engine.style_variants() {
            assert_eq!(variant.value("codeBackground"), Some("#000000"));
        }
    }

    #[test]
    fn test_customize_theme_error_propagates() {
        let config = EngineConfig::new()
            .themes(pair())
            .customize_theme(|_| Err::<Theme, BoxError>("no".into()));
        let err = Engine::new(&config).unwrap_err();
        assert!(matches!(err, EngineError::Caller(_)));
        assert_eq!(err.to_string(), "no");
    }

    #[test]
    fn test_plugin_settings_are_resolved() {
        let plugin = Plugin::new("frames").style_setting(
            crate::style::StyleSettingDef::new("shadowColor").default_value(("#000a", "#0004")),
        );
        let engine = Engine::new(&EngineConfig::new().themes(pair()).plugin(plugin)).unwrap();
        assert!(engine.style_settings().contains("frames.shadowColor"));
        assert_eq!(
            engine.style_variants()[0].value("frames.shadowColor"),
            Some("#000a")
        );
        assert_eq!(
            engine.style_variants()[1].value("frames.shadowColor"),
            Some("#0004")
        );
    }

    #[test]
    fn test_base_styles_order_and_layer() {
        let config = EngineConfig::new()
            .themes(pair())
            .cascade_layer("ec")
            .plugin(Plugin::new("a").base_styles(".codeframe{& .a{x:1}}"))
            .plugin(Plugin::new("b").base_styles(".codeframe .b{x:2}"));
        let engine = Engine::new(&config).unwrap();
        let css = block_on(engine.base_styles()).unwrap();

        assert!(css.starts_with("@layer ec {.codeframe"));
        assert_eq!(css.matches("@layer").count(), 1);
        let a = css.find(".codeframe .a{x:1}").unwrap();
        let b = css.find(".codeframe .b{x:2}").unwrap();
        assert!(a < b);
        assert!(!css.contains('&'));
    }

    #[test]
    fn test_js_modules_deduplicated() {
        let config = EngineConfig::new()
            .themes(pair())
            .plugin(Plugin::new("a").js_modules(vec!["one", "two"]))
            .plugin(Plugin::new("b").js_modules(vec!["two", "three"]));
        let engine = Engine::new(&config).unwrap();
        assert_eq!(
            block_on(engine.js_modules()).unwrap(),
            vec!["one", "two", "three"]
        );
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
