//! Integration tests for codeframe.
//!
//! These drive the public API end to end: configuration, engine
//! construction, and the three stylesheet accessors.

use std::sync::Arc;

use codeframe::{
    BoxError, Contribution, Engine, EngineConfig, EngineError, Plugin, StyleContext,
    StyleOverrides, StyleSettingDef, Theme, ThemeKind, ThemeSelector, TokenColor,
};
use futures::executor::block_on;

fn dark1() -> Theme {
    Theme::new("dark1", ThemeKind::Dark)
        .with_bg("#1e1e1e")
        .with_fg("#d4d4d4")
        .with_token_color(TokenColor::new(["comment"]).with_foreground("#6a9955"))
        .with_token_color(TokenColor::new(["keyword"]).with_foreground("#569cd6"))
}

fn light1() -> Theme {
    Theme::new("light1", ThemeKind::Light)
        .with_bg("#ffffff")
        .with_fg("#1f1f1f")
        .with_token_color(TokenColor::new(["comment"]).with_foreground("#008000"))
        .with_token_color(TokenColor::new(["keyword"]).with_foreground("#0000ff"))
}

fn engine(config: EngineConfig) -> Engine {
    Engine::new(&config).unwrap()
}

// ============================================================================
// Style variants
// ============================================================================

#[test]
fn one_variant_per_theme_in_order() {
    let engine = engine(EngineConfig::new().themes([dark1(), light1(), dark1().with_name("dark2")]));

    let variants = engine.style_variants();
    assert_eq!(variants.len(), 3);
    for (i, variant) in variants.iter().enumerate() {
        assert_eq!(variant.index(), i);
        assert!(Arc::ptr_eq(variant.theme(), &engine.themes()[i]));
    }
    assert_eq!(variants[2].theme().name(), "dark2");
}

#[test]
fn every_declared_setting_resolves_once_per_variant() {
    let plugin = Plugin::new("frames")
        .style_setting(StyleSettingDef::new("shadowColor").default_value("#0004"))
        .style_setting(
            StyleSettingDef::new("titleBackground")
                .derive(|cx| cx.resolve("codeBackground").map(Some)),
        );
    let engine = engine(EngineConfig::new().themes([dark1(), light1()]).plugin(plugin));

    let names: Vec<String> = engine
        .style_settings()
        .iter()
        .map(|setting| setting.path().css_var_name())
        .collect();

    for variant in engine.style_variants() {
        let declarations = variant.css_var_declarations();
        assert_eq!(declarations.len(), names.len());
        for name in &names {
            let count = declarations.iter().filter(|(n, _)| *n == name.as_str()).count();
            assert_eq!(count, 1, "{name} in {}", variant.theme().name());
        }
    }

    let light = &engine.style_variants()[1];
    assert_eq!(light.value("frames.titleBackground"), Some("#ffffff"));
    assert_eq!(
        light.css_var_declarations().get("--cf-frames-shadowColor"),
        Some("#0004")
    );
}

#[test]
fn overrides_precedence() {
    let overrides: StyleOverrides = serde_yaml::from_str(
        r##"
borderRadius: 2px
codeFontSize: ["1rem", "0.9rem"]
light:
  borderRadius: 4px
"##,
    )
    .unwrap();
    let dark = dark1().with_style_overrides(StyleOverrides::new().with("borderRadius", "8px"));
    let engine = engine(
        EngineConfig::new()
            .themes([dark, light1()])
            .style_overrides(overrides),
    );

    let [night, day] = engine.style_variants() else {
        panic!("expected two variants");
    };
    assert_eq!(night.value("borderRadius"), Some("8px"));
    assert_eq!(day.value("borderRadius"), Some("4px"));
    assert_eq!(night.value("codeFontSize"), Some("1rem"));
    assert_eq!(day.value("codeFontSize"), Some("0.9rem"));
}

#[test]
fn duplicate_plugin_setting_is_rejected() {
    let config = EngineConfig::new()
        .themes([dark1()])
        .plugin(Plugin::new("frames").style_setting(StyleSettingDef::new("a").default_value("1")))
        .plugin(Plugin::new("frames").style_setting(StyleSettingDef::new("a").default_value("2")));

    match Engine::new(&config) {
        Err(EngineError::DuplicateStyleSetting { path, .. }) => assert_eq!(path, "frames.a"),
        other => panic!("expected duplicate error, got {other:?}"),
    }
}

#[test]
fn setting_without_value_is_an_error() {
    let config = EngineConfig::new()
        .themes([dark1()])
        .plugin(Plugin::new("frames").style_setting(StyleSettingDef::new("missing")));

    let err = Engine::new(&config).unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, EngineError::UnresolvedStyleSetting { .. }));
    assert!(message.contains("frames.missing"));
    assert!(message.contains("frames"));
}

// ============================================================================
// Theme CSS
// ============================================================================

#[test]
fn dark_light_pair_scenario() {
    let engine = engine(EngineConfig::new().themes([dark1(), light1()]));
    assert!(engine.config().use_dark_mode_media_query());

    let css = engine.theme_styles().unwrap();
    assert_eq!(css.matches(":root{").count(), 1);
    assert_eq!(css.matches("@media (prefers-color-scheme: light)").count(), 1);
    assert_eq!(
        css.matches(":root[data-theme='light1'] .codeframe,").count(),
        1
    );
    assert!(css.starts_with(":root{--cf-"));
}

#[test]
fn theme_css_is_idempotent() {
    let engine = engine(EngineConfig::new().themes([dark1(), light1()]));
    assert_eq!(engine.theme_styles().unwrap(), engine.theme_styles().unwrap());
}

#[test]
fn identical_alternate_declares_nothing() {
    let engine = engine(
        EngineConfig::new()
            .themes([dark1(), dark1().with_name("copy")])
            .use_dark_mode_media_query(false),
    );
    let [base, copy] = engine.style_variants() else {
        panic!("expected two variants");
    };
    assert!(copy.css_var_declarations().diff(base.css_var_declarations()).is_empty());

    let css = engine.theme_styles().unwrap();
    assert!(!css.contains(":root[data-theme='copy'] .codeframe,"));
    // Token colors still switch to the alternate's inline variables.
    assert!(css.contains(":root[data-theme='copy'] .codeframe :where("));
    assert!(css.contains("var(--1,inherit)"));
}

#[test]
fn media_query_without_opposite_kind_fails() {
    let engine = engine(
        EngineConfig::new()
            .themes([dark1(), dark1().with_name("dark2")])
            .use_dark_mode_media_query(true),
    );

    let err = engine.theme_styles().unwrap_err();
    assert!(matches!(err, EngineError::DarkModeMediaQuery { .. }));
    let message = err.to_string();
    assert!(message.contains("dark1 (dark)"), "{message}");
    assert!(message.contains("dark2 (dark)"), "{message}");
}

#[test]
fn media_query_picks_first_opposite_kind() {
    let engine = engine(
        EngineConfig::new()
            .themes([
                dark1(),
                dark1().with_name("dark2").with_bg("#000000"),
                light1(),
                light1().with_name("light2").with_bg("#eeeeee"),
            ])
            .use_dark_mode_media_query(true),
    );
    let css = engine.theme_styles().unwrap();
    let media_start = css.find("@media (prefers-color-scheme: light){").unwrap();
    let media = &css[media_start..];
    assert!(media.contains("--cf-codeBackground:#ffffff"));
    assert!(media.contains("var(--2,inherit)"));
}

#[test]
fn disabled_selector_keeps_base_and_media_blocks() {
    let engine = engine(
        EngineConfig::new()
            .themes([dark1(), light1()])
            .theme_css_selector(ThemeSelector::Disabled),
    );
    let css = engine.theme_styles().unwrap();
    assert!(css.starts_with(":root{"));
    assert!(css.contains("@media (prefers-color-scheme: light){"));
    assert!(!css.contains("data-theme"));
}

#[test]
fn selector_function_may_skip_themes() {
    let selector = ThemeSelector::from_fn(|theme| {
        (theme.name() != "light1").then(|| format!(".theme-{}", theme.name()))
    });
    let engine = engine(
        EngineConfig::new()
            .themes([dark1(), light1(), dark1().with_name("dark2").with_bg("#000000")])
            .theme_css_selector(selector)
            .use_dark_mode_media_query(false),
    );
    let css = engine.theme_styles().unwrap();
    assert!(!css.contains(".theme-light1"));
    assert!(css.contains(":root.theme-dark2 .codeframe,"));
    assert!(css.contains(":root:not(.theme-dark1) .codeframe.theme-dark2"));
}

#[test]
fn selector_function_error_surfaces_from_theme_styles() {
    let selector = ThemeSelector::try_from_fn(|theme| {
        if theme.kind() == ThemeKind::Light {
            return Err(BoxError::from(format!("{} is not published", theme.name())));
        }
        Ok(Some(format!(".theme-{}", theme.name())))
    });
    let engine = engine(
        EngineConfig::new()
            .themes([dark1(), light1()])
            .theme_css_selector(selector),
    );
    match engine.theme_styles() {
        Err(EngineError::Caller(err)) => assert_eq!(err.to_string(), "light1 is not published"),
        other => panic!("Expected Caller error, got {other:?}"),
    }
}

#[test]
fn theme_names_are_escaped_in_selector_templates() {
    let engine = engine(
        EngineConfig::new()
            .themes([dark1().with_name("night owl"), light1()])
            .use_dark_mode_media_query(false),
    );
    let css = engine.theme_styles().unwrap();
    assert!(css.contains(":root:not([data-theme='night\\ owl']) .codeframe[data-theme='light1']"));
}

#[test]
fn custom_root() {
    let engine = engine(
        EngineConfig::new()
            .themes([dark1(), light1()])
            .theme_css_root("html"),
    );
    let css = engine.theme_styles().unwrap();
    assert!(css.starts_with("html{"));
    assert!(!css.contains(":root"));
}

#[test]
fn cascade_layer_wraps_every_stylesheet_once() {
    let engine = engine(
        EngineConfig::new()
            .themes([dark1(), light1()])
            .cascade_layer("ec"),
    );

    for css in [
        engine.theme_styles().unwrap(),
        block_on(engine.base_styles()).unwrap(),
    ] {
        assert!(css.starts_with("@layer ec {"));
        assert!(css.ends_with('}'));
        assert_eq!(css.matches("@layer").count(), 1);
    }
}

#[test]
fn empty_cascade_layer_does_not_wrap() {
    let engine = engine(EngineConfig::new().themes([dark1(), light1()]));
    assert!(!engine.theme_styles().unwrap().contains("@layer"));
    assert!(!block_on(engine.base_styles()).unwrap().contains("@layer"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
#[allow(deprecated)]
fn deprecated_single_theme_is_migrated() {
    let engine = engine(EngineConfig::new().theme(light1()));
    assert_eq!(engine.config().themes().len(), 1);
    assert_eq!(engine.config().themes()[0].name(), "light1");
    assert!(!engine.config().use_dark_mode_media_query());

    let css = engine.theme_styles().unwrap();
    assert!(!css.contains("@media"));
}

#[test]
fn default_themes_are_builtin_pair() {
    let engine = engine(EngineConfig::new());
    let kinds: Vec<_> = engine.themes().iter().map(|theme| theme.kind()).collect();
    assert_eq!(kinds, vec![ThemeKind::Dark, ThemeKind::Light]);
    assert!(engine.theme_styles().unwrap().contains("@media (prefers-color-scheme: light)"));
}

#[test]
fn empty_theme_list_is_rejected() {
    let err = Engine::new(&EngineConfig::new().themes(Vec::new())).unwrap_err();
    assert!(matches!(err, EngineError::NoThemes));
}

#[test]
fn yaml_configuration() {
    let config = EngineConfig::from_yaml(
        r##"
themes:
  - github-light
  - name: midnight
    type: dark
    colors:
      editor.background: "#000010"
      editor.foreground: "#c0c0c0"
themeCssSelector: ".{name}"
cascadeLayer: code
useStyleReset: false
styleOverrides:
  borderRadius: 0
  dark:
    borderColor: "#333333"
"##,
    )
    .unwrap();
    let engine = engine(config);

    let [light, dark] = engine.style_variants() else {
        panic!("expected two variants");
    };
    assert_eq!(light.theme().name(), "github-light");
    assert_eq!(dark.value("codeBackground"), Some("#000010"));
    assert_eq!(dark.value("borderColor"), Some("#333333"));
    assert_eq!(light.value("borderRadius"), Some("0"));

    let css = engine.theme_styles().unwrap();
    assert!(css.starts_with("@layer code {:root{"));
    assert!(css.contains("@media (prefers-color-scheme: dark){"));
    assert!(css.contains(":root.midnight .codeframe,"));

    let base = block_on(engine.base_styles()).unwrap();
    assert!(!base.contains("all:revert"));
}

// ============================================================================
// Caller-supplied functions
// ============================================================================

#[test]
fn customize_theme_replaces_theme() {
    let config = EngineConfig::new()
        .themes([dark1(), light1()])
        .customize_theme(|theme| {
            let name = format!("{}-custom", theme.name());
            Ok(theme.with_name(name))
        });
    let engine = engine(config);
    let names: Vec<_> = engine.themes().iter().map(|theme| theme.name()).collect();
    assert_eq!(names, vec!["dark1-custom", "light1-custom"]);
    assert!(engine
        .theme_styles()
        .unwrap()
        .contains("[data-theme='light1-custom']"));
}

#[test]
fn caller_errors_pass_through() {
    let config = EngineConfig::new()
        .themes([dark1()])
        .customize_theme(|_| Err::<Theme, BoxError>("theme rejected".into()));
    let err = Engine::new(&config).unwrap_err();
    assert!(matches!(err, EngineError::Caller(_)));
    assert_eq!(err.to_string(), "theme rejected");

    let failing = Plugin::new("broken").base_styles(Contribution::computed(|_: &StyleContext<'_>| async {
        Err::<String, BoxError>("styles unavailable".into())
    }));
    let engine = engine(EngineConfig::new().themes([dark1()]).plugin(failing));
    let err = block_on(engine.base_styles()).unwrap_err();
    assert_eq!(err.to_string(), "styles unavailable");
}

#[test]
fn plugin_contributions_in_order() {
    let computed = Plugin::new("frames")
        .style_setting(StyleSettingDef::new("titleColor").default_value("inherit"))
        .base_styles(Contribution::computed(|cx: &StyleContext<'_>| {
            let color = cx.css_var("frames.titleColor");
            let themes = cx.style_variants.len();
            async move {
                Ok::<_, BoxError>(format!(
                    ".codeframe{{& .title{{color:{color};--themes:{themes}}}}}"
                ))
            }
        }))
        .js_modules(Contribution::computed(|_: &StyleContext<'_>| async {
            Ok::<_, BoxError>(vec!["copy()".to_string(), "tabs()".to_string()])
        }));
    let fixed = Plugin::new("tabs")
        .base_styles(".codeframe .tab{margin:0}")
        .js_modules(vec!["tabs()", "wrap()"]);

    let engine = engine(
        EngineConfig::new()
            .themes([dark1(), light1()])
            .plugin(computed)
            .plugin(fixed),
    );

    let css = block_on(engine.base_styles()).unwrap();
    let title = css
        .find(".codeframe .title{color:var(--cf-frames-titleColor);--themes:2}")
        .unwrap();
    let tab = css.find(".codeframe .tab{margin:0}").unwrap();
    assert!(title < tab);

    let modules = block_on(engine.js_modules()).unwrap();
    assert_eq!(modules, vec!["copy()", "tabs()", "wrap()"]);
    assert_eq!(block_on(engine.js_modules()).unwrap(), modules);
}

#[test]
fn no_plugins_means_no_modules() {
    let engine = engine(EngineConfig::new().themes([dark1()]));
    assert!(block_on(engine.js_modules()).unwrap().is_empty());
}
