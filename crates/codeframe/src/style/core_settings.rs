//! Style settings declared by the core.
//!
//! Colors are derived from the theme's workbench colors where the theme
//! provides them, and otherwise computed from other settings or taken from a
//! `[dark, light]` static default. Sizes and fonts are static.

use super::resolver::ResolveContext;
use super::settings::{Contributor, StyleSettingDef};
use crate::error::Result;
use crate::theme::ThemeKind;

/// The setting contrast adjustment measures token colors against.
pub const CODE_BACKGROUND: &str = "codeBackground";

/// Returns the core contributor with all core settings.
pub fn core_contributor() -> Contributor {
    Contributor::core(core_style_settings())
}

/// Paths of the core settings, in declaration order.
pub fn core_setting_paths() -> Vec<String> {
    core_style_settings()
        .iter()
        .map(|def| def.property().to_string())
        .collect()
}

fn core_style_settings() -> Vec<StyleSettingDef> {
    vec![
        // Frame
        StyleSettingDef::new("borderRadius").default_value("0.3rem"),
        StyleSettingDef::new("borderWidth").default_value("1.5px"),
        StyleSettingDef::new("borderColor")
            .derive(|cx| from_workbench_or(cx, "editorGroup.border", derive_border_color)),
        // Code
        StyleSettingDef::new("codeFontFamily").default_value(
            "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, 'Liberation Mono', 'Courier New', monospace",
        ),
        StyleSettingDef::new("codeFontSize").default_value("0.85rem"),
        StyleSettingDef::new("codeFontWeight").default_value("400"),
        StyleSettingDef::new("codeLineHeight").default_value("1.65"),
        StyleSettingDef::new("codePaddingBlock").default_value("1rem"),
        StyleSettingDef::new("codePaddingInline").default_value("1.35rem"),
        StyleSettingDef::new(CODE_BACKGROUND)
            .derive(|cx| Ok(cx.theme().bg().map(str::to_string)))
            .default_value(("#011627", "#fbfbfb")),
        StyleSettingDef::new("codeForeground")
            .derive(|cx| Ok(cx.theme().fg().map(str::to_string)))
            .default_value(("#d6deeb", "#403f53")),
        StyleSettingDef::new("codeSelectionBackground")
            .derive(|cx| Ok(cx.color("editor.selectionBackground")))
            .default_value(("#1d3b53", "#e0e0e0")),
        // Gutter
        StyleSettingDef::new("gutterBorderColor")
            .derive(|cx| {
                Ok(cx
                    .resolve_color("gutterForeground")?
                    .map(|fg| fg.multiply_alpha(0.2).to_hex()))
            })
            .default_value("transparent"),
        StyleSettingDef::new("gutterBorderWidth").default_value("1.5px"),
        StyleSettingDef::new("gutterForeground")
            .derive(|cx| {
                from_workbench_or(cx, "editorLineNumber.foreground", |cx| {
                    Ok(cx
                        .resolve_color("codeForeground")?
                        .map(|fg| fg.multiply_alpha(0.5).to_hex()))
                })
            })
            .default_value(("#4b6479", "#90a7b2")),
        StyleSettingDef::new("gutterHighlightForeground").derive(|cx| {
            from_workbench_or(cx, "editorLineNumber.activeForeground", |cx| {
                cx.resolve("codeForeground").map(Some)
            })
        }),
        // Scrollbars
        StyleSettingDef::new("scrollbarThumbColor")
            .derive(|cx| Ok(cx.color("scrollbarSlider.background")))
            .default_value(("#ffffff22", "#00000022")),
        StyleSettingDef::new("scrollbarThumbHoverColor")
            .derive(|cx| {
                from_workbench_or(cx, "scrollbarSlider.hoverBackground", |cx| {
                    Ok(cx
                        .resolve_color("scrollbarThumbColor")?
                        .map(|thumb| thumb.multiply_alpha(2.0).to_hex()))
                })
            })
            .default_value(("#ffffff44", "#00000044")),
        // UI text
        StyleSettingDef::new("uiFontFamily").default_value(
            "ui-sans-serif, system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif",
        ),
        StyleSettingDef::new("uiFontSize").default_value("0.9rem"),
        StyleSettingDef::new("uiFontWeight").default_value("400"),
        StyleSettingDef::new("uiLineHeight").default_value("1.65"),
        StyleSettingDef::new("uiPaddingBlock").default_value("0.25rem"),
        StyleSettingDef::new("uiPaddingInline").default_value("1rem"),
        StyleSettingDef::new("uiSelectionBackground")
            .derive(|cx| Ok(cx.color("menu.selectionBackground")))
            .default_value(("#234d708c", "#d3e8f8")),
        StyleSettingDef::new("uiSelectionForeground")
            .derive(|cx| Ok(cx.color("menu.selectionForeground")))
            .default_value("inherit"),
        StyleSettingDef::new("focusBorder")
            .derive(|cx| Ok(cx.color("focusBorder")))
            .default_value(("#122d42", "#93a1a1")),
    ]
}

/// Uses a workbench color when the theme has one, else `fallback`.
fn from_workbench_or<F>(cx: &ResolveContext<'_>, key: &str, fallback: F) -> Result<Option<String>>
where
    F: FnOnce(&ResolveContext<'_>) -> Result<Option<String>>,
{
    match cx.color(key) {
        Some(color) => Ok(Some(color)),
        None => fallback(cx),
    }
}

/// A border that stands out slightly from the code background.
fn derive_border_color(cx: &ResolveContext<'_>) -> Result<Option<String>> {
    let Some(background) = cx.resolve_color(CODE_BACKGROUND)? else {
        return Ok(None);
    };
    let shift = match cx.kind() {
        ThemeKind::Dark => 0.15,
        ThemeKind::Light => -0.15,
    };
    Ok(Some(background.lighten(shift).to_hex()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colorspace::Rgba;
    use crate::style::{StyleOverrides, StyleSettingRegistry, StyleSettingResolver};
    use crate::theme::Theme;

    fn resolve(theme: &Theme) -> Vec<(String, String)> {
        let core = core_contributor();
        let registry = StyleSettingRegistry::new([&core]).unwrap();
        let overrides = StyleOverrides::new();
        StyleSettingResolver::new(&registry, &overrides)
            .resolve(theme)
            .unwrap()
            .into_iter()
            .map(|(path, value)| (path.to_string(), value))
            .collect()
    }

    fn value<'a>(resolved: &'a [(String, String)], path: &str) -> &'a str {
        resolved
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn test_every_core_setting_resolves_for_empty_themes() {
        for kind in [ThemeKind::Dark, ThemeKind::Light] {
            let resolved = resolve(&Theme::new("empty", kind));
            assert_eq!(resolved.len(), core_setting_paths().len());
        }
    }

    #[test]
    fn test_core_paths_are_unique() {
        let paths = core_setting_paths();
        let mut sorted = paths.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), paths.len());
        assert!(paths.contains(&CODE_BACKGROUND.to_string()));
    }

    #[test]
    fn test_workbench_colors_are_used() {
        let theme = Theme::new("t", ThemeKind::Dark)
            .with_bg("#1e1e1e")
            .with_color("editorLineNumber.foreground", "#858585")
            .with_color("editorGroup.border", "#444444");
        let resolved = resolve(&theme);

        assert_eq!(value(&resolved, "codeBackground"), "#1e1e1e");
        assert_eq!(value(&resolved, "gutterForeground"), "#858585");
        assert_eq!(value(&resolved, "borderColor"), "#444444");
        assert_eq!(value(&resolved, "gutterBorderColor"), "#85858533");
    }

    #[test]
    fn test_border_derived_from_background() {
        let resolved = resolve(&Theme::new("t", ThemeKind::Dark).with_bg("#000000"));
        let border = Rgba::parse(value(&resolved, "borderColor")).unwrap();
        assert!(border.lightness() > 10.0);

        let resolved = resolve(&Theme::new("t", ThemeKind::Light).with_bg("#ffffff"));
        let border = Rgba::parse(value(&resolved, "borderColor")).unwrap();
        assert!(border.lightness() < 90.0);
    }

    #[test]
    fn test_gutter_highlight_falls_back_to_foreground() {
        let resolved = resolve(&Theme::new("t", ThemeKind::Light).with_fg("#24292e"));
        assert_eq!(value(&resolved, "gutterHighlightForeground"), "#24292e");
    }

    #[test]
    fn test_builtins_resolve() {
        let dark = resolve(&Theme::builtin_dark());
        assert!(Rgba::parse(value(&dark, CODE_BACKGROUND)).is_some());
        let light = resolve(&Theme::builtin_light());
        assert!(Rgba::parse(value(&light, "scrollbarThumbHoverColor")).is_some());
    }
}
