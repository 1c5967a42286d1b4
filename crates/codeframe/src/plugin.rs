//! Plugins: named contributors of style settings, base styles and scripts.
//!
//! ```rust
//! use codeframe::{Plugin, StyleSettingDef};
//!
//! let frames = Plugin::new("frames")
//!     .style_setting(StyleSettingDef::new("shadowColor").default_value(("#0008", "#0002")))
//!     .base_styles(".codeframe .frame{box-shadow:0 2px 6px var(--cf-frames-shadowColor)}")
//!     .js_modules(vec!["export function init(){}"]);
//!
//! assert_eq!(frames.name(), "frames");
//! ```

use crate::context::Contribution;
use crate::style::{Contributor, StyleSettingDef};

/// A named extension of the engine.
///
/// Style settings declared by a plugin live under `<name>.<property>` and
/// become `--cf-<name>-<property>` variables.
#[derive(Debug, Clone)]
pub struct Plugin {
    name: String,
    style_settings: Vec<StyleSettingDef>,
    base_styles: Option<Contribution<String>>,
    js_modules: Option<Contribution<Vec<String>>>,
}

impl Plugin {
    /// Creates a plugin that contributes nothing yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            style_settings: Vec::new(),
            base_styles: None,
            js_modules: None,
        }
    }

    /// Declares a style setting.
    pub fn style_setting(mut self, def: StyleSettingDef) -> Self {
        self.style_settings.push(def);
        self
    }

    /// Sets the plugin's base styles. Nested rules are allowed.
    pub fn base_styles(mut self, styles: impl Into<Contribution<String>>) -> Self {
        self.base_styles = Some(styles.into());
        self
    }

    /// Sets the script modules the plugin needs on the page.
    pub fn js_modules(mut self, modules: impl Into<Contribution<Vec<String>>>) -> Self {
        self.js_modules = Some(modules.into());
        self
    }

    /// Returns the plugin name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared style settings.
    pub fn style_settings(&self) -> &[StyleSettingDef] {
        &self.style_settings
    }

    pub(crate) fn base_styles_contribution(&self) -> Option<&Contribution<String>> {
        self.base_styles.as_ref()
    }

    pub(crate) fn js_modules_contribution(&self) -> Option<&Contribution<Vec<String>>> {
        self.js_modules.as_ref()
    }

    pub(crate) fn contributor(&self) -> Contributor {
        Contributor::plugin(self.name.clone(), self.style_settings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleSettingRegistry;

    #[test]
    fn test_plugin_contributor_prefixes_paths() {
        let plugin = Plugin::new("frames")
            .style_setting(StyleSettingDef::new("shadowColor").default_value("#0004"))
            .style_setting(StyleSettingDef::new("titleColor").default_value("inherit"));
        let contributor = plugin.contributor();
        let registry = StyleSettingRegistry::new([&contributor]).unwrap();

        let paths: Vec<_> = registry.iter().map(|s| s.path().to_string()).collect();
        assert_eq!(paths, vec!["frames.shadowColor", "frames.titleColor"]);
        assert_eq!(contributor.name(), "frames");
    }

    #[test]
    fn test_contributions_are_optional() {
        let plugin = Plugin::new("bare");
        assert!(plugin.base_styles_contribution().is_none());
        assert!(plugin.js_modules_contribution().is_none());
        assert!(plugin.style_settings().is_empty());
    }

    #[test]
    fn test_static_contributions() {
        let plugin = Plugin::new("p").base_styles("a{b:c}").js_modules(vec!["x", "y"]);
        assert!(matches!(
            plugin.base_styles_contribution(),
            Some(Contribution::Static(css)) if css == "a{b:c}"
        ));
        assert!(matches!(
            plugin.js_modules_contribution(),
            Some(Contribution::Static(modules)) if modules.len() == 2
        ));
    }
}
