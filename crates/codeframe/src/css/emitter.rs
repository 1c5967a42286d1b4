//! Differential theme CSS.
//!
//! The base variant (index 0) declares all of its variables on the root
//! selector. Every other variant only declares the variables whose value
//! differs from the base, so switching themes costs one small rule per theme
//! instead of a full variable set.
//!
//! With themes `[night (dark), day (light)]`, the default selector and the
//! media query enabled, the output is (wrapped here for reading):
//!
//! ```css
//! :root{--cf-codeBackground:#0d1117;...}
//! .codeframe :where(span[style^='--']:not([class])){color:var(--0,inherit);...}
//! :root:not([data-theme='night']) .codeframe[data-theme='night']{--cf-codeBackground:#0d1117;...}
//! :root:not([data-theme='night']) .codeframe[data-theme='night'] :where(span[style^='--']:not([class])){color:var(--0,inherit);...}
//! @media (prefers-color-scheme: light){
//!   :root:not([data-theme='night']){--cf-codeBackground:#ffffff;...}
//!   :root:not([data-theme='night']) .codeframe :where(span[style^='--']:not([class])){color:var(--1,inherit);...}
//! }
//! :root[data-theme='day'] .codeframe,:root:not([data-theme='night']) .codeframe[data-theme='day']{--cf-codeBackground:#ffffff;...}
//! :root[data-theme='day'] .codeframe :where(...),...{color:var(--1,inherit);...}
//! ```
//!
//! Token spans carry one color per theme in inline custom properties
//! (`--0`, `--1`, ... plus `fs`/`fw`/`td` suffixes for font style, weight and
//! decoration); the `:where(...)` rules pick the set belonging to the active
//! theme.

use tracing::debug;

use super::layer::wrap_in_cascade_layer;
use super::rule::{at_rule, CssRule};
use crate::config::ThemeSelector;
use crate::error::{EngineError, Result};
use crate::style::{CssVarDeclarations, StyleVariant};

/// Class of the code block element.
pub const BLOCK_SELECTOR: &str = ".codeframe";

/// Token spans styled through per-theme inline variables.
const TOKEN_SPAN_SELECTOR: &str = ":where(span[style^='--']:not([class]))";

/// Options that shape the theme stylesheet.
#[derive(Debug, Clone, Copy)]
pub struct ThemeCssOptions<'a> {
    /// Selector the variables are declared on, usually `:root`.
    pub root: &'a str,
    /// Per-theme selector generator.
    pub selector: &'a ThemeSelector,
    /// Emit a `prefers-color-scheme` block for the opposite kind.
    pub use_dark_mode_media_query: bool,
    /// Cascade layer wrapping the output. Empty disables.
    pub cascade_layer: &'a str,
}

/// Emits the theme stylesheet for resolved style variants.
#[derive(Debug, Clone, Copy)]
pub struct ThemeCssEmitter<'a> {
    variants: &'a [StyleVariant],
    options: ThemeCssOptions<'a>,
}

impl<'a> ThemeCssEmitter<'a> {
    pub fn new(variants: &'a [StyleVariant], options: ThemeCssOptions<'a>) -> Self {
        Self { variants, options }
    }

    /// Builds the stylesheet.
    ///
    /// Output is deterministic for identical input. Nothing is returned on
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DarkModeMediaQuery`] when the media query is
    /// enabled but no alternate variant has the kind opposite to the base,
    /// and [`EngineError::Caller`] when the selector function fails.
    pub fn emit(&self) -> Result<String> {
        let Some(base) = self.variants.first() else {
            return Ok(wrap_in_cascade_layer("", self.options.cascade_layer));
        };
        let root = self.options.root;
        let base_declarations = base.css_var_declarations();

        let base_selector = self.options.selector.select(base.theme())?;
        let not_base = base_selector
            .as_deref()
            .map(|selector| format!(":not({selector})"))
            .unwrap_or_default();

        let diffs: Vec<CssVarDeclarations> = self
            .variants
            .iter()
            .map(|variant| variant.css_var_declarations().diff(base_declarations))
            .collect();

        let mut css = String::new();

        // Base variant: all variables on the root, token colors for index 0.
        CssRule::new(root)
            .declare_all(base_declarations.iter())
            .write_to(&mut css);
        token_color_rule([format!("{BLOCK_SELECTOR} {TOKEN_SPAN_SELECTOR}")], 0).write_to(&mut css);

        // A block may ask for the base theme inside a page showing another
        // theme. Only variables some alternate changes need restoring.
        if let Some(base_selector) = &base_selector {
            let scope = format!("{root}{not_base} {BLOCK_SELECTOR}{base_selector}");
            let restored = base_declarations
                .iter()
                .filter(|(name, _)| diffs.iter().any(|diff| diff.get(name).is_some()));
            CssRule::new(scope.as_str())
                .declare_all(restored)
                .write_to(&mut css);
            token_color_rule([format!("{scope} {TOKEN_SPAN_SELECTOR}")], 0).write_to(&mut css);
        }

        if self.options.use_dark_mode_media_query {
            let wanted = base.theme().kind().opposite();
            let alternate = self
                .variants
                .iter()
                .skip(1)
                .find(|variant| variant.theme().kind() == wanted)
                .ok_or_else(|| EngineError::DarkModeMediaQuery {
                    themes: self
                        .variants
                        .iter()
                        .map(|v| format!("{} ({})", v.theme().name(), v.theme().kind()))
                        .collect(),
                })?;

            let scope = format!("{root}{not_base}");
            let mut body = String::new();
            CssRule::new(scope.as_str())
                .declare_all(diffs[alternate.index()].iter())
                .write_to(&mut body);
            token_color_rule(
                [format!("{scope} {BLOCK_SELECTOR} {TOKEN_SPAN_SELECTOR}")],
                alternate.index(),
            )
            .write_to(&mut body);
            css.push_str(&at_rule(
                "media",
                &format!("(prefers-color-scheme: {wanted})"),
                &body,
            ));
        }

        if !self.options.selector.is_disabled() {
            for variant in self.variants.iter().skip(1) {
                let Some(selector) = self.options.selector.select(variant.theme())? else {
                    continue;
                };
                let scopes = [
                    format!("{root}{selector} {BLOCK_SELECTOR}"),
                    format!("{root}{not_base} {BLOCK_SELECTOR}{selector}"),
                ];
                CssRule::with_selectors(scopes.iter().cloned())
                    .declare_all(diffs[variant.index()].iter())
                    .write_to(&mut css);
                token_color_rule(
                    scopes.map(|scope| format!("{scope} {TOKEN_SPAN_SELECTOR}")),
                    variant.index(),
                )
                .write_to(&mut css);
            }
        }

        debug!(
            variants = self.variants.len(),
            bytes = css.len(),
            "emitted theme css"
        );
        Ok(wrap_in_cascade_layer(&css, self.options.cascade_layer))
    }
}

/// Rule mapping a variant's inline token variables onto token spans.
fn token_color_rule<I>(selectors: I, index: usize) -> CssRule
where
    I: IntoIterator<Item = String>,
{
    CssRule::with_selectors(selectors)
        .declare("color", format!("var(--{index},inherit)"))
        .declare("font-style", format!("var(--{index}fs,inherit)"))
        .declare("font-weight", format!("var(--{index}fw,inherit)"))
        .declare("text-decoration", format!("var(--{index}td,inherit)"))
}
