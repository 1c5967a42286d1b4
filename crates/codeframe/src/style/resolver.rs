//! Resolution of style settings into per-theme CSS variable tables.
//!
//! For every declared setting, in declaration order, the first tier that
//! yields a value wins:
//!
//! 1. The theme's own overrides (its kind section, then its shared entries).
//! 2. The global overrides for the theme's kind (`dark:` / `light:`).
//! 3. The shared global overrides.
//! 4. The contributor's theme-derived default.
//! 5. The contributor's static default.
//!
//! A `[dark, light]` pair is narrowed to the theme's kind at every tier.
//! Derived defaults may ask for other settings of the same theme; those are
//! resolved on demand and memoized, and a dependency cycle is reported
//! instead of recursing forever.

use std::cell::RefCell;
use std::sync::Arc;

use tracing::debug;

use super::overrides::StyleOverrides;
use super::path::{css_var_name, StyleSettingPath};
use super::settings::StyleSettingRegistry;
use crate::colorspace::Rgba;
use crate::error::{EngineError, Result};
use crate::theme::{Theme, ThemeKind};

/// Resolves style settings for one theme at a time.
#[derive(Debug, Clone, Copy)]
pub struct StyleSettingResolver<'a> {
    registry: &'a StyleSettingRegistry,
    overrides: &'a StyleOverrides,
}

impl<'a> StyleSettingResolver<'a> {
    /// Creates a resolver over the declared settings and global overrides.
    pub fn new(registry: &'a StyleSettingRegistry, overrides: &'a StyleOverrides) -> Self {
        Self {
            registry,
            overrides,
        }
    }

    /// Resolves every declared setting for `theme`, in declaration order.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::UnresolvedStyleSetting`] if no tier yields a
    /// value, [`EngineError::StyleSettingCycle`] if derived defaults depend
    /// on each other, or whatever a derived default returned.
    pub fn resolve(&self, theme: &Theme) -> Result<Vec<(StyleSettingPath, String)>> {
        let pass = Pass::new(self, theme);
        self.registry
            .iter()
            .enumerate()
            .map(|(index, setting)| Ok((setting.path().clone(), pass.value(index)?)))
            .collect()
    }

    /// Resolves a single setting for `theme`, plus whatever it depends on.
    pub fn resolve_path(&self, theme: &Theme, path: &str) -> Result<String> {
        Pass::new(self, theme).value_of(path)
    }
}

/// One resolution pass over a single theme.
struct Pass<'a> {
    registry: &'a StyleSettingRegistry,
    overrides: &'a StyleOverrides,
    theme: &'a Theme,
    cache: RefCell<Vec<Option<String>>>,
    stack: RefCell<Vec<usize>>,
}

impl<'a> Pass<'a> {
    fn new(resolver: &StyleSettingResolver<'a>, theme: &'a Theme) -> Self {
        Self {
            registry: resolver.registry,
            overrides: resolver.overrides,
            theme,
            cache: RefCell::new(vec![None; resolver.registry.len()]),
            stack: RefCell::new(Vec::new()),
        }
    }

    fn value_of(&self, path: &str) -> Result<String> {
        let index = self
            .registry
            .index_of(path)
            .ok_or_else(|| EngineError::UnknownStyleSetting {
                path: path.to_string(),
            })?;
        self.value(index)
    }

    fn value(&self, index: usize) -> Result<String> {
        if let Some(value) = &self.cache.borrow()[index] {
            return Ok(value.clone());
        }

        if self.stack.borrow().contains(&index) {
            let stack = self.stack.borrow();
            let mut path: Vec<String> = stack
                .iter()
                .skip_while(|&&i| i != index)
                .map(|&i| self.registry.at(i).path().to_string())
                .collect();
            path.push(self.registry.at(index).path().to_string());
            return Err(EngineError::StyleSettingCycle { path });
        }

        self.stack.borrow_mut().push(index);
        let result = self.compute(index);
        self.stack.borrow_mut().pop();

        let value = result?;
        self.cache.borrow_mut()[index] = Some(value.clone());
        Ok(value)
    }

    fn compute(&self, index: usize) -> Result<String> {
        let setting = self.registry.at(index);
        let path = setting.path().as_str();
        let kind = self.theme.kind();

        let overridden = self
            .theme
            .style_overrides()
            .lookup(kind, path)
            .or_else(|| self.overrides.lookup(kind, path));
        if let Some(value) = overridden {
            return Ok(value.to_string());
        }

        if let Some(derive) = setting.def().derive_fn() {
            if let Some(value) = derive(&ResolveContext { pass: self })? {
                return Ok(value);
            }
        }

        if let Some(default) = setting.def().static_default() {
            return Ok(default.for_kind(kind).to_string());
        }

        Err(EngineError::UnresolvedStyleSetting {
            path: path.to_string(),
            contributor: setting.contributor().to_string(),
            theme: self.theme.name().to_string(),
        })
    }
}

/// What a theme-derived default can see while it runs.
pub struct ResolveContext<'a> {
    pass: &'a Pass<'a>,
}

impl ResolveContext<'_> {
    /// The theme being resolved.
    pub fn theme(&self) -> &Theme {
        self.pass.theme
    }

    /// The kind of the theme being resolved.
    pub fn kind(&self) -> ThemeKind {
        self.pass.theme.kind()
    }

    /// Workbench color of the theme, e.g. `editorLineNumber.foreground`.
    pub fn color(&self, key: &str) -> Option<String> {
        self.pass.theme.color(key).map(str::to_string)
    }

    /// Resolved value of another setting for the same theme.
    ///
    /// # Errors
    ///
    /// Fails with [`EngineError::UnknownStyleSetting`] if `path` is not
    /// declared, or with [`EngineError::StyleSettingCycle`] if `path`
    /// (transitively) depends on the caller.
    pub fn resolve(&self, path: &str) -> Result<String> {
        self.pass.value_of(path)
    }

    /// Like [`resolve`](Self::resolve), parsed as a concrete color.
    ///
    /// Returns `Ok(None)` when the value is not a concrete color (a `var()`
    /// reference, a keyword, ...).
    pub fn resolve_color(&self, path: &str) -> Result<Option<Rgba>> {
        Ok(Rgba::parse(&self.resolve(path)?))
    }
}

/// Ordered `--name: value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssVarDeclarations(Vec<(String, String)>);

impl CssVarDeclarations {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a declaration.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Looks up a value by variable name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of declarations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no declarations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Declarations whose value differs from `base` (exact string
    /// comparison), in this table's order.
    pub fn diff(&self, base: &CssVarDeclarations) -> CssVarDeclarations {
        self.0
            .iter()
            .filter(|(name, value)| base.get(name) != Some(value.as_str()))
            .cloned()
            .collect()
    }
}

impl FromIterator<(String, String)> for CssVarDeclarations {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The resolved CSS variables of one theme.
#[derive(Debug, Clone)]
pub struct StyleVariant {
    theme: Arc<Theme>,
    index: usize,
    declarations: CssVarDeclarations,
}

impl StyleVariant {
    /// The theme this variant was resolved from.
    pub fn theme(&self) -> &Arc<Theme> {
        &self.theme
    }

    /// Position in the themes list. `0` is the base variant.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Every declared setting as a CSS variable, in declaration order.
    pub fn css_var_declarations(&self) -> &CssVarDeclarations {
        &self.declarations
    }

    /// Resolved value of a setting path.
    pub fn value(&self, path: &str) -> Option<&str> {
        self.declarations.get(&css_var_name(path))
    }
}

/// Resolves one style variant per theme, preserving order.
///
/// # Errors
///
/// Propagates the first resolution error.
pub fn resolve_style_variants(
    themes: &[Arc<Theme>],
    registry: &StyleSettingRegistry,
    overrides: &StyleOverrides,
) -> Result<Vec<StyleVariant>> {
    let resolver = StyleSettingResolver::new(registry, overrides);
    themes
        .iter()
        .enumerate()
        .map(|(index, theme)| {
            let declarations = resolver
                .resolve(theme)?
                .into_iter()
                .map(|(path, value)| (path.css_var_name(), value))
                .collect::<CssVarDeclarations>();
            debug!(
                theme = theme.name(),
                index,
                settings = declarations.len(),
                "resolved style variant"
            );
            Ok(StyleVariant {
                theme: Arc::clone(theme),
                index,
                declarations,
            })
        })
        .collect()
}
