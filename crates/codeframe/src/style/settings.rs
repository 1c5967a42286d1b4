//! Style setting declarations and the registry that validates them.
//!
//! Each contributor (the core, then every plugin in configured order)
//! declares a fixed list of settings. The registry assigns every setting its
//! full path and rejects duplicates, which keeps the declaration order stable
//! for everything derived from it.

use std::collections::HashMap;
use std::sync::Arc;

use super::path::StyleSettingPath;
use super::resolver::ResolveContext;
use super::value::StyleValue;
use crate::error::{EngineError, Result};

/// Name reported for settings declared by the core.
pub const CORE_CONTRIBUTOR: &str = "core";

/// Computes a setting's default from the theme being resolved.
///
/// Returning `Ok(None)` means the theme has nothing to offer and resolution
/// falls through to the static default.
pub type DeriveFn = Arc<dyn Fn(&ResolveContext<'_>) -> Result<Option<String>> + Send + Sync>;

/// Declaration of a single style setting.
#[derive(Clone)]
pub struct StyleSettingDef {
    property: String,
    derive: Option<DeriveFn>,
    default: Option<StyleValue>,
}

impl StyleSettingDef {
    /// Declares a setting. `property` is relative to the contributor.
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            derive: None,
            default: None,
        }
    }

    /// Sets the static default.
    pub fn default_value(mut self, value: impl Into<StyleValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the theme-derived default.
    pub fn derive<F>(mut self, derive: F) -> Self
    where
        F: Fn(&ResolveContext<'_>) -> Result<Option<String>> + Send + Sync + 'static,
    {
        self.derive = Some(Arc::new(derive));
        self
    }

    /// Returns the property name relative to the contributor.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Returns the static default.
    pub fn static_default(&self) -> Option<&StyleValue> {
        self.default.as_ref()
    }

    pub(crate) fn derive_fn(&self) -> Option<&DeriveFn> {
        self.derive.as_ref()
    }
}

impl std::fmt::Debug for StyleSettingDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleSettingDef")
            .field("property", &self.property)
            .field("derive", &self.derive.as_ref().map(|_| "<fn>"))
            .field("default", &self.default)
            .finish()
    }
}

/// A named group of style settings.
#[derive(Debug, Clone)]
pub struct Contributor {
    name: Option<String>,
    settings: Vec<StyleSettingDef>,
}

impl Contributor {
    /// The core contributor, whose paths are not prefixed.
    pub fn core(settings: Vec<StyleSettingDef>) -> Self {
        Self {
            name: None,
            settings,
        }
    }

    /// A plugin contributor; its paths are prefixed with `name`.
    pub fn plugin(name: impl Into<String>, settings: Vec<StyleSettingDef>) -> Self {
        Self {
            name: Some(name.into()),
            settings,
        }
    }

    /// Returns the name used in error messages.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(CORE_CONTRIBUTOR)
    }
}

/// A setting with its resolved path and owning contributor.
#[derive(Debug, Clone)]
pub struct RegisteredSetting {
    path: StyleSettingPath,
    contributor: String,
    def: StyleSettingDef,
}

impl RegisteredSetting {
    /// Returns the full path.
    pub fn path(&self) -> &StyleSettingPath {
        &self.path
    }

    /// Returns the contributor name.
    pub fn contributor(&self) -> &str {
        &self.contributor
    }

    /// Returns the declaration.
    pub fn def(&self) -> &StyleSettingDef {
        &self.def
    }
}

/// All declared settings in contributor order.
#[derive(Debug, Clone, Default)]
pub struct StyleSettingRegistry {
    settings: Vec<RegisteredSetting>,
    index: HashMap<String, usize>,
}

impl StyleSettingRegistry {
    /// Registers the settings of every contributor, in order.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidStyleSettingPath`] if a contributor name or
    ///   property does not form a valid path.
    /// - [`EngineError::DuplicateStyleSetting`] if a path is declared twice.
    pub fn new<'a, I>(contributors: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Contributor>,
    {
        let mut registry = Self::default();
        for contributor in contributors {
            for def in &contributor.settings {
                registry.register(contributor, def.clone())?;
            }
        }
        Ok(registry)
    }

    fn register(&mut self, contributor: &Contributor, def: StyleSettingDef) -> Result<()> {
        let path = StyleSettingPath::for_contributor(contributor.name.as_deref(), &def.property)?;
        if let Some(&existing) = self.index.get(path.as_str()) {
            return Err(EngineError::DuplicateStyleSetting {
                path: path.to_string(),
                first: self.settings[existing].contributor.clone(),
                second: contributor.name().to_string(),
            });
        }
        self.index.insert(path.to_string(), self.settings.len());
        self.settings.push(RegisteredSetting {
            path,
            contributor: contributor.name().to_string(),
            def,
        });
        Ok(())
    }

    /// Looks up a setting by its full path.
    pub fn get(&self, path: &str) -> Option<&RegisteredSetting> {
        self.index_of(path).map(|i| &self.settings[i])
    }

    /// Returns `true` if some contributor declared `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Iterates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredSetting> {
        self.settings.iter()
    }

    /// Returns the number of declared settings.
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Returns `true` if nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    pub(crate) fn index_of(&self, path: &str) -> Option<usize> {
        self.index.get(path).copied()
    }

    pub(crate) fn at(&self, index: usize) -> &RegisteredSetting {
        &self.settings[index]
    }
}
