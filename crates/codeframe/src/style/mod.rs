//! Style settings: declaration, overrides and per-theme resolution.
//!
//! The pipeline in this module turns themes into style variants:
//!
//! 1. Contributors (the core, then plugins) declare [`StyleSettingDef`]s.
//!    [`StyleSettingRegistry`] gives each one its full [`StyleSettingPath`]
//!    and rejects duplicates.
//! 2. [`StyleSettingResolver`] resolves every path for one theme, applying
//!    [`StyleOverrides`] before theme-derived and static defaults.
//! 3. [`resolve_style_variants`] runs the resolver once per theme and maps
//!    paths to CSS variable names, producing one [`StyleVariant`] per theme.

mod core_settings;
mod overrides;
mod path;
mod resolver;
mod settings;
mod value;

pub use core_settings::{core_contributor, core_setting_paths, CODE_BACKGROUND};
pub use overrides::StyleOverrides;
pub use path::{css_var, css_var_name, StyleSettingPath, CSS_VAR_PREFIX};
pub use resolver::{
    resolve_style_variants, CssVarDeclarations, ResolveContext, StyleSettingResolver,
    StyleVariant,
};
pub use settings::{
    Contributor, DeriveFn, RegisteredSetting, StyleSettingDef, StyleSettingRegistry,
    CORE_CONTRIBUTOR,
};
pub use value::StyleValue;
