//! CSS generation.
//!
//! - [`ThemeCssEmitter`] turns style variants into the differential theme
//!   stylesheet.
//! - [`core_base_styles`] holds the theme-independent block styles, authored
//!   nested and flattened with [`flatten_nested_css`].
//! - [`wrap_in_cascade_layer`] places either stylesheet in an `@layer`.
//!
//! All output is compact: no indentation, no trailing semicolons, no
//! comments.

mod base;
mod emitter;
mod flatten;
mod layer;
mod rule;

pub use base::{core_base_styles, BaseStyleOptions};
pub use emitter::{ThemeCssEmitter, ThemeCssOptions, BLOCK_SELECTOR};
pub use flatten::flatten_nested_css;
pub use layer::wrap_in_cascade_layer;
pub use rule::{at_rule, CssRule};
