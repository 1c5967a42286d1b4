//! Color themes and their kind (dark/light).
//!
//! A [`Theme`] is the input side of the pipeline: the engine derives one
//! style variant per configured theme from its workbench colors, and rewrites
//! its token colors for contrast before doing so.
//!
//! Unlike adaptive terminal styles, where one definition carries both light
//! and dark variations, here every theme has a single [`ThemeKind`]. Light
//! and dark support comes from configuring several themes; the kind decides
//! which one answers `prefers-color-scheme` and which half of a
//! `[dark, light]` style value applies.
//!
//! ## Built-ins
//!
//! [`Theme::builtin_dark`] and [`Theme::builtin_light`] are the defaults when
//! no themes are configured.

mod builtin;
mod kind;
#[allow(clippy::module_inception)]
mod theme;

pub use builtin::{builtin_names, builtin_theme};
pub use kind::ThemeKind;
pub use theme::{Theme, TokenColor, TokenSettings, EDITOR_BACKGROUND, EDITOR_FOREGROUND};
