//! Error types for engine construction and CSS emission.
//!
//! Every fallible operation returns [`EngineError`]. Errors fall into three
//! groups:
//!
//! - Configuration errors: the setup cannot be honored as requested
//!   (duplicate style settings, malformed setting paths, a dark-mode media
//!   query without a theme of each kind, unparseable YAML).
//! - Resolution errors: a style setting ends up without a value, or
//!   derived defaults reference each other in a cycle.
//! - Caller errors: whatever a caller-supplied function returned, passed
//!   through as-is.
//!
//! Nothing is retried; a failing call produces no partial output.

use thiserror::Error;

/// Boxed error returned by caller-supplied functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while building the engine or emitting CSS.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Two contributors declared the same style setting path.
    #[error("style setting '{path}' is declared by both '{first}' and '{second}'")]
    DuplicateStyleSetting {
        path: String,
        first: String,
        second: String,
    },

    /// A style setting path is not made of identifier segments.
    #[error("invalid style setting path '{path}': {reason}")]
    InvalidStyleSettingPath { path: String, reason: String },

    /// `use_dark_mode_media_query` was requested, but no alternate theme has
    /// the kind opposite to the base theme.
    #[error(
        "the dark mode media query requires at least one dark and one light theme, \
         but the configured themes are: {}",
        .themes.join(", ")
    )]
    DarkModeMediaQuery {
        /// Configured themes as `name (kind)`.
        themes: Vec<String>,
    },

    /// No precedence tier produced a value for a declared setting.
    #[error(
        "style setting '{path}' declared by '{contributor}' has no value for theme '{theme}' \
         (no override, no theme-derived default and no static default)"
    )]
    UnresolvedStyleSetting {
        path: String,
        contributor: String,
        theme: String,
    },

    /// Derived defaults reference each other in a cycle.
    #[error("cycle detected in style settings: {}", .path.join(" -> "))]
    StyleSettingCycle { path: Vec<String> },

    /// A derived default referenced a path no contributor declares.
    #[error("unknown style setting '{path}'")]
    UnknownStyleSetting { path: String },

    /// At least one theme is required.
    #[error("at least one theme must be configured")]
    NoThemes,

    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error returned by a caller-supplied function, passed through untouched.
    #[error(transparent)]
    Caller(BoxError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
