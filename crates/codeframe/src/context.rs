//! Context handed to plugin contributions.
//!
//! Plugins contribute base styles and script modules either as plain values
//! or as async functions of the engine state. Both forms are expressed by
//! [`Contribution`], which the engine resolves uniformly, one contributor at a
//! time and in configured order.
//!
//! # Example
//!
//! ```rust
//! use codeframe::{BoxError, Contribution, StyleContext};
//!
//! // Static CSS
//! let fixed: Contribution<String> = Contribution::Static(".codeframe .title{margin:0}".into());
//!
//! // CSS computed from the resolved configuration. The future must own its
//! // data, so copy what it needs out of the context first.
//! let computed = Contribution::computed(|cx: &StyleContext<'_>| {
//!     let layer = cx.config.cascade_layer().to_string();
//!     async move { Ok::<_, BoxError>(format!("/* layer: {layer} */")) }
//! });
//! # let _ = (fixed, computed);
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::ResolvedConfig;
use crate::error::{BoxError, EngineError, Result};
use crate::style::{css_var, StyleVariant};
use crate::theme::Theme;

/// A boxed future for async contributions.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Async function producing a contribution.
pub type ContributionFn<T> =
    Arc<dyn Fn(&StyleContext<'_>) -> BoxFuture<'static, std::result::Result<T, BoxError>> + Send + Sync>;

/// Engine state visible to contributions.
#[derive(Debug, Clone, Copy)]
pub struct StyleContext<'a> {
    /// The resolved configuration.
    pub config: &'a ResolvedConfig,
    /// One style variant per theme, base first.
    pub style_variants: &'a [StyleVariant],
}

impl<'a> StyleContext<'a> {
    /// The adjusted themes, in configured order.
    pub fn themes(&self) -> impl Iterator<Item = &'a Theme> + 'a {
        self.style_variants.iter().map(|variant| variant.theme().as_ref())
    }

    /// `var()` reference to a style setting, e.g. `var(--cf-codeBackground)`.
    pub fn css_var(&self, path: &str) -> String {
        css_var(path)
    }
}

/// A value that is either given up front or computed by an async function.
pub enum Contribution<T> {
    /// A fixed value.
    Static(T),
    /// Computed on every resolution.
    Computed(ContributionFn<T>),
}

impl<T: 'static> Contribution<T> {
    /// Wraps an async function.
    pub fn computed<F, Fut>(f: F) -> Self
    where
        F: Fn(&StyleContext<'_>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, BoxError>> + Send + 'static,
    {
        Contribution::Computed(Arc::new(
            move |cx: &StyleContext<'_>| -> BoxFuture<'static, std::result::Result<T, BoxError>> {
                Box::pin(f(cx))
            },
        ))
    }
}

impl<T: Clone> Contribution<T> {
    /// Produces the value.
    ///
    /// # Errors
    ///
    /// Errors returned by a computed contribution surface as
    /// [`EngineError::Caller`].
    pub async fn resolve(&self, cx: &StyleContext<'_>) -> Result<T> {
        match self {
            Contribution::Static(value) => Ok(value.clone()),
            Contribution::Computed(f) => f(cx).await.map_err(EngineError::Caller),
        }
    }
}

impl<T: Clone> Clone for Contribution<T> {
    fn clone(&self) -> Self {
        match self {
            Contribution::Static(value) => Contribution::Static(value.clone()),
            Contribution::Computed(f) => Contribution::Computed(Arc::clone(f)),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Contribution<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Contribution::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Contribution::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

impl From<&str> for Contribution<String> {
    fn from(value: &str) -> Self {
        Contribution::Static(value.to_string())
    }
}

impl From<String> for Contribution<String> {
    fn from(value: String) -> Self {
        Contribution::Static(value)
    }
}

impl<S: Into<String>> From<Vec<S>> for Contribution<Vec<String>> {
    fn from(values: Vec<S>) -> Self {
        Contribution::Static(values.into_iter().map(Into::into).collect())
    }
}
