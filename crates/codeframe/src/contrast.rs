//! Minimum contrast enforcement for syntax highlighting colors.
//!
//! Themes ship token colors tuned for their own editor background. Once a
//! page overrides the code background, or simply because a theme is
//! low-contrast, some of those colors become hard to read. This module
//! rewrites a theme's foreground colors in place until each one reaches a
//! minimum WCAG contrast ratio against a reference background.
//!
//! Contrast is measured in sRGB relative luminance (the WCAG definition);
//! the adjustment itself moves only the CIE LAB lightness, so hues survive.
//!
//! ```rust
//! use codeframe::colorspace::{contrast_ratio, Rgba};
//! use codeframe::contrast::ensure_min_contrast;
//!
//! let bg = Rgba::rgb(0x24, 0x29, 0x2e);
//! let dim = Rgba::rgb(0x44, 0x4d, 0x56);
//! let readable = ensure_min_contrast(dim, bg, 5.5);
//! assert!(contrast_ratio(readable, bg) >= 5.5);
//! ```

use tracing::trace;

use crate::colorspace::{contrast_ratio, relative_luminance, Rgba};
use crate::theme::Theme;

/// Background luminance at which black and white text have equal contrast.
///
/// Below it, lightening a foreground is the direction that gains contrast.
const LUMINANCE_CROSSOVER: f64 = 0.1791;

/// Binary search steps on LAB lightness.
const SEARCH_STEPS: usize = 32;

/// Returns `foreground` adjusted to reach `min_ratio` contrast on `background`.
///
/// Translucent foregrounds are composited over the background first, so the
/// result is always opaque. A color that already passes is returned
/// composited but otherwise unchanged.
///
/// A translucent background lets an unknown page color show through, so
/// there is nothing to measure against: `foreground` is returned as is. The
/// same holds for a `min_ratio` that is not positive (including NaN).
///
/// When even pure white (on dark backgrounds) or pure black (on light ones)
/// cannot reach `min_ratio`, that extreme is returned since no color does
/// better.
pub fn ensure_min_contrast(foreground: Rgba, background: Rgba, min_ratio: f64) -> Rgba {
    if min_ratio.is_nan() || min_ratio <= 0.0 || !background.is_opaque() {
        return foreground;
    }
    let foreground = foreground.over(background);
    if contrast_ratio(foreground, background) >= min_ratio {
        return foreground;
    }

    let lighten = relative_luminance(background) < LUMINANCE_CROSSOVER;
    let original = foreground.lightness();
    let (mut lo, mut hi) = if lighten {
        (original, 100.0)
    } else {
        (0.0, original)
    };

    let mut best = None;
    for _ in 0..SEARCH_STEPS {
        let mid = (lo + hi) * 0.5;
        let candidate = foreground.with_lightness(mid);
        if contrast_ratio(candidate, background) >= min_ratio {
            best = Some(candidate);
            // Passing: move back toward the original lightness.
            if lighten {
                hi = mid;
            } else {
                lo = mid;
            }
        } else if lighten {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    best.unwrap_or(if lighten { Rgba::WHITE } else { Rgba::BLACK })
}

/// Rewrites the syntax highlighting colors of `theme` so each one reaches
/// `min_ratio` against `background`.
///
/// Covers the theme's default foreground and every token color foreground
/// that parses as a concrete color; anything else is left untouched, as are
/// colors that already pass. A `min_ratio` that is not positive (including
/// NaN) or a translucent `background` disables the pass.
///
/// Returns the number of colors that were changed.
pub fn adjust_theme(theme: &mut Theme, min_ratio: f64, background: Rgba) -> usize {
    if min_ratio.is_nan() || min_ratio <= 0.0 || !background.is_opaque() {
        return 0;
    }

    let theme_name = theme.name().to_string();
    let mut adjusted = 0;
    let mut adjust = |slot: &mut Option<String>| {
        let Some(current) = slot.as_deref().and_then(Rgba::parse) else {
            return;
        };
        if contrast_ratio(current.over(background), background) >= min_ratio {
            return;
        }
        let replacement = ensure_min_contrast(current, background, min_ratio).to_hex();
        trace!(
            theme = %theme_name,
            from = %current,
            to = %replacement,
            "adjusted color for contrast"
        );
        *slot = Some(replacement);
        adjusted += 1;
    };

    adjust(theme.fg_slot_mut());
    for token in theme.token_colors_mut() {
        adjust(&mut token.settings.foreground);
    }

    adjusted
}
