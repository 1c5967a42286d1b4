//! Cascade layer wrapping.

/// Wraps `css` in `@layer <layer> {...}`, or returns it unchanged when
/// `layer` is empty.
///
/// The layer name is used as given.
///
/// ```rust
/// use codeframe::css::wrap_in_cascade_layer;
///
/// assert_eq!(wrap_in_cascade_layer("a{b:c}", "ec"), "@layer ec {a{b:c}}");
/// assert_eq!(wrap_in_cascade_layer("a{b:c}", ""), "a{b:c}");
/// ```
pub fn wrap_in_cascade_layer(css: &str, layer: &str) -> String {
    let layer = layer.trim();
    if layer.is_empty() {
        return css.to_string();
    }
    format!("@layer {layer} {{{css}}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_once() {
        let wrapped = wrap_in_cascade_layer(":root{--a:1}", "ec");
        assert!(wrapped.starts_with("@layer ec {"));
        assert!(wrapped.ends_with('}'));
        assert_eq!(wrapped.matches("@layer").count(), 1);
    }

    #[test]
    fn test_empty_layer_passes_through() {
        assert_eq!(wrap_in_cascade_layer(":root{--a:1}", ""), ":root{--a:1}");
        assert_eq!(wrap_in_cascade_layer(":root{--a:1}", "  "), ":root{--a:1}");
    }

    #[test]
    fn test_empty_css_still_wrapped() {
        assert_eq!(wrap_in_cascade_layer("", "ec"), "@layer ec {}");
    }
}
