//! Concrete CSS colors and the color math used by themes and contrast checks.
//!
//! # Concrete vs. Symbolic Colors
//!
//! Style settings are CSS values, and many of them are not colors a program can
//! reason about: `var(--page-bg)`, `color-mix(in srgb, ...)` or `inherit` only
//! get a value inside a browser. [`Rgba::parse`] accepts the subset of CSS color
//! syntax that denotes exactly one sRGB color and returns `None` for everything
//! else:
//!
//! | Syntax | Example |
//! |--------|---------|
//! | Hex, 3/4/6/8 digits | `#fff`, `#0008`, `#24292e`, `#3392ff44` |
//! | `rgb()` / `rgba()` | `rgb(36 41 46)`, `rgba(36, 41, 46, 0.5)`, `rgb(100% 0% 0% / 50%)` |
//! | Keywords | `black`, `white`, `transparent` |
//!
//! Parsing is built on the `cssparser` tokenizer, so comments, escapes and
//! whitespace are handled the way a browser handles them.
//!
//! # Lightness Adjustments in CIE LAB
//!
//! Lightening and darkening happen in CIE LAB, where equal steps in `L*` are
//! perceived as equal brightness changes, and the hue-carrying `a*`/`b*`
//! components stay put. Contrast is measured with the WCAG 2.1 relative
//! luminance formula in linear sRGB.
//!
//! # Example
//!
//! ```rust
//! use codeframe::colorspace::{contrast_ratio, Rgba};
//!
//! let bg = Rgba::parse("#24292e").unwrap();
//! let fg = Rgba::parse("rgb(106 115 125)").unwrap();
//! assert!(contrast_ratio(fg, bg) < 4.5);
//!
//! let lighter = fg.lighten(0.3);
//! assert!(contrast_ratio(lighter, bg) > contrast_ratio(fg, bg));
//! assert!(Rgba::parse("var(--page-bg)").is_none());
//! ```

use cssparser::{ParseError, Parser, ParserInput, Token};

// ─── RGBA type ──────────────────────────────────────────────────────────────

/// An sRGB color with an 8-bit alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, `255` is fully opaque.
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parses a concrete CSS color.
    ///
    /// Returns `None` when the value is not a single concrete color, e.g. a
    /// `var()` reference, an unsupported color function or any other keyword.
    pub fn parse(value: &str) -> Option<Self> {
        let mut input = ParserInput::new(value);
        let mut parser = Parser::new(&mut input);
        parser.parse_entirely(parse_color).ok()
    }

    /// Returns true if the alpha channel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Returns the alpha channel as a fraction in `0.0..=1.0`.
    pub fn alpha(&self) -> f64 {
        f64::from(self.a) / 255.0
    }

    /// Returns this color with the given alpha fraction (clamped to `0.0..=1.0`).
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    /// Scales the existing alpha channel by `factor`.
    pub fn multiply_alpha(self, factor: f64) -> Self {
        self.with_alpha(self.alpha() * factor)
    }

    /// Composites this color over an opaque `background` (source-over).
    ///
    /// The background's own alpha is ignored; the result is always opaque.
    pub fn over(self, background: Rgba) -> Self {
        let alpha = self.alpha();
        let blend = |fg: u8, bg: u8| -> u8 {
            (f64::from(fg) * alpha + f64::from(bg) * (1.0 - alpha)).round() as u8
        };
        Self::rgb(
            blend(self.r, background.r),
            blend(self.g, background.g),
            blend(self.b, background.b),
        )
    }

    /// Mixes two colors channel-wise; `amount = 0.0` returns `self`,
    /// `amount = 1.0` returns `other`.
    pub fn mix(self, other: Rgba, amount: f64) -> Self {
        let t = amount.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| -> u8 { (f64::from(a) + t * (f64::from(b) - f64::from(a))).round() as u8 };
        Self::new(
            lerp(self.r, other.r),
            lerp(self.g, other.g),
            lerp(self.b, other.b),
            lerp(self.a, other.a),
        )
    }

    /// Shifts the CIE LAB lightness by `amount` (a fraction of the full
    /// `0..100` L* range). Negative amounts darken. Alpha is preserved.
    pub fn lighten(self, amount: f64) -> Self {
        let lab = rgb_to_lab(self);
        let shifted = Lab {
            l: (lab.l + amount * 100.0).clamp(0.0, 100.0),
            ..lab
        };
        Self {
            a: self.a,
            ..lab_to_rgb(shifted)
        }
    }

    /// Returns the CIE LAB lightness (`0.0..=100.0`) of this color.
    pub fn lightness(&self) -> f64 {
        rgb_to_lab(*self).l
    }

    /// Returns a copy with the CIE LAB lightness replaced, keeping `a*`/`b*`.
    pub fn with_lightness(self, lightness: f64) -> Self {
        let lab = rgb_to_lab(self);
        Self {
            a: self.a,
            ..lab_to_rgb(Lab {
                l: lightness.clamp(0.0, 100.0),
                ..lab
            })
        }
    }

    /// Formats as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    fn from_hex_digits(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Some(Self::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ─── CSS color parsing ─────────────────────────────────────────────────────

fn parse_color<'i>(input: &mut Parser<'i, '_>) -> Result<Rgba, ParseError<'i, ()>> {
    let token = input.next()?.clone();
    match token {
        Token::Hash(ref hex) | Token::IDHash(ref hex) => {
            Rgba::from_hex_digits(hex).ok_or_else(|| input.new_custom_error(()))
        }
        Token::Ident(ref name) if name.eq_ignore_ascii_case("black") => Ok(Rgba::BLACK),
        Token::Ident(ref name) if name.eq_ignore_ascii_case("white") => Ok(Rgba::WHITE),
        Token::Ident(ref name) if name.eq_ignore_ascii_case("transparent") => {
            Ok(Rgba::TRANSPARENT)
        }
        Token::Function(ref name)
            if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") =>
        {
            input.parse_nested_block(parse_rgb_arguments)
        }
        _ => Err(input.new_custom_error(())),
    }
}

/// Parses both the legacy comma syntax and the space-separated syntax with
/// an optional `/ alpha`.
fn parse_rgb_arguments<'i>(input: &mut Parser<'i, '_>) -> Result<Rgba, ParseError<'i, ()>> {
    let mut channels = [0u8; 3];
    for (i, channel) in channels.iter_mut().enumerate() {
        if i > 0 {
            let _ = input.try_parse(|p| p.expect_comma());
        }
        *channel = parse_channel(input)?;
    }

    let alpha = if input.is_exhausted() {
        255
    } else {
        input
            .try_parse(|p| p.expect_comma())
            .or_else(|_| input.expect_delim('/'))?;
        parse_alpha(input)?
    };
    input.expect_exhausted()?;

    Ok(Rgba::new(channels[0], channels[1], channels[2], alpha))
}

fn parse_channel<'i>(input: &mut Parser<'i, '_>) -> Result<u8, ParseError<'i, ()>> {
    let token = input.next()?.clone();
    match token {
        Token::Number { value, .. } => Ok(value.clamp(0.0, 255.0).round() as u8),
        Token::Percentage { unit_value, .. } => {
            Ok((unit_value.clamp(0.0, 1.0) * 255.0).round() as u8)
        }
        _ => Err(input.new_custom_error(())),
    }
}

fn parse_alpha<'i>(input: &mut Parser<'i, '_>) -> Result<u8, ParseError<'i, ()>> {
    let token = input.next()?.clone();
    let fraction = match token {
        Token::Number { value, .. } => value,
        Token::Percentage { unit_value, .. } => unit_value,
        _ => return Err(input.new_custom_error(())),
    };
    Ok((fraction.clamp(0.0, 1.0) * 255.0).round() as u8)
}

// ─── WCAG luminance and contrast ───────────────────────────────────────────

/// Computes the WCAG 2.1 relative luminance (`0.0` black to `1.0` white).
///
/// Alpha is ignored; composite with [`Rgba::over`] first when it matters.
pub fn relative_luminance(color: Rgba) -> f64 {
    let r = srgb_to_linear(color.r);
    let g = srgb_to_linear(color.g);
    let b = srgb_to_linear(color.b);
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Computes the WCAG 2.1 contrast ratio between two colors (`1.0..=21.0`).
///
/// The result does not depend on argument order.
pub fn contrast_ratio(a: Rgba, b: Rgba) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

// ─── CIE LAB internals ─────────────────────────────────────────────────────

/// CIE LAB color.
#[derive(Debug, Clone, Copy)]
struct Lab {
    l: f64,
    a: f64,
    b: f64,
}

/// D65 reference white point for CIE XYZ → LAB conversion.
const XN: f64 = 0.95047;
const YN: f64 = 1.00000;
const ZN: f64 = 1.08883;

/// Convert an sRGB component (0–255) to linear light (0.0–1.0).
fn srgb_to_linear(c: u8) -> f64 {
    let c = f64::from(c) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert a linear light value (0.0–1.0) to sRGB (0–255), clamped.
fn linear_to_srgb(c: f64) -> u8 {
    let c = c.clamp(0.0, 1.0);
    let s = if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (s * 255.0).round() as u8
}

fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    if t > 0.206896 {
        t * t * t
    } else {
        (t - 16.0 / 116.0) / 7.787
    }
}

fn rgb_to_lab(rgb: Rgba) -> Lab {
    let r = srgb_to_linear(rgb.r);
    let g = srgb_to_linear(rgb.g);
    let b = srgb_to_linear(rgb.b);

    // sRGB → XYZ (D65)
    let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
    let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
    let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

    let fx = lab_f(x / XN);
    let fy = lab_f(y / YN);
    let fz = lab_f(z / ZN);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Returns an opaque color; callers restore alpha where needed.
fn lab_to_rgb(lab: Lab) -> Rgba {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = lab.a / 500.0 + fy;
    let fz = fy - lab.b / 200.0;

    let x = XN * lab_f_inv(fx);
    let y = YN * lab_f_inv(fy);
    let z = ZN * lab_f_inv(fz);

    // XYZ → linear RGB (D65)
    let r = 3.2404542 * x - 1.5371385 * y - 0.4985314 * z;
    let g = -0.9692660 * x + 1.8760108 * y + 0.0415560 * z;
    let b = 0.0556434 * x - 0.2040259 * y + 1.0572252 * z;

    Rgba::rgb(linear_to_srgb(r), linear_to_srgb(g), linear_to_srgb(b))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
