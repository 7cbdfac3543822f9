// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Sub, SubAssign};
use core::str::FromStr;

use crate::{NamedColor, ParseColorError};

/// Tolerance used for color equality.
const EPSILON: f64 = 1e-9;

/// Default tolerance of [`Color::is_shade_of_gray`].
const GRAY_EPSILON: f64 = 0.02;

fn unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// An RGBA color with all components in `[0, 1]`.
///
/// Alpha denotes opacity, from `0` (fully transparent) to `1` (opaque).
#[derive(Copy, Clone, Debug)]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

/// Shorthand for [`Color::new`].
pub fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Color {
    Color::new(red, green, blue, alpha)
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::opaque(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::opaque(1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::opaque(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::opaque(0.0, 1.0, 0.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::opaque(0.0, 0.0, 1.0);
    /// Opaque cyan.
    pub const CYAN: Self = Self::opaque(0.0, 1.0, 1.0);
    /// Opaque magenta.
    pub const MAGENTA: Self = Self::opaque(1.0, 0.0, 1.0);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::opaque(1.0, 1.0, 0.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Components must already lie in `[0, 1]`.
    pub(crate) const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color, clamping every component to `[0, 1]`.
    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            r: unit(red),
            g: unit(green),
            b: unit(blue),
            a: unit(alpha),
        }
    }

    /// Create a color from `R, G, B` in `[0, 255]` and alpha in `[0, 1]`.
    pub fn from_rgba8(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self::new(red / 255.0, green / 255.0, blue / 255.0, alpha)
    }

    /// Parse a color specification and apply `alpha`.
    ///
    /// An alpha suffix inside the specification (`"red!30"`) or the alpha
    /// byte of an 8-digit web code overrides the `alpha` argument.
    pub fn from_spec(spec: &str, alpha: f64) -> Result<Self, ParseColorError> {
        let spec = spec.trim();
        if spec.len() > 1 && spec.starts_with('#') {
            return Self::from_hex(spec, alpha);
        }

        let invert = spec.len() > 1 && (spec.starts_with('!') || spec.starts_with('-'));
        let rest = if invert { &spec[1..] } else { spec };

        let named: NamedColor = rest.parse()?;
        let mut color = Self::from(named).with_alpha(alpha);
        if invert {
            color = color.inverse();
        }

        if let Some(pos) = rest.find('!') {
            color = color.with_alpha(parse_alpha_suffix(spec, &rest[pos + 1..])?);
        }
        Ok(color)
    }

    /// Parse a web color code, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(webcode: &str, alpha: f64) -> Result<Self, ParseColorError> {
        let invalid = || ParseColorError::InvalidHexCode(webcode.to_owned());
        let digits = webcode.strip_prefix('#').ok_or_else(invalid)?;
        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }
        let byte = |idx: usize| {
            u8::from_str_radix(&digits[2 * idx..2 * idx + 2], 16)
                .map(f64::from)
                .map_err(|_| invalid())
        };
        let alpha = if digits.len() == 8 {
            byte(3)? / 255.0
        } else {
            alpha
        };
        Ok(Self::from_rgba8(byte(0)?, byte(1)?, byte(2)?, alpha))
    }

    /// Red component.
    pub fn red(&self) -> f64 {
        self.r
    }

    /// Green component.
    pub fn green(&self) -> f64 {
        self.g
    }

    /// Blue component.
    pub fn blue(&self) -> f64 {
        self.b
    }

    /// Alpha (opacity) component.
    pub fn alpha(&self) -> f64 {
        self.a
    }

    /// Returns this color with a different alpha.
    #[must_use]
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: unit(alpha),
            ..self
        }
    }

    /// Returns `true` if all rgb components lie within `epsilon` of each other.
    pub fn is_shade_of_gray(&self, epsilon: f64) -> bool {
        (self.r - self.g).abs() <= epsilon && (self.g - self.b).abs() <= epsilon
    }

    /// Returns the complementary color, `(1 - r, 1 - g, 1 - b)`.
    ///
    /// Inverting a shade of gray yields a barely distinguishable color, so
    /// grays map to white (dark grays) or black (light grays) instead. Alpha
    /// is preserved.
    #[must_use]
    pub fn inverse(&self) -> Self {
        if self.is_shade_of_gray(GRAY_EPSILON) {
            let base = if self.r < 0.5 {
                Self::WHITE
            } else {
                Self::BLACK
            };
            base.with_alpha(self.a)
        } else {
            Self::new(1.0 - self.r, 1.0 - self.g, 1.0 - self.b, self.a)
        }
    }

    /// Returns the luma of this color replicated to all rgb channels.
    #[must_use]
    pub fn grayscale(&self) -> Self {
        let luma = 0.2989 * self.r + 0.5870 * self.g + 0.1141 * self.b;
        Self::new(luma, luma, luma, self.a)
    }

    /// Linear interpolation `(1 - proportion) * self + proportion * other`,
    /// including alpha.
    #[must_use]
    pub fn mix(&self, other: &Self, proportion: f64) -> Self {
        let p = unit(proportion);
        let q = 1.0 - p;
        Self::new(
            q * self.r + p * other.r,
            q * self.g + p * other.g,
            q * self.b + p * other.b,
            q * self.a + p * other.a,
        )
    }

    /// Returns `(R, G, B, alpha)` with `R, G, B` in `[0, 255]`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "components are within [0, 1], so the product fits into u8"
    )]
    pub fn to_rgba8(&self) -> (u8, u8, u8, f64) {
        (
            (self.r * 255.0) as u8,
            (self.g * 255.0) as u8,
            (self.b * 255.0) as u8,
            self.a,
        )
    }

    /// Returns all four components as 8-bit values.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "alpha is within [0, 1], so the product fits into u8"
    )]
    pub fn to_rgba_bytes(&self) -> [u8; 4] {
        let (r, g, b, a) = self.to_rgba8();
        [r, g, b, (a * 255.0) as u8]
    }

    /// Returns the web code `#rrggbbaa`.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba_bytes();
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }

    /// Convert into a `peniko` color for rendering.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "f32 precision is sufficient for rendering"
    )]
    pub fn to_peniko(&self) -> peniko::Color {
        peniko::Color::new([self.r as f32, self.g as f32, self.b as f32, self.a as f32])
    }
}

fn parse_alpha_suffix(spec: &str, suffix: &str) -> Result<f64, ParseColorError> {
    let invalid = || ParseColorError::InvalidAlpha(spec.to_owned());
    if suffix.is_empty() || !suffix.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let percent: u32 = suffix.parse().map_err(|_| invalid())?;
    if percent > 100 {
        return Err(invalid());
    }
    Ok(f64::from(percent) / 100.0)
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<NamedColor> for Color {
    fn from(named: NamedColor) -> Self {
        let [r, g, b] = named.rgb();
        Self::opaque(r, g, b)
    }
}

impl From<Color> for peniko::Color {
    fn from(color: Color) -> Self {
        color.to_peniko()
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_spec(s, 1.0)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        (self.r - other.r).abs() <= EPSILON
            && (self.g - other.g).abs() <= EPSILON
            && (self.b - other.b).abs() <= EPSILON
            && (self.a - other.a).abs() <= EPSILON
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self.to_hex())
    }
}

impl Mul<f64> for Color {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Self::new(self.r * scalar, self.g * scalar, self.b * scalar, self.a)
    }
}

impl Mul<Color> for f64 {
    type Output = Color;

    fn mul(self, color: Color) -> Color {
        color * self
    }
}

impl Div<f64> for Color {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Self::new(self.r / scalar, self.g / scalar, self.b / scalar, self.a)
    }
}

impl Add for Color {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.a)
    }
}

impl Sub for Color {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b, self.a)
    }
}

impl MulAssign<f64> for Color {
    fn mul_assign(&mut self, scalar: f64) {
        *self = *self * scalar;
    }
}

impl DivAssign<f64> for Color {
    fn div_assign(&mut self, scalar: f64) {
        *self = *self / scalar;
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Color {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_are_clamped_independently() {
        let c = Color::new(-0.5, 0.25, 3.0, 1.5);
        assert_eq!(c.red(), 0.0);
        assert_eq!(c.green(), 0.25);
        assert_eq!(c.blue(), 1.0);
        assert_eq!(c.alpha(), 1.0);

        let c = Color::new(f64::NAN, 2.0, -1.0, -3.0);
        assert_eq!(c, Color::new(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn inverted_alpha_spec_matches_explicit_alpha() {
        let lhs: Color = "!blue!30".parse().unwrap();
        let rhs = Color::from_spec("yellow", 0.3).unwrap();
        assert_eq!(lhs, rhs);
        assert_eq!("-red".parse::<Color>().unwrap(), Color::CYAN);
    }

    #[test]
    fn alpha_suffix_overrides_argument() {
        let c = Color::from_spec("forest-green!50", 0.9).unwrap();
        assert_eq!(c.alpha(), 0.5);
        let c = Color::from_spec("Forest Green", 0.9).unwrap();
        assert_eq!(c.alpha(), 0.9);
    }

    #[test]
    fn malformed_specs_are_rejected() {
        assert!(matches!(
            "not-a-color".parse::<Color>(),
            Err(ParseColorError::UnknownName(_))
        ));
        assert!(matches!(
            "red!101".parse::<Color>(),
            Err(ParseColorError::InvalidAlpha(_))
        ));
        assert!(matches!(
            "red!5x".parse::<Color>(),
            Err(ParseColorError::InvalidAlpha(_))
        ));
        assert!(matches!(
            "#12345".parse::<Color>(),
            Err(ParseColorError::InvalidHexCode(_))
        ));
        assert!(matches!(
            "#12345g".parse::<Color>(),
            Err(ParseColorError::InvalidHexCode(_))
        ));
    }

    #[test]
    fn web_codes() {
        let c: Color = "#00FF00".parse().unwrap();
        assert_eq!(c, Color::GREEN);
        let c = Color::from_hex("#ff000080", 1.0).unwrap();
        assert!((c.alpha() - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(Color::new(1.0, 0.5, 0.0, 1.0).to_hex(), "#ff7f00ff");
    }

    #[test]
    fn double_inverse_restores_non_gray_colors() {
        for named in NamedColor::ALL {
            let c = Color::from(named);
            if c.is_shade_of_gray(GRAY_EPSILON) {
                continue;
            }
            assert_eq!(c.inverse().inverse(), c, "double inverse of {named}");
        }
    }

    #[test]
    fn gray_inverts_to_black_or_white() {
        let gray = Color::from(NamedColor::Gray);
        let inv = gray.inverse();
        assert!(inv == Color::BLACK || inv == Color::WHITE);
        assert_eq!(Color::new(0.3, 0.31, 0.3, 0.4).inverse(), Color::WHITE.with_alpha(0.4));
        assert_eq!(Color::new(0.7, 0.7, 0.7, 1.0).inverse(), Color::BLACK);
    }

    #[test]
    fn arithmetic_saturates_and_keeps_alpha() {
        let c = Color::new(0.6, 0.6, 0.6, 0.3);
        let sum = c + c;
        assert_eq!(sum, Color::new(1.0, 1.0, 1.0, 0.3));
        let diff = Color::BLACK.with_alpha(0.2) - c;
        assert_eq!(diff, Color::new(0.0, 0.0, 0.0, 0.2));
        assert_eq!(c * 10.0, Color::new(1.0, 1.0, 1.0, 0.3));
        assert_eq!(0.5 * Color::WHITE, Color::new(0.5, 0.5, 0.5, 1.0));
        let mut d = Color::WHITE;
        d /= 4.0;
        assert_eq!(d, Color::new(0.25, 0.25, 0.25, 1.0));
    }

    #[test]
    fn grayscale_uses_luma_weights() {
        let g = Color::RED.grayscale();
        assert!((g.red() - 0.2989).abs() < 1e-12);
        assert!(g.is_shade_of_gray(0.0));
    }

    #[test]
    fn mix_interpolates_all_channels() {
        let m = Color::BLACK.mix(&Color::WHITE.with_alpha(0.0), 0.25);
        assert_eq!(m, Color::new(0.25, 0.25, 0.25, 0.75));
    }
}
