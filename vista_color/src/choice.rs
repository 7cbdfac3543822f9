// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

use crate::{Color, NamedColor, ParseColorError};

/// A color slot of a drawing style.
///
/// Fill and background colors are often either absent or derived from the
/// outline color of the same style. [`ColorChoice::resolve`] turns the choice
/// into a concrete color given that sibling color.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum ColorChoice {
    /// Don't draw this element.
    #[default]
    None,
    /// Use the sibling color, replacing its alpha.
    Same {
        /// Opacity of the derived color.
        alpha: f64,
    },
    /// A fixed color.
    Solid(Color),
}

impl ColorChoice {
    /// "Same color as the sibling" with the given opacity.
    pub fn same(alpha: f64) -> Self {
        Self::Same {
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Returns the color to draw with, or `None` if nothing should be drawn.
    pub fn resolve(&self, sibling: Color) -> Option<Color> {
        match *self {
            Self::None => None,
            Self::Same { alpha } => Some(sibling.with_alpha(alpha)),
            Self::Solid(color) => Some(color),
        }
    }

    /// Returns `true` unless this is [`ColorChoice::None`].
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<Color> for ColorChoice {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

impl From<NamedColor> for ColorChoice {
    fn from(named: NamedColor) -> Self {
        Self::Solid(named.into())
    }
}

impl From<Option<Color>> for ColorChoice {
    fn from(color: Option<Color>) -> Self {
        color.map_or(Self::None, Self::Solid)
    }
}

impl FromStr for ColorChoice {
    type Err = ParseColorError;

    /// Accepts `"none"`, `"same"`, `"same!NN"` or any [`Color`] specification.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower == "none" || lower == "invalid" {
            return Ok(Self::None);
        }
        if let Some(rest) = lower.strip_prefix("same") {
            if rest.is_empty() {
                return Ok(Self::Same { alpha: 1.0 });
            }
            if let Some(pct) = rest.strip_prefix('!') {
                let invalid = || ParseColorError::InvalidAlpha(trimmed.to_owned());
                if pct.is_empty() || !pct.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let pct: u32 = pct.parse().map_err(|_| invalid())?;
                if pct > 100 {
                    return Err(invalid());
                }
                return Ok(Self::Same {
                    alpha: f64::from(pct) / 100.0,
                });
            }
        }
        trimmed.parse().map(Self::Solid)
    }
}

impl fmt::Display for ColorChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Same { alpha } => write!(f, "same(alpha={alpha:.2})"),
            Self::Solid(color) => write!(f, "{color}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_against_sibling() {
        let line = Color::from(NamedColor::Crimson);
        assert_eq!(ColorChoice::None.resolve(line), None);
        assert_eq!(ColorChoice::same(0.3).resolve(line), Some(line.with_alpha(0.3)));
        assert_eq!(
            ColorChoice::from(Color::WHITE).resolve(line),
            Some(Color::WHITE)
        );
    }

    #[test]
    fn parse_choices() {
        assert_eq!("none".parse(), Ok(ColorChoice::None));
        assert_eq!("Same".parse(), Ok(ColorChoice::Same { alpha: 1.0 }));
        assert_eq!("same!25".parse(), Ok(ColorChoice::Same { alpha: 0.25 }));
        assert!("same!250".parse::<ColorChoice>().is_err());
        assert_eq!(
            "white!60".parse(),
            Ok(ColorChoice::Solid(Color::WHITE.with_alpha(0.6)))
        );
    }
}
