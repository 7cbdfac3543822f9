// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

use vista_color::Color;

use crate::{Error, tables};

/// Available color maps.
///
/// Every map is a lookup table of 256 RGB entries. Cyclic maps
/// ([`Orientation`](Self::Orientation), [`Hsv`](Self::Hsv)) suit angular
/// data such as optical flow; the Glasbey maps are categorical.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorMap {
    /// Black-red-yellow-white.
    BlackBody,
    /// Black-blue-cyan-white.
    Cold,
    /// Blue-gray-yellow, distinguishable with red-green color blindness.
    ColorBlind,
    /// High contrast map for depth and disparity images.
    Disparity,
    /// Black-green-white, linear in grayscale.
    Earth,
    /// Categorical map of dark, well separated colors.
    GlasbeyDark,
    /// Categorical map of light, well separated colors.
    GlasbeyLight,
    /// Gray-blue-green-yellow, perceptually uniform.
    Gouldian,
    /// Black to white.
    Gray,
    /// Dark purple to bright yellow.
    Hell,
    /// Black-red-yellow-white with the breakpoints of MATLAB's `hot`.
    Hot,
    /// Cyclic hue sweep at full saturation.
    Hsv,
    /// Perceptually uniform, black-purple-orange-yellow.
    Inferno,
    /// Green-blue-white.
    Ocean,
    /// Cyclic six-color map for orientations.
    Orientation,
    /// Cyclic blue-yellow map for orientations.
    OrientationColorBlind,
    /// Rainbow from dark blue to dark red.
    Rainbow,
    /// Elevation map from green lowlands to white peaks.
    Relief,
    /// [`Relief`](Self::Relief) with reduced contrast, for shading.
    ReliefLowContrast,
    /// Diverging blue-white-red.
    Temperature,
    /// Diverging blue-black-red.
    TemperatureDark,
    /// Blue-green-yellow-brown-white, like matplotlib's `terrain`.
    Terrain,
    /// Black-purple-red-yellow-white.
    Thermal,
    /// Improved rainbow map with smooth lightness.
    Turbo,
    /// Perceptually uniform, purple-teal-yellow.
    Viridis,
    /// Light to dark blue.
    Water,
    /// White to black, the reverse of [`Gray`](Self::Gray).
    Yarg,
}

impl ColorMap {
    /// Every color map, in declaration order.
    pub const ALL: [Self; 27] = [
        Self::BlackBody,
        Self::Cold,
        Self::ColorBlind,
        Self::Disparity,
        Self::Earth,
        Self::GlasbeyDark,
        Self::GlasbeyLight,
        Self::Gouldian,
        Self::Gray,
        Self::Hell,
        Self::Hot,
        Self::Hsv,
        Self::Inferno,
        Self::Ocean,
        Self::Orientation,
        Self::OrientationColorBlind,
        Self::Rainbow,
        Self::Relief,
        Self::ReliefLowContrast,
        Self::Temperature,
        Self::TemperatureDark,
        Self::Terrain,
        Self::Thermal,
        Self::Turbo,
        Self::Viridis,
        Self::Water,
        Self::Yarg,
    ];

    /// Kebab-case name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::BlackBody => "black-body",
            Self::Cold => "cold",
            Self::ColorBlind => "color-blind",
            Self::Disparity => "disparity",
            Self::Earth => "earth",
            Self::GlasbeyDark => "glasbey-dark",
            Self::GlasbeyLight => "glasbey-light",
            Self::Gouldian => "gouldian",
            Self::Gray => "gray",
            Self::Hell => "hell",
            Self::Hot => "hot",
            Self::Hsv => "hsv",
            Self::Inferno => "inferno",
            Self::Ocean => "ocean",
            Self::Orientation => "orientation",
            Self::OrientationColorBlind => "orientation-color-blind",
            Self::Rainbow => "rainbow",
            Self::Relief => "relief",
            Self::ReliefLowContrast => "relief-low-contrast",
            Self::Temperature => "temperature",
            Self::TemperatureDark => "temperature-dark",
            Self::Terrain => "terrain",
            Self::Thermal => "thermal",
            Self::Turbo => "turbo",
            Self::Viridis => "viridis",
            Self::Water => "water",
            Self::Yarg => "yarg",
        }
    }

    /// The lookup table of this map.
    pub fn table(self) -> &'static [[u8; 3]] {
        tables::table(self)
    }

    /// Whether the first and last entries meet, so the map can encode angles.
    pub const fn is_cyclic(self) -> bool {
        matches!(
            self,
            Self::Hsv | Self::Orientation | Self::OrientationColorBlind
        )
    }

    /// Color for a category or object id, cycling through the table.
    pub fn category_color(self, id: usize) -> Color {
        let table = self.table();
        let [r, g, b] = table[id % table.len()];
        Color::from_rgba8(f64::from(r), f64::from(g), f64::from(b), 1.0)
    }
}

/// Color for a category or object id, cycling through the table of `colormap`.
pub fn category_color(id: usize, colormap: ColorMap) -> Color {
    colormap.category_color(id)
}

impl fmt::Display for ColorMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        let aliased = match canonical.as_str() {
            "grey" => Some(Self::Gray),
            "reliefisoluminant" => Some(Self::ReliefLowContrast),
            "yerg" | "!gray" | "!grey" => Some(Self::Yarg),
            _ => None,
        };
        aliased
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|m| m.name().replace('-', "") == canonical)
            })
            .ok_or_else(|| Error::UnknownColorMap(s.to_owned()))
    }
}
