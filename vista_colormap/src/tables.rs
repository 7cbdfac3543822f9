// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lookup tables, built once on first use.

use std::sync::LazyLock;

use vista_raster::hsv_to_rgb_f64;

use crate::ColorMap;

const ENTRIES: usize = 256;

type Table = [[u8; 3]; ENTRIES];

static TABLES: LazyLock<Vec<Table>> =
    LazyLock::new(|| ColorMap::ALL.into_iter().map(build).collect());

pub(crate) fn table(map: ColorMap) -> &'static [[u8; 3]] {
    &TABLES[map as usize]
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the value is rounded and clamped to the byte range"
)]
fn to_byte(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[allow(
    clippy::cast_precision_loss,
    reason = "table indices are small"
)]
fn position(index: usize) -> f64 {
    index as f64 / (ENTRIES - 1) as f64
}

/// Sample `f` at 256 evenly spaced positions in `[0, 1]`.
fn from_fn(f: impl Fn(f64) -> [f64; 3]) -> Table {
    let mut table = [[0; 3]; ENTRIES];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = f(position(i)).map(to_byte);
    }
    table
}

/// Piecewise linear interpolation between `(position, rgb)` stops.
fn from_stops(stops: &[(f64, [u8; 3])]) -> Table {
    from_fn(|t| {
        let upper = stops
            .iter()
            .position(|(pos, _)| *pos >= t)
            .unwrap_or(stops.len() - 1)
            .max(1);
        let (p0, c0) = stops[upper - 1];
        let (p1, c1) = stops[upper];
        let f = if p1 > p0 {
            ((t - p0) / (p1 - p0)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        [0, 1, 2].map(|ch| {
            ((1.0 - f) * f64::from(c0[ch]) + f * f64::from(c1[ch])) / 255.0
        })
    })
}

/// Google's polynomial approximation of Turbo.
fn turbo(t: f64) -> [f64; 3] {
    let poly = |c: [f64; 6]| {
        c[0] + t * (c[1] + t * (c[2] + t * (c[3] + t * (c[4] + t * c[5]))))
    };
    [
        poly([
            0.135_721_38,
            4.615_392_60,
            -42.660_322_58,
            132.131_082_34,
            -152.942_393_96,
            59.286_379_43,
        ]),
        poly([
            0.091_402_61,
            2.194_188_39,
            4.842_966_58,
            -14.185_033_33,
            4.277_298_57,
            2.829_566_04,
        ]),
        poly([
            0.106_673_30,
            12.641_946_08,
            -60.582_048_36,
            110.362_767_71,
            -89.903_109_12,
            27.348_249_73,
        ]),
    ]
}

/// Categorical colors with hues spaced by the golden angle.
fn glasbey(saturations: [f64; 2], values: [f64; 3]) -> Table {
    const GOLDEN_ANGLE: f64 = 137.507_764;
    let mut table = [[0; 3]; ENTRIES];
    for (i, entry) in table.iter_mut().enumerate() {
        let hue = (position(i) * 255.0 * GOLDEN_ANGLE) % 360.0;
        let (r, g, b) = hsv_to_rgb_f64(hue, saturations[i % 2], values[i % 3]);
        *entry = [r, g, b].map(to_byte);
    }
    table
}

fn build(map: ColorMap) -> Table {
    match map {
        ColorMap::BlackBody => from_stops(&[
            (0.0, [0, 0, 0]),
            (0.39, [178, 34, 34]),
            (0.58, [227, 105, 5]),
            (0.84, [238, 210, 20]),
            (1.0, [255, 255, 255]),
        ]),
        ColorMap::Cold => from_stops(&[
            (0.0, [0, 0, 0]),
            (0.4, [0, 0, 200]),
            (0.75, [0, 200, 255]),
            (1.0, [255, 255, 255]),
        ]),
        ColorMap::ColorBlind => from_stops(&[
            (0.0, [17, 17, 17]),
            (0.35, [43, 84, 168]),
            (0.65, [160, 160, 150]),
            (1.0, [250, 240, 40]),
        ]),
        ColorMap::Disparity => from_stops(&[
            (0.0, [0, 0, 0]),
            (0.114, [0, 0, 255]),
            (0.299, [255, 0, 0]),
            (0.413, [255, 0, 255]),
            (0.587, [0, 255, 0]),
            (0.7, [0, 255, 255]),
            (0.886, [255, 255, 0]),
            (1.0, [255, 255, 255]),
        ]),
        ColorMap::Earth => from_stops(&[
            (0.0, [0, 0, 0]),
            (0.33, [0, 85, 60]),
            (0.66, [130, 175, 90]),
            (1.0, [255, 255, 255]),
        ]),
        ColorMap::GlasbeyDark => glasbey([0.85, 0.7], [0.5, 0.65, 0.8]),
        ColorMap::GlasbeyLight => glasbey([0.35, 0.5], [0.85, 0.95, 1.0]),
        ColorMap::Gouldian => from_stops(&[
            (0.0, [48, 48, 48]),
            (0.25, [45, 80, 165]),
            (0.5, [40, 140, 120]),
            (0.75, [160, 180, 40]),
            (1.0, [253, 235, 40]),
        ]),
        ColorMap::Gray => from_fn(|t| [t, t, t]),
        ColorMap::Hell => from_stops(&[
            (0.0, [20, 10, 30]),
            (0.35, [120, 30, 100]),
            (0.65, [220, 90, 60]),
            (1.0, [250, 230, 160]),
        ]),
        ColorMap::Hot => from_stops(&[
            (0.0, [0, 0, 0]),
            (0.375, [255, 0, 0]),
            (0.75, [255, 255, 0]),
            (1.0, [255, 255, 255]),
        ]),
        ColorMap::Hsv => from_fn(|t| {
            let (r, g, b) = hsv_to_rgb_f64((360.0 * t) % 360.0, 1.0, 1.0);
            [r, g, b]
        }),
        ColorMap::Inferno => from_stops(&[
            (0.0, [0, 0, 4]),
            (0.13, [31, 12, 72]),
            (0.25, [85, 15, 109]),
            (0.38, [136, 34, 106]),
            (0.5, [186, 54, 85]),
            (0.63, [227, 89, 51]),
            (0.75, [249, 140, 10]),
            (0.88, [249, 201, 50]),
            (1.0, [252, 255, 164]),
        ]),
        ColorMap::Ocean => from_stops(&[
            (0.0, [0, 128, 0]),
            (1.0 / 3.0, [0, 0, 85]),
            (2.0 / 3.0, [0, 128, 170]),
            (1.0, [255, 255, 255]),
        ]),
        ColorMap::Orientation => from_stops(&[
            (0.0, [239, 85, 59]),
            (1.0 / 6.0, [235, 195, 30]),
            (2.0 / 6.0, [90, 190, 60]),
            (3.0 / 6.0, [40, 180, 200]),
            (4.0 / 6.0, [70, 90, 220]),
            (5.0 / 6.0, [200, 70, 200]),
            (1.0, [239, 85, 59]),
        ]),
        ColorMap::OrientationColorBlind => from_stops(&[
            (0.0, [40, 110, 225]),
            (0.25, [175, 175, 190]),
            (0.5, [225, 190, 40]),
            (0.75, [175, 175, 190]),
            (1.0, [40, 110, 225]),
        ]),
        ColorMap::Rainbow => from_stops(&[
            (0.0, [0, 0, 143]),
            (0.125, [0, 0, 255]),
            (0.375, [0, 255, 255]),
            (0.625, [255, 255, 0]),
            (0.875, [255, 0, 0]),
            (1.0, [128, 0, 0]),
        ]),
        ColorMap::Relief => from_stops(&[
            (0.0, [30, 80, 40]),
            (0.3, [90, 140, 60]),
            (0.55, [190, 170, 100]),
            (0.8, [160, 110, 70]),
            (1.0, [245, 245, 245]),
        ]),
        ColorMap::ReliefLowContrast => from_stops(&[
            (0.0, [110, 140, 110]),
            (0.5, [170, 160, 130]),
            (1.0, [215, 210, 200]),
        ]),
        ColorMap::Temperature => from_stops(&[
            (0.0, [58, 76, 192]),
            (0.5, [221, 221, 221]),
            (1.0, [180, 4, 38]),
        ]),
        ColorMap::TemperatureDark => from_stops(&[
            (0.0, [40, 140, 240]),
            (0.5, [30, 30, 30]),
            (1.0, [240, 60, 40]),
        ]),
        ColorMap::Terrain => from_stops(&[
            (0.0, [51, 51, 153]),
            (0.15, [0, 153, 255]),
            (0.25, [0, 204, 102]),
            (0.5, [255, 255, 153]),
            (0.75, [128, 92, 84]),
            (1.0, [255, 255, 255]),
        ]),
        ColorMap::Thermal => from_stops(&[
            (0.0, [0, 0, 0]),
            (0.25, [80, 20, 120]),
            (0.5, [200, 40, 60]),
            (0.75, [250, 170, 20]),
            (1.0, [255, 255, 255]),
        ]),
        ColorMap::Turbo => from_fn(turbo),
        ColorMap::Viridis => from_stops(&[
            (0.0, [68, 1, 84]),
            (0.13, [71, 44, 122]),
            (0.25, [59, 81, 139]),
            (0.38, [44, 113, 142]),
            (0.5, [33, 144, 141]),
            (0.63, [39, 173, 129]),
            (0.75, [92, 200, 99]),
            (0.88, [170, 220, 50]),
            (1.0, [253, 231, 37]),
        ]),
        ColorMap::Water => from_stops(&[
            (0.0, [240, 248, 255]),
            (0.5, [100, 160, 210]),
            (1.0, [10, 40, 110]),
        ]),
        ColorMap::Yarg => from_fn(|t| [1.0 - t; 3]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_ramps() {
        let gray = table(ColorMap::Gray);
        assert_eq!(gray[0], [0, 0, 0]);
        assert_eq!(gray[128], [128, 128, 128]);
        assert_eq!(gray[255], [255, 255, 255]);
        let yarg = table(ColorMap::Yarg);
        assert_eq!(yarg[0], [255, 255, 255]);
        assert_eq!(yarg[255], [0, 0, 0]);
    }

    #[test]
    fn stops_are_hit_exactly() {
        let hot = table(ColorMap::Hot);
        assert_eq!(hot[0], [0, 0, 0]);
        assert_eq!(hot[255], [255, 255, 255]);
        let viridis = table(ColorMap::Viridis);
        assert_eq!(viridis[0], [68, 1, 84]);
        assert_eq!(viridis[255], [253, 231, 37]);
    }

    #[test]
    fn cyclic_maps_wrap_around() {
        for map in ColorMap::ALL.into_iter().filter(|m| m.is_cyclic()) {
            let t = table(map);
            for ch in 0..3 {
                let diff = i16::from(t[0][ch]) - i16::from(t[255][ch]);
                assert!(diff.abs() <= 8, "{map}: {:?} vs {:?}", t[0], t[255]);
            }
        }
    }

    #[test]
    fn turbo_goes_from_blue_over_green_to_red() {
        let turbo = table(ColorMap::Turbo);
        let [r, _, b] = turbo[32];
        assert!(b > r, "{:?}", turbo[32]);
        let [r, g, b] = turbo[128];
        assert!(g > r && g > b, "{:?}", turbo[128]);
        let [r, _, b] = turbo[255];
        assert!(r > b, "{:?}", turbo[255]);
    }
}
