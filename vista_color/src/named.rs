// Copyright 2025 the Vista Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

use crate::ParseColorError;

/// Premixed colors which can be referred to by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[expect(missing_docs, reason = "the variant names are self-descriptive")]
pub enum NamedColor {
    Black,
    White,
    Gray,
    Red,
    Green,
    Blue,
    Azure,
    Bronze,
    Brown,
    Carrot,
    Copper,
    Crimson,
    Cyan,
    ForestGreen,
    Freesia,
    Gold,
    Indigo,
    Ivory,
    Lavender,
    LightBlue,
    LimeGreen,
    Maroon,
    Magenta,
    MidnightBlue,
    NavyBlue,
    Olive,
    Orange,
    Orchid,
    Purple,
    RoseRed,
    Salmon,
    Silver,
    Spearmint,
    Tangerine,
    Taupe,
    TealGreen,
    Turquoise,
    Yellow,
}

impl NamedColor {
    /// Every named color, in declaration order.
    pub const ALL: [Self; 38] = [
        Self::Black,
        Self::White,
        Self::Gray,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Azure,
        Self::Bronze,
        Self::Brown,
        Self::Carrot,
        Self::Copper,
        Self::Crimson,
        Self::Cyan,
        Self::ForestGreen,
        Self::Freesia,
        Self::Gold,
        Self::Indigo,
        Self::Ivory,
        Self::Lavender,
        Self::LightBlue,
        Self::LimeGreen,
        Self::Maroon,
        Self::Magenta,
        Self::MidnightBlue,
        Self::NavyBlue,
        Self::Olive,
        Self::Orange,
        Self::Orchid,
        Self::Purple,
        Self::RoseRed,
        Self::Salmon,
        Self::Silver,
        Self::Spearmint,
        Self::Tangerine,
        Self::Taupe,
        Self::TealGreen,
        Self::Turquoise,
        Self::Yellow,
    ];

    /// Red, green and blue in `[0, 1]`.
    pub const fn rgb(self) -> [f64; 3] {
        match self {
            Self::Black => [0.0, 0.0, 0.0],
            Self::White => [1.0, 1.0, 1.0],
            Self::Gray => [0.5, 0.5, 0.5],
            Self::Red => [1.0, 0.0, 0.0],
            Self::Green => [0.0, 1.0, 0.0],
            Self::Blue => [0.0, 0.0, 1.0],
            Self::Azure => [0.0, 0.5, 1.0],
            Self::Bronze => [0.8, 0.5, 0.2],
            Self::Brown => [0.53, 0.33, 0.04],
            Self::Carrot => [0.93, 0.57, 0.13],
            Self::Copper => [0.72, 0.45, 0.2],
            Self::Crimson => [0.6, 0.0, 0.0],
            Self::Cyan => [0.0, 1.0, 1.0],
            Self::ForestGreen => [0.13, 0.55, 0.13],
            Self::Freesia => [0.97, 0.77, 0.14],
            Self::Gold => [1.0, 0.84, 0.0],
            Self::Indigo => [0.3, 0.0, 0.51],
            Self::Ivory => [1.0, 1.0, 0.94],
            Self::Lavender => [0.9, 0.9, 0.98],
            Self::LightBlue => [0.68, 0.85, 0.9],
            Self::LimeGreen => [0.2, 0.8, 0.2],
            Self::Maroon => [0.5, 0.0, 0.0],
            Self::Magenta => [1.0, 0.0, 1.0],
            Self::MidnightBlue => [0.1, 0.1, 0.44],
            Self::NavyBlue => [0.0, 0.0, 0.5],
            Self::Olive => [0.5, 0.5, 0.0],
            Self::Orange => [1.0, 0.65, 0.0],
            Self::Orchid => [0.86, 0.44, 0.84],
            Self::Purple => [0.63, 0.13, 0.94],
            Self::RoseRed => [1.0, 0.01, 0.24],
            Self::Salmon => [0.98, 0.5, 0.45],
            Self::Silver => [0.75, 0.75, 0.75],
            Self::Spearmint => [0.27, 0.69, 0.55],
            Self::Tangerine => [0.95, 0.52, 0.0],
            Self::Taupe => [0.28, 0.24, 0.2],
            Self::TealGreen => [0.0, 0.43, 0.36],
            Self::Turquoise => [0.19, 0.84, 0.78],
            Self::Yellow => [1.0, 1.0, 0.0],
        }
    }

    /// Kebab-case display name, e.g. `"forest-green"`.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
            Self::Gray => "gray",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Azure => "azure",
            Self::Bronze => "bronze",
            Self::Brown => "brown",
            Self::Carrot => "carrot",
            Self::Copper => "copper",
            Self::Crimson => "crimson",
            Self::Cyan => "cyan",
            Self::ForestGreen => "forest-green",
            Self::Freesia => "freesia",
            Self::Gold => "gold",
            Self::Indigo => "indigo",
            Self::Ivory => "ivory",
            Self::Lavender => "lavender",
            Self::LightBlue => "light-blue",
            Self::LimeGreen => "lime-green",
            Self::Maroon => "maroon",
            Self::Magenta => "magenta",
            Self::MidnightBlue => "midnight-blue",
            Self::NavyBlue => "navy-blue",
            Self::Olive => "olive",
            Self::Orange => "orange",
            Self::Orchid => "orchid",
            Self::Purple => "purple",
            Self::RoseRed => "rose-red",
            Self::Salmon => "salmon",
            Self::Silver => "silver",
            Self::Spearmint => "spearmint",
            Self::Tangerine => "tangerine",
            Self::Taupe => "taupe",
            Self::TealGreen => "teal-green",
            Self::Turquoise => "turquoise",
            Self::Yellow => "yellow",
        }
    }

    /// Names of all colors, in declaration order.
    pub fn list() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.name()).collect()
    }
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase and drop separators, so `"Forest Green"`, `"forest_green"` and
/// `"forest-green"` compare equal. Anything from the first `!` on is ignored.
fn canonical(s: &str) -> String {
    let head = s.split('!').next().unwrap_or_default();
    head.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for NamedColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = canonical(s);
        if key == "grey" {
            return Ok(Self::Gray);
        }
        Self::ALL
            .into_iter()
            .find(|c| canonical(c.name()) == key)
            .ok_or_else(|| ParseColorError::UnknownName(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_agree() {
        for c in NamedColor::ALL {
            assert_eq!(c.to_string().parse::<NamedColor>(), Ok(c));
        }
    }

    #[test]
    fn parsing_is_lenient_about_separators() {
        assert_eq!("Midnight Blue".parse(), Ok(NamedColor::MidnightBlue));
        assert_eq!("teal_green".parse(), Ok(NamedColor::TealGreen));
        assert_eq!("NAVYBLUE!30".parse(), Ok(NamedColor::NavyBlue));
        assert_eq!("grey".parse(), Ok(NamedColor::Gray));
        assert!("".parse::<NamedColor>().is_err());
        assert!("bluish".parse::<NamedColor>().is_err());
    }

    #[test]
    fn list_is_complete() {
        let names = NamedColor::list();
        assert_eq!(names.len(), NamedColor::ALL.len());
        assert_eq!(names.first(), Some(&"black"));
        assert_eq!(names.last(), Some(&"yellow"));
    }
}
