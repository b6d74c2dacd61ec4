//! Named sequential color palettes.
//!
//! Color stops match the plotly.js sequential swatches of the same name.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

const DEEP: &[&str] = &[
    "rgb(253, 253, 204)",
    "rgb(206, 236, 179)",
    "rgb(156, 219, 165)",
    "rgb(111, 201, 163)",
    "rgb(86, 177, 163)",
    "rgb(76, 153, 160)",
    "rgb(68, 130, 155)",
    "rgb(62, 108, 150)",
    "rgb(62, 82, 143)",
    "rgb(64, 60, 115)",
    "rgb(54, 43, 77)",
    "rgb(39, 26, 44)",
];

const SPEED: &[&str] = &[
    "rgb(254, 252, 205)",
    "rgb(239, 225, 156)",
    "rgb(221, 201, 106)",
    "rgb(194, 182, 59)",
    "rgb(157, 167, 21)",
    "rgb(116, 153, 5)",
    "rgb(75, 138, 20)",
    "rgb(35, 121, 36)",
    "rgb(11, 100, 44)",
    "rgb(18, 78, 43)",
    "rgb(25, 56, 34)",
    "rgb(23, 35, 18)",
];

const BLUYL: &[&str] = &[
    "rgb(247, 254, 174)",
    "rgb(183, 230, 165)",
    "rgb(124, 203, 162)",
    "rgb(70, 174, 160)",
    "rgb(8, 144, 153)",
    "rgb(0, 113, 139)",
    "rgb(4, 82, 117)",
];

const AGSUNSET: &[&str] = &[
    "rgb(75, 41, 145)",
    "rgb(135, 44, 162)",
    "rgb(192, 54, 157)",
    "rgb(234, 79, 136)",
    "rgb(250, 120, 118)",
    "rgb(246, 169, 122)",
    "rgb(237, 217, 163)",
];

const OR_RD: &[&str] = &[
    "rgb(255,247,236)",
    "rgb(254,232,200)",
    "rgb(253,212,158)",
    "rgb(253,187,132)",
    "rgb(252,141,89)",
    "rgb(239,101,72)",
    "rgb(215,48,31)",
    "rgb(179,0,0)",
    "rgb(127,0,0)",
];

const JET: &[&str] = &[
    "rgb(0,0,131)",
    "rgb(0,60,170)",
    "rgb(5,255,255)",
    "rgb(255,255,0)",
    "rgb(250,0,0)",
    "rgb(128,0,0)",
];

const HOT: &[&str] = &[
    "rgb(0,0,0)",
    "rgb(230,0,0)",
    "rgb(255,210,0)",
    "rgb(255,255,255)",
];

/// A named sequential palette.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Palette {
    /// cmocean `deep`
    Deep,
    /// cmocean `speed`
    Speed,
    /// CARTO `Bluyl`
    Bluyl,
    /// CARTO `Agsunset`
    Agsunset,
    /// ColorBrewer `OrRd`
    OrRd,
    /// Matlab-style `Jet`
    Jet,
    /// Matlab-style `Hot`
    Hot,
}

impl Palette {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Deep,
            Self::Speed,
            Self::Bluyl,
            Self::Agsunset,
            Self::OrRd,
            Self::Jet,
            Self::Hot,
        ]
    }

    /// Color stops from low to high.
    #[must_use]
    pub const fn colors(self) -> &'static [&'static str] {
        match self {
            Self::Deep => DEEP,
            Self::Speed => SPEED,
            Self::Bluyl => BLUYL,
            Self::Agsunset => AGSUNSET,
            Self::OrRd => OR_RD,
            Self::Jet => JET,
            Self::Hot => HOT,
        }
    }
}

/// A palette, optionally traversed high to low (the `_r` suffix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorScale {
    /// Base palette.
    pub palette: Palette,
    /// Whether the stops run high to low.
    pub reversed: bool,
}

impl ColorScale {
    /// The palette in its natural order.
    #[must_use]
    pub const fn new(palette: Palette) -> Self {
        Self {
            palette,
            reversed: false,
        }
    }

    /// The palette traversed high to low.
    #[must_use]
    pub const fn reversed(palette: Palette) -> Self {
        Self {
            palette,
            reversed: true,
        }
    }

    /// Color stops in traversal order.
    #[must_use]
    pub fn colors(self) -> Vec<&'static str> {
        let colors = self.palette.colors().iter().copied();
        if self.reversed {
            colors.rev().collect()
        } else {
            colors.collect()
        }
    }

    /// Color assigned to the `index`-th discrete group, cycling through the
    /// stops.
    #[must_use]
    pub fn discrete(self, index: usize) -> &'static str {
        let colors = self.palette.colors();
        let i = index % colors.len();
        if self.reversed {
            colors[colors.len() - 1 - i]
        } else {
            colors[i]
        }
    }

    /// Evenly spaced `[position, color]` stops for a continuous scale.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stops(self) -> Vec<(f64, &'static str)> {
        let colors = self.colors();
        let last = colors.len().saturating_sub(1).max(1) as f64;
        colors
            .into_iter()
            .enumerate()
            .map(|(i, color)| (i as f64 / last, color))
            .collect()
    }
}

impl std::fmt::Display for ColorScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.reversed {
            write!(f, "{}_r", self.palette)
        } else {
            write!(f, "{}", self.palette)
        }
    }
}
