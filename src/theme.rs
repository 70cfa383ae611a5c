//! Colors and the fixed particle palettes.
//!
//! Every particle picks its color from the active [`ColorTheme`] when it is
//! created. Changing the theme regenerates the whole field; particles are never
//! recolored in place.
//!
//! ```ignore
//! use plexus::theme::{ColorTheme, Rgba};
//!
//! let mut rng = rand::thread_rng();
//! let color = ColorTheme::Sunset.sample(&mut rng);
//! assert!(ColorTheme::Sunset.palette().contains(&color));
//! ```

use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 8-bit straight-alpha RGBA color.
///
/// Laid out as four bytes so a slice of colors can be viewed directly as an
/// RGBA pixel buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const TRANSPARENT_WHITE: Rgba = Rgba::new(255, 255, 255, 0);

    /// Create a color from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    /// Same color with the alpha channel scaled by `factor` (0.0-1.0).
    pub fn with_alpha(self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Linear interpolation between two colors, channel by channel.
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Pack as `0x00RRGGBB`, the layout softbuffer presents.
    #[inline]
    pub fn to_xrgb(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Named palettes particles draw their colors from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    /// Deep blue to pale cyan (default).
    #[default]
    Blue,
    /// Saturated to pastel green.
    Green,
    /// Violet through lavender.
    Purple,
    /// Red, orange and amber.
    Sunset,
    /// Three neutral grays.
    Grayscale,
}

impl ColorTheme {
    /// All themes, in the order the viewer cycles through them.
    pub const ALL: [ColorTheme; 5] = [
        ColorTheme::Blue,
        ColorTheme::Green,
        ColorTheme::Purple,
        ColorTheme::Sunset,
        ColorTheme::Grayscale,
    ];

    /// The three colors of this theme.
    pub fn palette(&self) -> [Rgba; 3] {
        match self {
            ColorTheme::Blue => [Rgba::hex(0x0066ff), Rgba::hex(0x00c3ff), Rgba::hex(0x80dfff)],
            ColorTheme::Green => [Rgba::hex(0x00b300), Rgba::hex(0x33ff33), Rgba::hex(0x99ff99)],
            ColorTheme::Purple => [Rgba::hex(0x6600cc), Rgba::hex(0x9933ff), Rgba::hex(0xcc99ff)],
            ColorTheme::Sunset => [Rgba::hex(0xff3300), Rgba::hex(0xff9900), Rgba::hex(0xffcc00)],
            ColorTheme::Grayscale => [Rgba::hex(0x666666), Rgba::hex(0x999999), Rgba::hex(0xcccccc)],
        }
    }

    /// Pick one palette color uniformly at random.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgba {
        let palette = self.palette();
        palette[rng.gen_range(0..palette.len())]
    }

    /// Lowercase name, as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            ColorTheme::Blue => "blue",
            ColorTheme::Green => "green",
            ColorTheme::Purple => "purple",
            ColorTheme::Sunset => "sunset",
            ColorTheme::Grayscale => "grayscale",
        }
    }

    /// The theme after this one, wrapping around.
    pub fn next(&self) -> ColorTheme {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ColorTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorTheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownTheme(s.to_string()))
    }
}
