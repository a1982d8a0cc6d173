use enum_map::{Enum, EnumMap, enum_map};
use iced_core::Color;
use palette::{
    Mix,
    rgb::{Rgb, Rgba},
};
use serde::{Deserialize, Serialize};

/// Where a color sits on the cheap-to-expensive price ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
pub enum Tone {
    Low,
    Middle,
    High,
    /// Lines whose radius never changes
    Neutral,
}

pub type LinePalette = EnumMap<Tone, Color>;

pub const LOW_HEX: &str = "#2274A5";
pub const MIDDLE_HEX: &str = "#E3D8F1";
pub const HIGH_HEX: &str = "#EF6461";
pub const NEUTRAL_HEX: &str = "#E3D8F1";

pub fn default_line_palette() -> LinePalette {
    enum_map! {
        Tone::Low => Color::from_rgb8(0x22, 0x74, 0xA5),
        Tone::Middle => Color::from_rgb8(0xE3, 0xD8, 0xF1),
        Tone::High => Color::from_rgb8(0xEF, 0x64, 0x61),
        Tone::Neutral => Color::from_rgb8(0xE3, 0xD8, 0xF1),
    }
}

/// Hex form of the line palette as it appears in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteSpec {
    pub low: String,
    pub middle: String,
    pub high: String,
    pub neutral: String,
}

impl Default for PaletteSpec {
    fn default() -> Self {
        Self {
            low: LOW_HEX.to_string(),
            middle: MIDDLE_HEX.to_string(),
            high: HIGH_HEX.to_string(),
            neutral: NEUTRAL_HEX.to_string(),
        }
    }
}

impl PaletteSpec {
    pub fn resolve(&self) -> LinePalette {
        let mut palette = default_line_palette();

        for (tone, hex) in [
            (Tone::Low, &self.low),
            (Tone::Middle, &self.middle),
            (Tone::High, &self.high),
            (Tone::Neutral, &self.neutral),
        ] {
            match hex_to_color(hex) {
                Some(color) => palette[tone] = color,
                None => log::warn!(
                    "Invalid {tone:?} color {hex:?}, keeping {}",
                    color_to_hex(palette[tone])
                ),
            }
        }

        palette
    }
}

impl From<&LinePalette> for PaletteSpec {
    fn from(palette: &LinePalette) -> Self {
        Self {
            low: color_to_hex(palette[Tone::Low]),
            middle: color_to_hex(palette[Tone::Middle]),
            high: color_to_hex(palette[Tone::High]),
            neutral: color_to_hex(palette[Tone::Neutral]),
        }
    }
}

/// Linear interpolation in gamma-encoded sRGB, the space canvas gradients blend in.
pub fn mix(from: Color, to: Color, factor: f32) -> Color {
    to_color(to_rgba(from).mix(to_rgba(to), factor.clamp(0.0, 1.0)))
}

pub fn hex_to_color(hex: &str) -> Option<Color> {
    if hex.len() == 7 || hex.len() == 9 {
        let hash = hex.get(0..1)?;
        let r = u8::from_str_radix(hex.get(1..3)?, 16);
        let g = u8::from_str_radix(hex.get(3..5)?, 16);
        let b = u8::from_str_radix(hex.get(5..7)?, 16);
        let a = (hex.len() == 9)
            .then(|| hex.get(7..9).and_then(|a| u8::from_str_radix(a, 16).ok()))
            .flatten();

        return match (hash, r, g, b, a) {
            ("#", Ok(r), Ok(g), Ok(b), None) => Some(Color {
                r: f32::from(r) / 255.0,
                g: f32::from(g) / 255.0,
                b: f32::from(b) / 255.0,
                a: 1.0,
            }),
            ("#", Ok(r), Ok(g), Ok(b), Some(a)) => Some(Color {
                r: f32::from(r) / 255.0,
                g: f32::from(g) / 255.0,
                b: f32::from(b) / 255.0,
                a: f32::from(a) / 255.0,
            }),
            _ => None,
        };
    }

    None
}

pub fn color_to_hex(color: Color) -> String {
    use std::fmt::Write;

    let mut hex = String::with_capacity(9);

    let [r, g, b, a] = color.into_rgba8();

    let _ = write!(&mut hex, "#");
    let _ = write!(&mut hex, "{r:02X}");
    let _ = write!(&mut hex, "{g:02X}");
    let _ = write!(&mut hex, "{b:02X}");

    if a < u8::MAX {
        let _ = write!(&mut hex, "{a:02X}");
    }

    hex
}

fn to_color(rgba: Rgba) -> Color {
    Color {
        r: rgba.color.red,
        g: rgba.color.green,
        b: rgba.color.blue,
        a: rgba.alpha,
    }
}

fn to_rgb(color: Color) -> Rgb {
    Rgb {
        red: color.r,
        green: color.g,
        blue: color.b,
        ..Rgb::default()
    }
}

fn to_rgba(color: Color) -> Rgba {
    Rgba {
        alpha: color.a,
        color: to_rgb(color),
    }
}
