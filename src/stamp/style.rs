use super::StampError;
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Anchor point for the watermark text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopRight,
    Center,
    BottomLeft,
    #[default]
    BottomRight,
}

/// How the date is drawn. Built once per run and shared by every image.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkStyle {
    /// Font size in pixels
    pub font_size: u32,
    pub color: Rgb<u8>,
    /// Alpha applied to every text pixel, 0 (invisible) to 255 (solid)
    pub opacity: u8,
    pub position: Position,
    /// Inset from the anchored image edges in pixels
    pub margin: u32,
    /// Draw a black copy offset by [`SHADOW_OFFSET`] under the text
    pub shadow: bool,
    pub font_path: Option<PathBuf>,
}

pub const SHADOW_OFFSET: i64 = 2;

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            font_size: 32,
            color: Rgb([255, 255, 255]),
            opacity: 220,
            position: Position::BottomRight,
            margin: 16,
            shadow: true,
            font_path: None,
        }
    }
}

const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("silver", [192, 192, 192]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("navy", [0, 0, 128]),
    ("purple", [128, 0, 128]),
    ("teal", [0, 128, 128]),
    ("orange", [255, 165, 0]),
    ("gold", [255, 215, 0]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
];

/// Parse `#RGB`, `#RRGGBB` (the `#` is optional) or a basic CSS color name
pub fn parse_color(input: &str) -> Result<Rgb<u8>, StampError> {
    let value = input.trim();
    let lower = value.to_ascii_lowercase();

    if let Some((_, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Ok(Rgb(*rgb));
    }

    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StampError::InvalidColor(input.to_string()));
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let parsed = match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let digit = c.to_digit(16).map(|d| d as u8);
                rgb[i] = digit.map(|d| d * 17).unwrap_or_default();
            }
            Some(rgb)
        }
        6 => match (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6])) {
            (Some(r), Some(g), Some(b)) => Some([r, g, b]),
            _ => None,
        },
        _ => None,
    };

    parsed
        .map(Rgb)
        .ok_or_else(|| StampError::InvalidColor(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_default() {
        let style = WatermarkStyle::default();
        assert_eq!(style.font_size, 32);
        assert_eq!(style.color, Rgb([255, 255, 255]));
        assert_eq!(style.opacity, 220);
        assert_eq!(style.position, Position::BottomRight);
        assert_eq!(style.margin, 16);
        assert!(style.shadow);
        assert!(style.font_path.is_none());
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color("#FFFFFF").unwrap(), Rgb([255, 255, 255]));
        assert_eq!(parse_color("#ff8000").unwrap(), Rgb([255, 128, 0]));
        assert_eq!(parse_color("00ff00").unwrap(), Rgb([0, 255, 0]));
        assert_eq!(parse_color("#f80").unwrap(), Rgb([255, 136, 0]));
    }

    #[test]
    fn test_parse_named_colors() {
        assert_eq!(parse_color("black").unwrap(), Rgb([0, 0, 0]));
        assert_eq!(parse_color("Orange").unwrap(), Rgb([255, 165, 0]));
        assert_eq!(parse_color(" grey ").unwrap(), Rgb([128, 128, 128]));
    }

    #[test]
    fn test_parse_invalid_colors() {
        assert!(matches!(
            parse_color("#12345"),
            Err(StampError::InvalidColor(_))
        ));
        assert!(parse_color("#gggggg").is_err());
        assert!(parse_color("not-a-color").is_err());
        assert!(parse_color("").is_err());
    }

    #[test]
    fn test_position_deserializes_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            position: Position,
        }
        let parsed: Wrapper = toml_edit::de::from_str("position = \"top-left\"").unwrap();
        assert_eq!(parsed.position, Position::TopLeft);
    }
}
