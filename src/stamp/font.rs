use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use std::path::Path;
use tracing::{debug, info, warn};

/// Largest font size, in pixels, that is ever rasterized
pub const MAX_FONT_SIZE: u32 = 2048;

/// Face used to rasterize the date text
pub enum WatermarkFont {
    TrueType(FontVec),
    /// Bundled 5x7 bitmap face, used when no usable font file is given
    Builtin,
}

impl std::fmt::Debug for WatermarkFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatermarkFont::TrueType(_) => write!(f, "WatermarkFont::TrueType"),
            WatermarkFont::Builtin => write!(f, "WatermarkFont::Builtin"),
        }
    }
}

impl WatermarkFont {
    /// Load `font_path` if given and parseable, otherwise the builtin face
    pub fn load(font_path: Option<&Path>) -> Self {
        let Some(path) = font_path else {
            debug!("No font path configured, using builtin font");
            return WatermarkFont::Builtin;
        };

        let font_data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!(
                    "Font file {} unreadable ({}), using builtin font",
                    path.display(),
                    e
                );
                return WatermarkFont::Builtin;
            }
        };

        match FontVec::try_from_vec(font_data) {
            Ok(font) => {
                info!("Using font {}", path.display());
                WatermarkFont::TrueType(font)
            }
            Err(_) => {
                warn!(
                    "Failed to parse font {}, using builtin font",
                    path.display()
                );
                WatermarkFont::Builtin
            }
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, WatermarkFont::Builtin)
    }

    /// Rasterize `text` into a coverage mask sized to the measured text box.
    ///
    /// Sizes above [`MAX_FONT_SIZE`] are rendered at the cap.
    pub fn rasterize(&self, text: &str, font_size: u32) -> GrayImage {
        let font_size = font_size.clamp(1, MAX_FONT_SIZE);
        match self {
            WatermarkFont::TrueType(font) => rasterize_truetype(font, text, font_size),
            WatermarkFont::Builtin => rasterize_builtin(text, font_size),
        }
    }
}

fn rasterize_truetype(font: &FontVec, text: &str, font_size: u32) -> GrayImage {
    let scale = PxScale::from(font_size as f32);
    let (width, _) = text_size(scale, font, text);
    // Full line height so ascenders and descenders share one baseline
    let height = font.as_scaled(scale).height().ceil().max(0.0) as u32;
    if width == 0 || height == 0 {
        return GrayImage::new(0, 0);
    }

    let mut mask = GrayImage::new(width, height);
    draw_text_mut(&mut mask, Luma([255u8]), 0, 0, scale, font, text);
    mask
}

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;

/// Rows top to bottom, bit 4 is the leftmost column
fn builtin_glyph(c: char) -> [u8; 7] {
    match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '/' => [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ' ' => [0x00; 7],
        _ => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
    }
}

/// Integer pixel size of one builtin glyph cell
pub(crate) fn builtin_pixel_scale(font_size: u32) -> u32 {
    ((font_size as f32 / GLYPH_HEIGHT as f32).round() as u32).max(1)
}

fn rasterize_builtin(text: &str, font_size: u32) -> GrayImage {
    let count = text.chars().count() as u32;
    if count == 0 {
        return GrayImage::new(0, 0);
    }

    let cell = builtin_pixel_scale(font_size);
    let advance = (GLYPH_WIDTH + 1) * cell;
    let size = count
        .checked_mul(advance)
        .map(|w| w - cell)
        .zip(GLYPH_HEIGHT.checked_mul(cell));
    let Some((width, height)) = size else {
        warn!("Text {:?} at size {} is too large to rasterize", text, font_size);
        return GrayImage::new(0, 0);
    };
    let mut mask = GrayImage::new(width, height);

    for (index, c) in text.chars().enumerate() {
        let origin_x = index as u32 * advance;
        for (row, bits) in builtin_glyph(c).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                let rect = Rect::at(
                    (origin_x + col * cell) as i32,
                    (row as u32 * cell) as i32,
                )
                .of_size(cell, cell);
                draw_filled_rect_mut(&mut mask, rect, Luma([255u8]));
            }
        }
    }

    mask
}
