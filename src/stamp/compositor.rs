use super::font::WatermarkFont;
use super::style::{Position, SHADOW_OFFSET, WatermarkStyle};
use image::{DynamicImage, GenericImage, GenericImageView, GrayImage, Pixel, Rgba, RgbaImage};
use imageproc::rect::Rect;
use tracing::debug;

/// Top-left corner of the text box for an anchor position.
///
/// Corners are inset by `margin`; the result is clamped so the box starts
/// inside the image even when the image is smaller than text plus margin.
pub fn compute_text_position(
    image_size: (u32, u32),
    text_size: (u32, u32),
    position: Position,
    margin: u32,
) -> (u32, u32) {
    let (img_w, img_h) = (image_size.0 as i64, image_size.1 as i64);
    let (text_w, text_h) = (text_size.0 as i64, text_size.1 as i64);
    let margin = margin as i64;

    let (x, y) = match position {
        Position::TopLeft => (margin, margin),
        Position::TopRight => (img_w - text_w - margin, margin),
        Position::Center => ((img_w - text_w) / 2, (img_h - text_h) / 2),
        Position::BottomLeft => (margin, img_h - text_h - margin),
        Position::BottomRight => (img_w - text_w - margin, img_h - text_h - margin),
    };

    let max_x = (img_w - text_w).max(0);
    let max_y = (img_h - text_h).max(0);
    (x.clamp(0, max_x) as u32, y.clamp(0, max_y) as u32)
}

/// Placed text bounding box on an image
pub fn text_rect(image_size: (u32, u32), mask: &GrayImage, style: &WatermarkStyle) -> Option<Rect> {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return None;
    }
    let (x, y) = compute_text_position(image_size, (width, height), style.position, style.margin);
    Some(Rect::at(x as i32, y as i32).of_size(width, height))
}

/// Draw the text (and its shadow) onto a transparent layer the size of the image
pub fn render_overlay(image_size: (u32, u32), mask: &GrayImage, style: &WatermarkStyle) -> RgbaImage {
    let mut overlay = RgbaImage::new(image_size.0, image_size.1);
    let Some(rect) = text_rect(image_size, mask, style) else {
        return overlay;
    };

    if style.shadow {
        paint_mask(
            &mut overlay,
            mask,
            rect.left() as i64 + SHADOW_OFFSET,
            rect.top() as i64 + SHADOW_OFFSET,
            Rgba([0, 0, 0, style.opacity]),
        );
    }

    let [r, g, b] = style.color.0;
    paint_mask(
        &mut overlay,
        mask,
        rect.left() as i64,
        rect.top() as i64,
        Rgba([r, g, b, style.opacity]),
    );

    overlay
}

/// Paint `color` through the coverage mask at (`x`, `y`), clipping to the layer.
///
/// Each pixel's alpha is the color's alpha scaled by its coverage.
fn paint_mask(layer: &mut RgbaImage, mask: &GrayImage, x: i64, y: i64, color: Rgba<u8>) {
    let (layer_w, layer_h) = (layer.width() as i64, layer.height() as i64);
    for (mx, my, coverage) in mask.enumerate_pixels() {
        let coverage = coverage[0];
        if coverage == 0 {
            continue;
        }
        let (px, py) = (x + mx as i64, y + my as i64);
        if px < 0 || py < 0 || px >= layer_w || py >= layer_h {
            continue;
        }
        let alpha = (color[3] as u32 * coverage as u32 + 127) / 255;
        let src = Rgba([color[0], color[1], color[2], alpha as u8]);
        blend_onto(layer.get_pixel_mut(px as u32, py as u32), src);
    }
}

/// "Over" blend of `top` onto `base`.
///
/// Solid tops and transparent bases take `top` verbatim and an opaque base
/// stays opaque, so the float round trip in [`Pixel::blend`] never shifts them.
pub fn blend_onto(base: &mut Rgba<u8>, top: Rgba<u8>) {
    match (top[3], base[3]) {
        (0, _) => {}
        (u8::MAX, _) | (_, 0) => *base = top,
        (_, base_alpha) => {
            base.blend(&top);
            if base_alpha == u8::MAX {
                base[3] = u8::MAX;
            }
        }
    }
}

/// Blend an overlay the size of `image` onto a copy of it.
///
/// Pixels where the overlay is transparent are left untouched, which keeps
/// the color type and their exact values.
pub fn composite_overlay(image: &DynamicImage, overlay: &RgbaImage) -> DynamicImage {
    let mut output = image.clone();
    for (x, y, top) in overlay.enumerate_pixels() {
        if top[3] == 0 || x >= output.width() || y >= output.height() {
            continue;
        }
        let mut pixel = output.get_pixel(x, y);
        blend_onto(&mut pixel, *top);
        output.put_pixel(x, y, pixel);
    }
    output
}

/// Draw `text` onto a copy of `image`.
///
/// The result has the dimensions and color type of `image`. The font size
/// is capped at the image height, since taller text would be clipped anyway.
pub fn composite(
    image: &DynamicImage,
    text: &str,
    style: &WatermarkStyle,
    font: &WatermarkFont,
) -> DynamicImage {
    if style.opacity == 0 || text.is_empty() {
        return image.clone();
    }

    let image_size = image.dimensions();
    let font_size = style.font_size.min(image_size.1.max(1));
    let mask = font.rasterize(text, font_size);
    let overlay = render_overlay(image_size, &mask, style);
    debug!(
        "Compositing {:?} ({}x{}) onto {}x{} image",
        text,
        mask.width(),
        mask.height(),
        image_size.0,
        image_size.1
    );

    composite_overlay(image, &overlay)
}
