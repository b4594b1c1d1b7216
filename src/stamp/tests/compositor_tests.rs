use crate::stamp::compositor::{composite, composite_overlay, compute_text_position, render_overlay};
use crate::stamp::font::WatermarkFont;
use crate::stamp::style::{Position, WatermarkStyle};
use image::{DynamicImage, GenericImageView, GrayImage, ImageBuffer, Luma, Rgb, Rgba};

fn gray_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([90u8, 90, 90])))
}

fn style(opacity: u8, position: Position) -> WatermarkStyle {
    WatermarkStyle {
        font_size: 21,
        color: Rgb([250, 20, 10]),
        opacity,
        position,
        margin: 16,
        shadow: false,
        font_path: None,
    }
}

fn changed_pixels(a: &DynamicImage, b: &DynamicImage) -> Vec<(u32, u32)> {
    a.pixels()
        .zip(b.pixels())
        .filter(|((_, _, pa), (_, _, pb))| pa != pb)
        .map(|((x, y, _), _)| (x, y))
        .collect()
}

#[test]
fn test_dimensions_and_color_type_preserved() {
    let font = WatermarkFont::Builtin;
    let sources = [
        gray_rgb(320, 240),
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(64, 300, Rgba([1u8, 2, 3, 255]))),
        DynamicImage::ImageLuma8(ImageBuffer::from_pixel(500, 20, Luma([200u8]))),
        gray_rgb(3, 3),
    ];

    for source in &sources {
        let out = composite(source, "2023-05-14", &style(220, Position::BottomRight), &font);
        assert_eq!(out.dimensions(), source.dimensions());
        assert_eq!(out.color(), source.color());
    }
}

#[test]
fn test_zero_opacity_is_pixel_identical() {
    let source = gray_rgb(200, 100);
    let mut with_shadow = style(0, Position::Center);
    with_shadow.shadow = true;

    let out = composite(&source, "2023-05-14", &with_shadow, &WatermarkFont::Builtin);
    assert_eq!(out.as_bytes(), source.as_bytes());
}

#[test]
fn test_source_is_not_mutated() {
    let source = gray_rgb(200, 100);
    let before = source.clone();
    let out = composite(&source, "2023-05-14", &style(255, Position::TopLeft), &WatermarkFont::Builtin);
    assert_eq!(source.as_bytes(), before.as_bytes());
    assert_ne!(out.as_bytes(), source.as_bytes());
}

#[test]
fn test_full_opacity_text_pixels_equal_color() {
    let source = gray_rgb(400, 200);
    let style = style(255, Position::TopLeft);
    let out = composite(&source, "2023-05-14", &style, &WatermarkFont::Builtin);

    let changed = changed_pixels(&source, &out);
    assert!(!changed.is_empty());
    for (x, y) in changed {
        assert_eq!(out.get_pixel(x, y), Rgba([250, 20, 10, 255]));
    }
}

#[test]
fn test_partial_opacity_blends_with_background() {
    let source = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(300, 100, Rgb([0u8, 0, 0])));
    let mut style = style(128, Position::Center);
    style.color = Rgb([255, 255, 255]);
    let out = composite(&source, "1", &style, &WatermarkFont::Builtin);

    let changed = changed_pixels(&source, &out);
    assert!(!changed.is_empty());
    for (x, y) in changed {
        let pixel = out.get_pixel(x, y);
        assert_eq!(pixel[3], 255);
        for channel in 0..3 {
            assert!((pixel[channel] as i32 - 128).abs() <= 1, "({}, {}) -> {:?}", x, y, pixel);
        }
    }
}

#[test]
fn test_partial_coverage_scales_overlay_alpha() {
    // Anti-aliased edge: half coverage halves the alpha
    let mask = GrayImage::from_pixel(10, 5, Luma([128u8]));
    let style = style(200, Position::TopLeft);
    let overlay = render_overlay((100, 50), &mask, &style);

    let expected_alpha = ((200u32 * 128 + 127) / 255) as u8;
    assert_eq!(expected_alpha, 100);
    assert_eq!(overlay.get_pixel(16, 16), &Rgba([250, 20, 10, expected_alpha]));
    assert_eq!(overlay.get_pixel(25, 20), &Rgba([250, 20, 10, expected_alpha]));
    assert_eq!(overlay.get_pixel(26, 16)[3], 0);
    assert_eq!(overlay.get_pixel(15, 16)[3], 0);
}

#[test]
fn test_partial_coverage_blends_over_opaque_base() {
    let background = [40u8, 80, 120];
    let source = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(100, 50, Rgb(background)));
    let mask = GrayImage::from_pixel(10, 5, Luma([128u8]));
    let style = style(200, Position::TopLeft);
    let overlay = render_overlay((100, 50), &mask, &style);

    let out = composite_overlay(&source, &overlay);
    assert_eq!(out.color(), source.color());

    let alpha = overlay.get_pixel(16, 16)[3] as f64 / 255.0;
    let pixel = out.get_pixel(16, 16);
    for channel in 0..3 {
        let expected =
            style.color[channel] as f64 * alpha + background[channel] as f64 * (1.0 - alpha);
        assert!(
            (pixel[channel] as f64 - expected).abs() <= 1.0,
            "channel {}: {} vs {}",
            channel,
            pixel[channel],
            expected
        );
    }
    assert_eq!(pixel[3], 255);
    // Outside the mask nothing changes
    assert_eq!(out.get_pixel(40, 40), Rgba([40, 80, 120, 255]));
}

#[test]
fn test_huge_font_size_is_capped_to_image() {
    let source = gray_rgb(100, 50);
    let mut huge = style(255, Position::BottomRight);
    huge.font_size = 1_000_000;

    let out = composite(&source, "2023-05-14", &huge, &WatermarkFont::Builtin);
    assert_eq!(out.dimensions(), (100, 50));
    assert!(!changed_pixels(&source, &out).is_empty());
}

#[test]
fn test_text_lands_in_anchored_box() {
    let source = gray_rgb(1000, 1000);
    let style = style(255, Position::BottomRight);
    let font = WatermarkFont::Builtin;
    let mask = font.rasterize("2023-05-14", style.font_size);
    let (x, y) = compute_text_position((1000, 1000), mask.dimensions(), style.position, style.margin);

    let out = composite(&source, "2023-05-14", &style, &font);
    let changed = changed_pixels(&source, &out);
    let max_x = changed.iter().map(|(x, _)| *x).max().unwrap();
    let max_y = changed.iter().map(|(_, y)| *y).max().unwrap();
    let min_x = changed.iter().map(|(x, _)| *x).min().unwrap();
    let min_y = changed.iter().map(|(_, y)| *y).min().unwrap();

    assert!(min_x >= x && min_y >= y);
    assert!(max_x < x + mask.width() && max_y < y + mask.height());
    // Bottom-right corner sits within the margin of the image corner
    assert!(1000 - (x + mask.width()) <= style.margin);
    assert!(1000 - (y + mask.height()) <= style.margin);
}

#[test]
fn test_text_clipped_on_tiny_image() {
    let source = gray_rgb(12, 8);
    let out = composite(&source, "2023-05-14", &style(255, Position::BottomRight), &WatermarkFont::Builtin);
    assert_eq!(out.dimensions(), (12, 8));
}

#[test]
fn test_shadow_offset_below_text() {
    let mut with_shadow = style(255, Position::TopLeft);
    with_shadow.shadow = true;
    let mask = WatermarkFont::Builtin.rasterize("-", with_shadow.font_size);
    let overlay = render_overlay((200, 100), &mask, &with_shadow);

    // Scale 3 puts the hyphen on rows 25..28; the shadow ends 2px lower
    let text_row = 16 + 3 * 3;
    let shadow_row = text_row + 3 + 1;
    assert_eq!(overlay.get_pixel(20, text_row), &Rgba([250, 20, 10, 255]));
    assert_eq!(overlay.get_pixel(20, shadow_row), &Rgba([0, 0, 0, 255]));
    assert_eq!(overlay.get_pixel(20, 16)[3], 0);
}

#[test]
fn test_empty_text_leaves_image_alone() {
    let source = gray_rgb(50, 50);
    let out = composite(&source, "", &style(255, Position::Center), &WatermarkFont::Builtin);
    assert_eq!(out.as_bytes(), source.as_bytes());
}
