pub mod jpeg;
pub mod png;
pub mod webp;

use super::StampError;
use image::{DynamicImage, ImageFormat};
use std::path::Path;
use tracing::debug;

/// Encoding used for a watermarked copy, chosen from the source extension
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Bmp,
    Tiff,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::WebP),
            "bmp" => Some(OutputFormat::Bmp),
            "tif" | "tiff" => Some(OutputFormat::Tiff),
            _ => None,
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::WebP => ImageFormat::WebP,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

/// Extract the embedded ICC profile for formats that can carry one on output
pub fn extract_icc_profile(path: &Path, format: OutputFormat) -> Option<Vec<u8>> {
    match format {
        OutputFormat::Jpeg => jpeg::extract_icc_profile(path),
        OutputFormat::Png => png::extract_icc_profile(path),
        _ => None,
    }
}

/// Save image in the given format
pub fn save_image(
    image: &DynamicImage,
    path: &Path,
    format: OutputFormat,
    jpeg_quality: u8,
    webp_quality: f32,
    icc_profile: Option<&[u8]>,
) -> Result<(), StampError> {
    match format {
        OutputFormat::Jpeg => jpeg::save_with_profile(image, path, jpeg_quality, icc_profile),
        OutputFormat::Png => png::save_with_profile(image, path, icc_profile),
        OutputFormat::WebP => webp::save(image, path, webp_quality),
        OutputFormat::Bmp | OutputFormat::Tiff => {
            debug!("Saving {:?} via image encoder: {}", format, path.display());
            image.save_with_format(path, format.image_format())?;
            Ok(())
        }
    }
}
