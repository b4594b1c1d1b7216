use image::DynamicImage;
use std::path::Path;
use tracing::debug;

use crate::stamp::StampError;

/// Save image as lossy WebP, keeping the alpha channel when present
pub fn save(image: &DynamicImage, path: &Path, quality: f32) -> Result<(), StampError> {
    let encoded = match webp::Encoder::from_image(image) {
        Ok(encoder) => encoder.encode(quality).to_vec(),
        Err(e) => {
            // The webp encoder only takes 8-bit RGB(A); convert anything else
            debug!("WebP encoder rejected source layout ({}), converting to RGBA8", e);
            let rgba = image.to_rgba8();
            webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
                .encode(quality)
                .to_vec()
        }
    };
    std::fs::write(path, encoded)?;
    debug!("WebP written at quality {}: {}", quality, path.display());
    Ok(())
}
