use image::{DynamicImage, ImageEncoder, codecs::jpeg::JpegEncoder};
use std::path::Path;
use tracing::debug;

use crate::stamp::StampError;

const ICC_MARKER: &[u8] = b"ICC_PROFILE\0";

/// Extract the ICC profile from a JPEG file.
///
/// Large profiles are split across several APP2 segments, each tagged with a
/// sequence number; the chunks are joined in order.
pub fn extract_icc_profile(path: &Path) -> Option<Vec<u8>> {
    let buffer = std::fs::read(path).ok()?;
    extract_icc_from_bytes(&buffer)
}

pub(crate) fn extract_icc_from_bytes(buffer: &[u8]) -> Option<Vec<u8>> {
    if buffer.len() < 4 || buffer[0] != 0xFF || buffer[1] != 0xD8 {
        return None;
    }

    let mut chunks: Vec<(u8, &[u8])> = Vec::new();
    let mut pos = 2;
    while pos + 4 <= buffer.len() {
        if buffer[pos] != 0xFF {
            break;
        }
        let marker = buffer[pos + 1];
        // Start of scan: no more metadata segments follow
        if marker == 0xDA || marker == 0xD9 {
            break;
        }
        let segment_length = u16::from_be_bytes([buffer[pos + 2], buffer[pos + 3]]) as usize;
        let segment_end = pos + 2 + segment_length;
        if segment_length < 2 || segment_end > buffer.len() {
            break;
        }

        let segment_data = &buffer[pos + 4..segment_end];
        if marker == 0xE2 && segment_data.len() > ICC_MARKER.len() + 2
            && segment_data.starts_with(ICC_MARKER)
        {
            let sequence = segment_data[ICC_MARKER.len()];
            chunks.push((sequence, &segment_data[ICC_MARKER.len() + 2..]));
        }
        pos = segment_end;
    }

    if chunks.is_empty() {
        return None;
    }
    chunks.sort_by_key(|(sequence, _)| *sequence);
    let profile: Vec<u8> = chunks.iter().flat_map(|(_, data)| data.iter().copied()).collect();
    debug!("Found ICC profile in JPEG: {} bytes", profile.len());
    Some(profile)
}

/// Save image as JPEG with optional ICC profile
pub fn save_with_profile(
    image: &DynamicImage,
    path: &Path,
    quality: u8,
    icc_profile: Option<&[u8]>,
) -> Result<(), StampError> {
    // JPEG doesn't support alpha channel, so convert to RGB
    let rgb_image = image.to_rgb8();
    let output = std::fs::File::create(path)?;
    let mut encoder = JpegEncoder::new_with_quality(output, quality);

    if let Some(profile_data) = icc_profile {
        match encoder.set_icc_profile(profile_data.to_vec()) {
            Ok(()) => debug!("Embedding ICC profile in JPEG: {} bytes", profile_data.len()),
            Err(e) => debug!("Failed to set ICC profile on JPEG encoder ({}), writing without it", e),
        }
    }

    encoder.write_image(
        &rgb_image,
        rgb_image.width(),
        rgb_image.height(),
        image::ExtendedColorType::Rgb8,
    )?;

    Ok(())
}
