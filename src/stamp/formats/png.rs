use flate2::read::ZlibDecoder;
use image::{DynamicImage, ImageEncoder, codecs::png::PngEncoder};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::stamp::StampError;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Extract ICC profile from PNG file
pub fn extract_icc_profile(path: &Path) -> Option<Vec<u8>> {
    let buffer = std::fs::read(path).ok()?;
    extract_icc_from_bytes(&buffer)
}

pub(crate) fn extract_icc_from_bytes(buffer: &[u8]) -> Option<Vec<u8>> {
    if buffer.len() < 8 || &buffer[0..8] != PNG_SIGNATURE {
        return None;
    }

    let mut pos = 8;
    while pos + 12 <= buffer.len() {
        let chunk_length = u32::from_be_bytes([
            buffer[pos],
            buffer[pos + 1],
            buffer[pos + 2],
            buffer[pos + 3],
        ]) as usize;
        let chunk_type = &buffer[pos + 4..pos + 8];
        let chunk_data_start = pos + 8;
        let chunk_data_end = chunk_data_start + chunk_length;
        if chunk_data_end > buffer.len() {
            return None;
        }

        // iCCP: profile name, NUL, compression method (0 = deflate), data
        if chunk_type == b"iCCP" {
            let chunk_data = &buffer[chunk_data_start..chunk_data_end];
            let null_pos = chunk_data.iter().position(|&b| b == 0)?;
            if null_pos + 2 > chunk_data.len() || chunk_data[null_pos + 1] != 0 {
                return None;
            }

            let mut decoder = ZlibDecoder::new(&chunk_data[null_pos + 2..]);
            let mut decompressed = Vec::new();
            decoder.read_to_end(&mut decompressed).ok()?;
            debug!(
                "Found ICC profile in PNG: {} bytes (decompressed)",
                decompressed.len()
            );
            return Some(decompressed);
        }

        // Image data starts; iCCP must precede it
        if chunk_type == b"IDAT" || chunk_type == b"IEND" {
            break;
        }

        // length + type + data + CRC
        pos = chunk_data_end + 4;
    }

    None
}

/// Save image as PNG, embedding the ICC profile when the encoder supports it
pub fn save_with_profile(
    image: &DynamicImage,
    path: &Path,
    icc_profile: Option<&[u8]>,
) -> Result<(), StampError> {
    let output = std::fs::File::create(path)?;
    let mut encoder = PngEncoder::new(output);

    if let Some(profile_data) = icc_profile {
        match encoder.set_icc_profile(profile_data.to_vec()) {
            Ok(()) => debug!("Embedding ICC profile in PNG: {} bytes", profile_data.len()),
            Err(e) => debug!("PNG encoder rejected ICC profile ({}), writing without it", e),
        }
    }

    image.write_with_encoder(encoder)?;
    Ok(())
}
