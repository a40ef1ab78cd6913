use std::io::Cursor;

use image::{
    codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, GenericImageView, ImageReader, RgbImage,
};

use crate::{
    constants::{IMAGE_MAX_EDGE_PX, IMAGE_MIN_QUALITY, IMAGE_QUALITY_STEP, IMAGE_START_QUALITY, IMAGE_TARGET_BYTES},
    entities::media::{MediaKind, ProcessedMedia},
    errors::MediaError,
};

/// Below this the image is useless as a poster or event picture.
const MIN_EDGE_PX: u32 = 16;

/// Re-encodes images as JPEG, bounded by longest edge and byte size.
///
/// The longest edge is first brought within `max_edge`. Quality then steps
/// down from 90 to 40; if even the lowest quality is too large, the image is
/// scaled to three quarters and the quality ladder runs again.
#[derive(Debug, Clone, Copy)]
pub struct ImageCompressor {
    target_bytes: u64,
    max_edge: u32,
}

impl Default for ImageCompressor {
    fn default() -> Self {
        ImageCompressor::new(IMAGE_TARGET_BYTES, IMAGE_MAX_EDGE_PX)
    }
}

impl ImageCompressor {
    pub fn new(target_bytes: u64, max_edge: u32) -> Self {
        ImageCompressor { target_bytes, max_edge }
    }

    pub fn compress(&self, bytes: &[u8]) -> Result<ProcessedMedia, MediaError> {
        let decoded = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?;

        let mut current = fit_within(decoded, self.max_edge);

        loop {
            let (width, height) = current.dimensions();
            let rgb = current.to_rgb8();

            let mut quality = IMAGE_START_QUALITY;
            loop {
                let encoded = encode_jpeg(&rgb, quality)?;
                if encoded.len() as u64 <= self.target_bytes {
                    tracing::debug!(width, height, quality, size = encoded.len(), "Image compressed");
                    return Ok(ProcessedMedia {
                        kind: MediaKind::Image,
                        bytes: encoded.into(),
                        content_type: "image/jpeg",
                        extension: "jpg",
                        width: Some(width),
                        height: Some(height),
                    });
                }
                if quality <= IMAGE_MIN_QUALITY {
                    break;
                }
                quality = quality.saturating_sub(IMAGE_QUALITY_STEP).max(IMAGE_MIN_QUALITY);
            }

            if width.max(height) <= MIN_EDGE_PX {
                return Err(MediaError::Encode(format!(
                    "cannot fit image within {} bytes",
                    self.target_bytes
                )));
            }
            current = current.resize(
                (width * 3 / 4).max(1),
                (height * 3 / 4).max(1),
                FilterType::Triangle,
            );
        }
    }
}

fn fit_within(img: DynamicImage, max_edge: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width.max(height) <= max_edge {
        img
    } else {
        // resize keeps the aspect ratio and fits inside the box
        img.resize(max_edge, max_edge, FilterType::Lanczos3)
    }
}

fn encode_jpeg(rgb: &RgbImage, quality: u8) -> Result<Vec<u8>, MediaError> {
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality).encode_image(rgb)?;
    Ok(out)
}
