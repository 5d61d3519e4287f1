//! Image re-encoding for embedding
//!
//! Source photos are decoded, shrunk to fit a bounding box (never enlarged),
//! flattened onto white and re-encoded as baseline JPEG. The result lives
//! only in memory and is dropped as soon as it has been embedded.

use super::EmbeddableImage;
use crate::options::CompressionOptions;
use crate::types::{PhotologError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbImage};
use std::path::Path;

/// Turns a source image file into an embeddable image
pub trait ImageCompressor {
    fn compress(&self, path: &Path) -> Result<EmbeddableImage>;
}

/// Shrink-and-re-encode compressor backed by the `image` crate
#[derive(Debug, Clone, Default)]
pub struct JpegCompressor {
    options: CompressionOptions,
}

impl JpegCompressor {
    pub fn new(options: CompressionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompressionOptions {
        &self.options
    }

    /// Compress an already decoded image
    pub fn compress_image(&self, image: &DynamicImage) -> Result<EmbeddableImage> {
        let (width, height) = image.dimensions();
        let fits = width <= self.options.max_width && height <= self.options.max_height;
        let rgb = if fits {
            flatten_on_white(image)
        } else {
            let resized = image.resize(
                self.options.max_width,
                self.options.max_height,
                FilterType::Lanczos3,
            );
            flatten_on_white(&resized)
        };

        let mut data = Vec::new();
        {
            let mut encoder = JpegEncoder::new_with_quality(&mut data, self.options.quality);
            encoder.encode_image(&rgb)?;
        }

        Ok(EmbeddableImage {
            width: rgb.width(),
            height: rgb.height(),
            data,
        })
    }
}

impl ImageCompressor for JpegCompressor {
    fn compress(&self, path: &Path) -> Result<EmbeddableImage> {
        let image = image::open(path).map_err(|e| {
            let message = if is_heif(path) {
                log::warn!(
                    "HEIC/HEIF decoding is not supported; convert {} to JPEG to include it",
                    path.display()
                );
                format!("HEIC/HEIF decoding is not supported ({e})")
            } else {
                e.to_string()
            };
            PhotologError::ImageCompression {
                path: path.to_owned(),
                message,
            }
        })?;
        self.compress_image(&image)
    }
}

fn is_heif(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("heic") || ext.eq_ignore_ascii_case("heif"))
}

/// Drop any alpha channel by compositing over white
fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |channel: u8| ((u16::from(channel) * alpha + 255 * (255 - alpha)) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}
