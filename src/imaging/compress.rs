use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageResult, Rgb, RgbImage};

use crate::core::config::EngineConfig;

/// Print-quality target for every embedded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionProfile {
    pub max_edge: u32,
    pub quality: u8,
}

impl CompressionProfile {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            max_edge: config.image_max_edge,
            quality: config.jpeg_quality,
        }
    }
}

impl Default for CompressionProfile {
    fn default() -> Self {
        Self {
            max_edge: 1600,
            quality: 75,
        }
    }
}

/// A baseline JPEG ready to embed with `DCTDecode`.
#[derive(Clone, PartialEq, Eq)]
pub struct CompressedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for CompressedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CompressedImage({}x{}, {} bytes)",
            self.width,
            self.height,
            self.data.len()
        )
    }
}

pub fn compress_image(bytes: &[u8], profile: CompressionProfile) -> ImageResult<CompressedImage> {
    let decoded = image::load_from_memory(bytes)?;
    compress_decoded(decoded, profile)
}

pub fn compress_decoded(
    decoded: DynamicImage,
    profile: CompressionProfile,
) -> ImageResult<CompressedImage> {
    let (width, height) = decoded.dimensions();
    let (target_w, target_h) = target_dimensions(width, height, profile.max_edge);
    let resized = if (target_w, target_h) == (width, height) {
        decoded
    } else {
        decoded.resize_exact(target_w, target_h, FilterType::Lanczos3)
    };

    // JPEG has no alpha channel; transparent areas become paper white.
    let rgb = if resized.color().has_alpha() {
        flatten_on_white(&resized)
    } else {
        resized.to_rgb8()
    };
    let mut data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut data), profile.quality);
    rgb.write_with_encoder(encoder)?;

    Ok(CompressedImage {
        data,
        width: rgb.width(),
        height: rgb.height(),
    })
}

fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u32::from(a);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Scales so the longest edge is at most `max_edge`. Never upscales.
pub fn target_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge || longest == 0 {
        return (width, height);
    }
    let scale = max_edge as f64 / longest as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use pretty_assertions::assert_eq;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, 90, 200])
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn target_dimensions_keep_aspect() {
        assert_eq!(target_dimensions(3200, 2400, 1600), (1600, 1200));
        assert_eq!(target_dimensions(1000, 4000, 1600), (400, 1600));
        assert_eq!(target_dimensions(800, 600, 1600), (800, 600));
    }

    #[test]
    fn downscales_and_encodes_jpeg() {
        let profile = CompressionProfile {
            max_edge: 32,
            quality: 70,
        };
        let compressed = compress_image(&png_bytes(64, 48), profile).unwrap();
        assert_eq!((compressed.width, compressed.height), (32, 24));
        assert_eq!(&compressed.data[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn compression_is_deterministic() {
        let bytes = png_bytes(40, 30);
        let a = compress_image(&bytes, CompressionProfile::default()).unwrap();
        let b = compress_image(&bytes, CompressionProfile::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn transparent_background_becomes_white() {
        let img = RgbaImage::from_fn(40, 20, |x, _| {
            if x == 20 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png).unwrap();

        let compressed = compress_image(&png.into_inner(), CompressionProfile::default()).unwrap();
        let decoded = image::load_from_memory(&compressed.data).unwrap().to_rgb8();
        let corner = decoded.get_pixel(0, 0).0;
        assert!(corner.iter().all(|c| *c > 240), "corner pixel {corner:?}");
        let stroke = decoded.get_pixel(20, 10).0;
        assert!(stroke.iter().all(|c| *c < 80), "stroke pixel {stroke:?}");
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(compress_image(b"definitely not an image", CompressionProfile::default()).is_err());
    }
}
