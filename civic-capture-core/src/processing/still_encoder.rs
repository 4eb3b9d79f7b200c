use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, RgbaImage};

use crate::models::artifact::CaptureArtifact;
use crate::models::config::CameraConfig;

/// One uncompressed frame grabbed from a live camera feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

/// Largest size with the same aspect ratio that fits inside `max_width`×`max_height`.
///
/// Frames that already fit are returned unchanged; frames are never upscaled.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }
    let x_scale = max_width as f64 / width as f64;
    let y_scale = max_height as f64 / height as f64;
    let scale = x_scale.min(y_scale);
    let target_width = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let target_height = ((height as f64 * scale).round() as u32).clamp(1, max_height);
    (target_width, target_height)
}

/// Encode a still frame as JPEG, scaled down to the configured cap.
pub fn encode_still(frame: RawFrame, config: &CameraConfig) -> Result<CaptureArtifact, String> {
    let RawFrame { width, height, rgba } = frame;
    if width == 0 || height == 0 {
        return Err(format!("empty frame {}x{}", width, height));
    }

    let source = RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| format!("frame buffer too small for {}x{} RGBA", width, height))?;

    let (target_width, target_height) = fit_within(width, height, config.max_width, config.max_height);
    let scaled = if (target_width, target_height) == (width, height) {
        source
    } else {
        log::debug!(
            "Scaling still {}x{} -> {}x{}",
            width,
            height,
            target_width,
            target_height
        );
        imageops::resize(&source, target_width, target_height, FilterType::Triangle)
    };

    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgba8(scaled).to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, config.jpeg_quality)
        .encode(rgb.as_raw(), target_width, target_height, ExtendedColorType::Rgb8)
        .map_err(|e| format!("jpeg encoding failed: {}", e))?;

    Ok(CaptureArtifact::image(jpeg, "image/jpeg", target_width, target_height))
}
