use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::shared::frame::Frame;
use crate::video::domain::frame_encoder::FrameEncoder;

pub const DEFAULT_QUALITY: u8 = 95;

/// Encodes RGB frames as baseline JPEG using the `image` crate.
pub struct JpegFrameEncoder {
    quality: u8,
}

impl JpegFrameEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegFrameEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITY)
    }
}

impl FrameEncoder for JpegFrameEncoder {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let color_type = match frame.channels() {
            1 => ExtendedColorType::L8,
            3 => ExtendedColorType::Rgb8,
            n => return Err(format!("Cannot JPEG-encode {n}-channel frame").into()),
        };

        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, self.quality).write_image(
            frame.data(),
            frame.width(),
            frame.height(),
            color_type,
        )?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let data = rgb.repeat((width * height) as usize);
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_encode_produces_jpeg_markers() {
        let bytes = JpegFrameEncoder::default()
            .encode(&make_frame(16, 8, [10, 200, 30]))
            .unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encoded_bytes_decode_to_same_size_and_color() {
        let bytes = JpegFrameEncoder::default()
            .encode(&make_frame(32, 24, [200, 40, 40]))
            .unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (32, 24));
        let [r, g, b] = decoded.get_pixel(16, 12).0;
        assert!(r > 180 && g < 70 && b < 70, "got {r},{g},{b}");
    }

    #[test]
    fn test_rejects_unsupported_channel_count() {
        let frame = Frame::new(vec![0u8; 2 * 2 * 4], 2, 2, 4, 0);
        assert!(JpegFrameEncoder::default().encode(&frame).is_err());
    }

    #[test]
    fn test_quality_is_clamped() {
        let encoder = JpegFrameEncoder::new(0);
        assert_eq!(encoder.quality, 1);
        assert!(encoder.encode(&make_frame(4, 4, [0, 0, 0])).is_ok());
    }
}
