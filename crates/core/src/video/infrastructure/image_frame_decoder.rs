use crate::shared::frame::Frame;
use crate::video::domain::frame_decoder::FrameDecoder;

/// Decodes any format the `image` crate recognizes and converts it to RGB.
#[derive(Default)]
pub struct ImageFrameDecoder;

impl ImageFrameDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl FrameDecoder for ImageFrameDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, Box<dyn std::error::Error>> {
        let image = image::load_from_memory(bytes)?;
        Ok(Frame::from_rgb_image(image.to_rgb8(), 0))
    }
}
