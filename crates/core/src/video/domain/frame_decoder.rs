use crate::shared::frame::Frame;

/// Decodes an uploaded image byte buffer into an RGB frame.
pub trait FrameDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<Frame, Box<dyn std::error::Error>>;
}
