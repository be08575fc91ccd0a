use crate::shared::frame::Frame;

/// Encodes a frame into a compressed image byte buffer.
pub trait FrameEncoder: Send + Sync {
    fn encode(&self, frame: &Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}
