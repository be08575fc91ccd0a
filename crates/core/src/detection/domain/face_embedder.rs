use crate::detection::domain::embedding::Embedding;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Domain interface for computing a face embedding from a detected region.
pub trait FaceEmbedder: Send {
    fn embed(
        &mut self,
        frame: &Frame,
        region: &Region,
    ) -> Result<Embedding, Box<dyn std::error::Error>>;
}
