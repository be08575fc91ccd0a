use crate::matching::domain::face_verdict::FaceVerdict;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// A face region paired with the verdict that decides how it is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedFace {
    pub region: Region,
    pub verdict: FaceVerdict,
}

/// Domain interface for drawing verdicts onto a frame in place.
pub trait FrameAnnotator: Send + Sync {
    fn annotate(
        &self,
        frame: &mut Frame,
        faces: &[AnnotatedFace],
    ) -> Result<(), Box<dyn std::error::Error>>;
}
