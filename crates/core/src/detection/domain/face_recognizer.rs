use crate::detection::domain::embedding::Embedding;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_embedder::FaceEmbedder;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// A face located in a frame together with its embedding.
#[derive(Clone, Debug)]
pub struct DetectedFace {
    pub region: Region,
    pub embedding: Embedding,
}

/// Runs detection and then embeds every detected region.
pub struct FaceRecognizer {
    detector: Box<dyn FaceDetector>,
    embedder: Box<dyn FaceEmbedder>,
}

impl FaceRecognizer {
    pub fn new(detector: Box<dyn FaceDetector>, embedder: Box<dyn FaceEmbedder>) -> Self {
        Self { detector, embedder }
    }

    /// Faces in detector order (highest confidence first). Empty regions are skipped.
    pub fn recognize(
        &mut self,
        frame: &Frame,
    ) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
        let regions = self.detector.detect(frame)?;
        let mut faces = Vec::with_capacity(regions.len());
        for region in regions {
            if region.is_empty() {
                continue;
            }
            let embedding = self.embedder.embed(frame, &region)?;
            faces.push(DetectedFace { region, embedding });
        }
        Ok(faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubDetector {
        regions: Vec<Region>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Ok(self.regions.clone())
        }
    }

    struct FailingDetector;

    impl FaceDetector for FailingDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Err("inference failed".into())
        }
    }

    /// Encodes the region position into the embedding so tests can tell faces apart.
    struct PositionEmbedder;

    impl FaceEmbedder for PositionEmbedder {
        fn embed(
            &mut self,
            _frame: &Frame,
            region: &Region,
        ) -> Result<Embedding, Box<dyn std::error::Error>> {
            Ok(Embedding::new(vec![region.x as f32, region.y as f32]))
        }
    }

    fn region(x: i32, y: i32, w: i32, h: i32) -> Region {
        Region {
            x,
            y,
            width: w,
            height: h,
            confidence: 0.9,
        }
    }

    fn frame() -> Frame {
        Frame::new(vec![0u8; 100 * 100 * 3], 100, 100, 3, 0)
    }

    #[test]
    fn test_recognize_embeds_each_region_in_order() {
        let mut recognizer = FaceRecognizer::new(
            Box::new(StubDetector {
                regions: vec![region(10, 0, 20, 20), region(0, 30, 20, 20)],
            }),
            Box::new(PositionEmbedder),
        );
        let faces = recognizer.recognize(&frame()).unwrap();
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].region.x, 10);
        assert_eq!(faces[0].embedding.values(), &[1.0, 0.0]);
        assert_eq!(faces[1].embedding.values(), &[0.0, 1.0]);
    }

    #[test]
    fn test_recognize_skips_empty_regions() {
        let mut recognizer = FaceRecognizer::new(
            Box::new(StubDetector {
                regions: vec![region(10, 10, 0, 20), region(5, 5, 10, 10)],
            }),
            Box::new(PositionEmbedder),
        );
        let faces = recognizer.recognize(&frame()).unwrap();
        assert_eq!(faces.len(), 1);
        assert_eq!(faces[0].region.x, 5);
    }

    #[test]
    fn test_recognize_no_faces() {
        let mut recognizer = FaceRecognizer::new(
            Box::new(StubDetector { regions: vec![] }),
            Box::new(PositionEmbedder),
        );
        assert!(recognizer.recognize(&frame()).unwrap().is_empty());
    }

    #[test]
    fn test_recognize_propagates_detector_error() {
        let mut recognizer =
            FaceRecognizer::new(Box::new(FailingDetector), Box::new(PositionEmbedder));
        assert!(recognizer.recognize(&frame()).is_err());
    }
}
