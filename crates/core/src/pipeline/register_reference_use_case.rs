use std::sync::{Arc, Mutex};

use crate::detection::domain::face_recognizer::FaceRecognizer;
use crate::matching::domain::reference_store::ReferenceStore;
use crate::video::domain::frame_decoder::FrameDecoder;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The first detected face became the reference.
    Registered { faces: usize },
    /// No face found; the store was left as it was.
    NoFace,
}

/// Reference registration: decode → recognize → store the first face.
pub struct RegisterReferenceUseCase {
    decoder: Box<dyn FrameDecoder>,
    recognizer: Arc<Mutex<FaceRecognizer>>,
    store: Arc<ReferenceStore>,
}

impl RegisterReferenceUseCase {
    pub fn new(
        decoder: Box<dyn FrameDecoder>,
        recognizer: Arc<Mutex<FaceRecognizer>>,
        store: Arc<ReferenceStore>,
    ) -> Self {
        Self {
            decoder,
            recognizer,
            store,
        }
    }

    pub fn execute(&self, image: &[u8]) -> Result<RegistrationOutcome, Box<dyn std::error::Error>> {
        let frame = self.decoder.decode(image)?;

        let faces = self
            .recognizer
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?
            .recognize(&frame)?;

        let count = faces.len();
        let Some(first) = faces.into_iter().next() else {
            log::info!("No face found in uploaded image; reference unchanged");
            return Ok(RegistrationOutcome::NoFace);
        };

        self.store.set(first.embedding);
        log::info!(
            "Reference updated from {}x{} image ({count} face(s) found)",
            frame.width(),
            frame.height()
        );
        Ok(RegistrationOutcome::Registered { faces: count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::embedding::Embedding;
    use crate::detection::domain::face_detector::FaceDetector;
    use crate::detection::domain::face_embedder::FaceEmbedder;
    use crate::shared::frame::Frame;
    use crate::shared::region::Region;

    // --- Stubs ---

    struct StubDecoder;

    impl FrameDecoder for StubDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<Frame, Box<dyn std::error::Error>> {
            if bytes.is_empty() {
                return Err("empty upload".into());
            }
            Ok(Frame::new(vec![0u8; 64 * 64 * 3], 64, 64, 3, 0))
        }
    }

    struct StubDetector {
        regions: Vec<Region>,
    }

    impl FaceDetector for StubDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>, Box<dyn std::error::Error>> {
            Ok(self.regions.clone())
        }
    }

    /// Embedding derived from the region position.
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

    // --- Helpers ---

    fn region(x: i32, y: i32) -> Region {
        Region {
            x,
            y,
            width: 10,
            height: 10,
            confidence: 0.9,
        }
    }

    fn use_case(regions: Vec<Region>, store: Arc<ReferenceStore>) -> RegisterReferenceUseCase {
        let recognizer = FaceRecognizer::new(
            Box::new(StubDetector { regions }),
            Box::new(PositionEmbedder),
        );
        RegisterReferenceUseCase::new(
            Box::new(StubDecoder),
            Arc::new(Mutex::new(recognizer)),
            store,
        )
    }

    // --- Tests ---

    #[test]
    fn test_first_face_becomes_reference() {
        let store = Arc::new(ReferenceStore::new());
        let uc = use_case(vec![region(5, 0), region(0, 5)], store.clone());

        let outcome = uc.execute(b"image").unwrap();

        assert_eq!(outcome, RegistrationOutcome::Registered { faces: 2 });
        assert_eq!(store.get().unwrap().values(), &[1.0, 0.0]);
    }

    #[test]
    fn test_no_face_leaves_absent_store_absent() {
        let store = Arc::new(ReferenceStore::new());
        let uc = use_case(vec![], store.clone());

        assert_eq!(uc.execute(b"image").unwrap(), RegistrationOutcome::NoFace);
        assert!(store.get().is_none());
    }

    #[test]
    fn test_no_face_keeps_previous_reference() {
        let store = Arc::new(ReferenceStore::new());
        store.set(Embedding::new(vec![0.0, 1.0]));
        let uc = use_case(vec![], store.clone());

        uc.execute(b"image").unwrap();
        assert_eq!(store.get().unwrap().values(), &[0.0, 1.0]);
    }

    #[test]
    fn test_new_upload_overwrites_reference() {
        let store = Arc::new(ReferenceStore::new());
        store.set(Embedding::new(vec![0.0, 1.0]));
        let uc = use_case(vec![region(3, 0)], store.clone());

        uc.execute(b"image").unwrap();
        assert_eq!(store.get().unwrap().values(), &[1.0, 0.0]);
    }

    #[test]
    fn test_decode_failure_is_error_and_store_untouched() {
        let store = Arc::new(ReferenceStore::new());
        let uc = use_case(vec![region(3, 0)], store.clone());

        assert!(uc.execute(b"").is_err());
        assert!(store.get().is_none());
    }
}
