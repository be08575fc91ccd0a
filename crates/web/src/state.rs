use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use facematch_core::annotation::domain::frame_annotator::FrameAnnotator;
use facematch_core::detection::domain::face_recognizer::FaceRecognizer;
use facematch_core::matching::domain::face_matcher::FaceMatcher;
use facematch_core::matching::domain::reference_store::ReferenceStore;
use facematch_core::pipeline::pipeline_logger::LogPipelineLogger;
use facematch_core::pipeline::register_reference_use_case::RegisterReferenceUseCase;
use facematch_core::pipeline::stream_faces_use_case::StreamFacesUseCase;
use facematch_core::video::domain::frame_decoder::FrameDecoder;
use facematch_core::video::domain::frame_encoder::FrameEncoder;
use facematch_core::video::domain::video_reader::VideoReader;

/// Opens a fresh camera handle for each stream request.
pub type CameraFactory = Arc<dyn Fn() -> Box<dyn VideoReader> + Send + Sync>;

/// Everything the handlers share. Cloning is cheap; all heavy parts sit
/// behind `Arc`, and the one `ReferenceStore` is visible to every request.
#[derive(Clone)]
pub struct AppState {
    pub registration: Arc<RegisterReferenceUseCase>,
    pub recognizer: Arc<Mutex<FaceRecognizer>>,
    pub store: Arc<ReferenceStore>,
    pub matcher: Arc<dyn FaceMatcher>,
    pub annotator: Arc<dyn FrameAnnotator>,
    pub encoder: Arc<dyn FrameEncoder>,
    pub camera: CameraFactory,
    pub media_dir: PathBuf,
}

impl AppState {
    /// Wire the registration use case to the same recognizer and store the
    /// streams use.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        decoder: Box<dyn FrameDecoder>,
        recognizer: FaceRecognizer,
        store: Arc<ReferenceStore>,
        matcher: Arc<dyn FaceMatcher>,
        annotator: Arc<dyn FrameAnnotator>,
        encoder: Arc<dyn FrameEncoder>,
        camera: CameraFactory,
        media_dir: PathBuf,
    ) -> Self {
        let recognizer = Arc::new(Mutex::new(recognizer));
        let registration = Arc::new(RegisterReferenceUseCase::new(
            decoder,
            Arc::clone(&recognizer),
            Arc::clone(&store),
        ));
        Self {
            registration,
            recognizer,
            store,
            matcher,
            annotator,
            encoder,
            camera,
            media_dir,
        }
    }

    /// A new live pipeline bound to a fresh camera handle.
    pub fn stream_use_case(&self) -> StreamFacesUseCase {
        StreamFacesUseCase::new(
            (self.camera)(),
            Arc::clone(&self.recognizer),
            Arc::clone(&self.store),
            Arc::clone(&self.matcher),
            Arc::clone(&self.annotator),
            Arc::clone(&self.encoder),
            Box::new(LogPipelineLogger::default()),
        )
    }
}
