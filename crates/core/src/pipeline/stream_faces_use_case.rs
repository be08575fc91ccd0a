use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::annotation::domain::frame_annotator::{AnnotatedFace, FrameAnnotator};
use crate::detection::domain::face_recognizer::{DetectedFace, FaceRecognizer};
use crate::matching::domain::face_matcher::FaceMatcher;
use crate::matching::domain::face_verdict::FaceVerdict;
use crate::matching::domain::reference_store::ReferenceStore;
use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::shared::frame::Frame;
use crate::video::domain::frame_encoder::FrameEncoder;
use crate::video::domain::video_reader::VideoReader;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    Idle,
    Running,
    Stopped,
}

/// Live matching pipeline: read → recognize → judge → annotate → encode.
///
/// Iterating yields one encoded image per camera frame. The camera is opened
/// on the first call to `next` and released exactly once, when input ends,
/// encoding fails or the use case is dropped. A stopped stream never restarts.
pub struct StreamFacesUseCase {
    reader: Box<dyn VideoReader>,
    recognizer: Arc<Mutex<FaceRecognizer>>,
    store: Arc<ReferenceStore>,
    matcher: Arc<dyn FaceMatcher>,
    annotator: Arc<dyn FrameAnnotator>,
    encoder: Arc<dyn FrameEncoder>,
    logger: Box<dyn PipelineLogger>,
    state: StreamState,
    emitted: usize,
}

impl StreamFacesUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        recognizer: Arc<Mutex<FaceRecognizer>>,
        store: Arc<ReferenceStore>,
        matcher: Arc<dyn FaceMatcher>,
        annotator: Arc<dyn FrameAnnotator>,
        encoder: Arc<dyn FrameEncoder>,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            reader,
            recognizer,
            store,
            matcher,
            annotator,
            encoder,
            logger,
            state: StreamState::Idle,
            emitted: 0,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.state == StreamState::Stopped
    }

    fn start(&mut self) -> bool {
        match self.reader.open() {
            Ok(metadata) => {
                self.logger.info(&format!("Camera opened: {metadata}"));
                self.state = StreamState::Running;
                true
            }
            Err(e) => {
                log::error!("Failed to open camera: {e}");
                self.state = StreamState::Stopped;
                false
            }
        }
    }

    fn stop(&mut self) {
        if self.state == StreamState::Running {
            self.reader.close();
            self.logger
                .info(&format!("Stream stopped after {} frames", self.emitted));
            self.logger.summary();
        }
        self.state = StreamState::Stopped;
    }

    fn process(&mut self, mut frame: Frame) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let t0 = Instant::now();
        let faces = match self.recognize(&frame) {
            Ok(faces) => faces,
            Err(e) => {
                log::warn!("Face recognition failed on frame {}: {e}", frame.index());
                Vec::new()
            }
        };
        self.logger
            .timing("detect", t0.elapsed().as_secs_f64() * 1000.0);
        self.logger.metric("faces", faces.len() as f64);

        let reference = self.store.get();
        let annotated: Vec<AnnotatedFace> = faces
            .into_iter()
            .map(|face| AnnotatedFace {
                verdict: FaceVerdict::judge(
                    self.matcher.as_ref(),
                    reference.as_deref(),
                    &face.embedding,
                ),
                region: face.region,
            })
            .collect();

        let t1 = Instant::now();
        if let Err(e) = self.annotator.annotate(&mut frame, &annotated) {
            log::warn!("Annotation failed on frame {}: {e}", frame.index());
        }
        self.logger
            .timing("annotate", t1.elapsed().as_secs_f64() * 1000.0);

        let t2 = Instant::now();
        let encoded = self.encoder.encode(&frame)?;
        self.logger
            .timing("encode", t2.elapsed().as_secs_f64() * 1000.0);

        Ok(encoded)
    }

    fn recognize(&self, frame: &Frame) -> Result<Vec<DetectedFace>, Box<dyn std::error::Error>> {
        self.recognizer
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?
            .recognize(frame)
    }
}

impl Iterator for StreamFacesUseCase {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            StreamState::Stopped => return None,
            StreamState::Idle => {
                if !self.start() {
                    return None;
                }
            }
            StreamState::Running => {}
        }

        let frame = match self.reader.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.stop();
                return None;
            }
            Err(e) => {
                log::warn!("Camera read failed: {e}");
                self.stop();
                return None;
            }
        };

        match self.process(frame) {
            Ok(encoded) => {
                self.emitted += 1;
                self.logger.progress(self.emitted);
                Some(encoded)
            }
            Err(e) => {
                log::error!("Frame encoding failed: {e}");
                self.stop();
                None
            }
        }
    }
}

impl Drop for StreamFacesUseCase {
    fn drop(&mut self) {
        self.stop();
    }
}
