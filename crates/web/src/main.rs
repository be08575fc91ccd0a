use std::path::Path;
use std::process;
use std::sync::Arc;

use clap::Parser;

use facematch_core::annotation::infrastructure::font_resolver::resolve_font;
use facematch_core::annotation::infrastructure::imageproc_annotator::ImageprocAnnotator;
use facematch_core::detection::domain::face_recognizer::FaceRecognizer;
use facematch_core::detection::infrastructure::onnx_arcface_embedder::OnnxArcfaceEmbedder;
use facematch_core::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use facematch_core::matching::domain::reference_store::ReferenceStore;
use facematch_core::matching::infrastructure::cosine_matcher::CosineMatcher;
use facematch_core::shared::constants::{
    EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use facematch_core::shared::model_resolver;
use facematch_core::video::domain::video_reader::VideoReader;
use facematch_core::video::infrastructure::ffmpeg_camera_reader::FfmpegCameraReader;
use facematch_core::video::infrastructure::image_frame_decoder::ImageFrameDecoder;
use facematch_core::video::infrastructure::jpeg_frame_encoder::JpegFrameEncoder;

use facematch_web::config::Cli;
use facematch_web::routes::router;
use facematch_web::state::{AppState, CameraFactory};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    cli.validate()?;

    // Model downloads use a blocking client, so resolve them before the
    // async runtime starts.
    let recognizer = build_recognizer(&cli)?;
    let annotator = ImageprocAnnotator::new(resolve_font(cli.font.as_deref())?);

    let camera_index = cli.camera;
    let camera: CameraFactory =
        Arc::new(move || -> Box<dyn VideoReader> { Box::new(FfmpegCameraReader::new(camera_index)) });

    let state = AppState::new(
        Box::new(ImageFrameDecoder::new()),
        recognizer,
        Arc::new(ReferenceStore::new()),
        Arc::new(CosineMatcher::new(cli.match_threshold)),
        Arc::new(annotator),
        Arc::new(JpegFrameEncoder::default()),
        camera,
        cli.media_dir.clone(),
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(&cli, state))
}

async fn serve(cli: &Cli, state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cli.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on http://{addr}");
    eprintln!("Face match running at http://{addr}");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

fn build_recognizer(cli: &Cli) -> Result<FaceRecognizer, Box<dyn std::error::Error>> {
    let models_dir = cli.models_dir.as_deref();
    let detector_path = resolve_model(YOLO_MODEL_NAME, YOLO_MODEL_URL, models_dir)?;
    let embedder_path = resolve_model(EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, models_dir)?;

    let detector = OnnxYoloDetector::new(&detector_path, cli.confidence)?;
    let embedder = OnnxArcfaceEmbedder::new(&embedder_path)?;
    Ok(FaceRecognizer::new(Box::new(detector), Box::new(embedder)))
}

fn resolve_model(
    name: &'static str,
    url: &str,
    models_dir: Option<&Path>,
) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {name}");
    let progress = move |downloaded: u64, total: u64| {
        if total > 0 {
            let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
            eprint!("\rDownloading {name}... {pct}%");
        } else {
            eprint!("\rDownloading {name}... {downloaded} bytes");
        }
    };
    let path = model_resolver::resolve(name, url, models_dir, Some(Box::new(progress)))?;
    log::info!("Using model {}", path.display());
    Ok(path)
}
