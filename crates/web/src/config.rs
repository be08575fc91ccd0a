use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use facematch_core::detection::infrastructure::onnx_yolo_detector::DEFAULT_CONFIDENCE;
use facematch_core::matching::infrastructure::cosine_matcher::DEFAULT_THRESHOLD;

/// Live face matching against an uploaded reference photo.
#[derive(Parser, Debug, Clone)]
#[command(name = "facematch")]
pub struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Directory where uploaded reference photos are stored.
    #[arg(long, default_value = "media")]
    pub media_dir: PathBuf,

    /// Camera index (/dev/video<N> on Linux, device N on macOS).
    #[arg(long, default_value_t = 0)]
    pub camera: u32,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    pub confidence: f64,

    /// Cosine similarity needed to call a face a match (-1.0-1.0).
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub match_threshold: f64,

    /// TrueType font for the MATCH / NO MATCH labels (bundled DejaVu Sans if unset).
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Directory checked for model files before the download cache.
    #[arg(long)]
    pub models_dir: Option<PathBuf>,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!(
                "Confidence must be between 0.0 and 1.0, got {}",
                self.confidence
            ));
        }
        if !(-1.0..=1.0).contains(&self.match_threshold) {
            return Err(format!(
                "Match threshold must be between -1.0 and 1.0, got {}",
                self.match_threshold
            ));
        }
        if let Some(font) = &self.font {
            if !font.is_file() {
                return Err(format!("Font file not found: {}", font.display()));
            }
        }
        if let Some(dir) = &self.models_dir {
            if !dir.is_dir() {
                return Err(format!("Models directory not found: {}", dir.display()));
            }
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
