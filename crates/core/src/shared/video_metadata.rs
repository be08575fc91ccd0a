use std::fmt;

/// Properties of an opened capture device.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub codec: String,
    pub device: String,
}

impl fmt::Display for VideoMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}x{} @ {:.1} fps ({})",
            self.device, self.width, self.height, self.fps, self.codec
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_summarizes_device() {
        let meta = VideoMetadata {
            width: 640,
            height: 480,
            fps: 30.0,
            codec: "rawvideo".to_string(),
            device: "/dev/video0".to_string(),
        };
        assert_eq!(meta.to_string(), "/dev/video0 640x480 @ 30.0 fps (rawvideo)");
    }
}
