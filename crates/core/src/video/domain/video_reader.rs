use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Reads frames from a live capture source.
///
/// Implementations handle device and codec details while the pipeline works
/// with the abstract `Frame` and `VideoMetadata` types.
pub trait VideoReader: Send {
    /// Opens the capture source and returns its metadata.
    fn open(&mut self) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Blocks until the next RGB frame is available.
    ///
    /// `Ok(None)` signals the end of input; the reader is not usable afterwards.
    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Releases the device. Safe to call more than once.
    fn close(&mut self);
}
