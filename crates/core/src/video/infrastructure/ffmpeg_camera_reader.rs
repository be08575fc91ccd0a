use std::time::Duration;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// Captures frames from a local camera via libavdevice.
///
/// Uses `video4linux2` with `/dev/video<N>` on Linux and `avfoundation` with
/// the bare index on macOS. Each decoded frame is converted to RGB24.
pub struct FfmpegCameraReader {
    camera_index: u32,
    capture: Option<Capture>,
    frame_index: usize,
}

/// Everything that lives only while the device is open.
struct Capture {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    video_stream_index: usize,
    width: u32,
    height: u32,
}

// Safety: FfmpegCameraReader is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegCameraReader {}

impl FfmpegCameraReader {
    pub fn new(camera_index: u32) -> Self {
        Self {
            camera_index,
            capture: None,
            frame_index: 0,
        }
    }

    pub fn device(&self) -> String {
        device_path(self.camera_index)
    }
}

impl VideoReader for FfmpegCameraReader {
    fn open(&mut self) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;
        ffmpeg_next::device::register_all();

        let device = self.device();
        let format = find_input_format(CAPTURE_FORMATS)
            .ok_or_else(|| format!("No capture input format among {CAPTURE_FORMATS:?}"))?;

        let mut options = ffmpeg_next::Dictionary::new();
        if cfg!(target_os = "macos") {
            options.set("framerate", "30");
        }
        let ictx = ffmpeg_next::format::open_with(
            &device,
            &ffmpeg_next::Format::Input(format),
            options,
        )?
        .input();

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("Camera exposes no video stream")?;
        let video_stream_index = stream.index();
        let rate = stream.avg_frame_rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;
        let (width, height) = (decoder.width(), decoder.height());
        if width == 0 || height == 0 {
            return Err(format!("Camera {device} reported an empty frame size").into());
        }

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        let metadata = VideoMetadata {
            width,
            height,
            fps,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
            device,
        };

        self.capture = Some(Capture {
            ictx,
            decoder,
            scaler,
            video_stream_index,
            width,
            height,
        });
        self.frame_index = 0;

        Ok(metadata)
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let Some(capture) = self.capture.as_mut() else {
            return Err("FfmpegCameraReader: not opened".into());
        };

        let Some(pixels) = capture.next_rgb()? else {
            return Ok(None);
        };
        let frame = Frame::new(pixels, capture.width, capture.height, 3, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        if self.capture.take().is_some() {
            log::debug!("Released camera {}", self.device());
        }
    }
}

impl Drop for FfmpegCameraReader {
    fn drop(&mut self) {
        self.close();
    }
}

impl Capture {
    /// Reads packets until one decodes into a frame. `None` once the device
    /// stops delivering data.
    fn next_rgb(&mut self) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error>> {
        loop {
            if let Some(pixels) = self.try_receive()? {
                return Ok(Some(pixels));
            }

            let mut packet = ffmpeg_next::Packet::empty();
            match packet.read(&mut self.ictx) {
                Ok(()) => {}
                Err(e) => match retry_delay(&e) {
                    Some(delay) => {
                        std::thread::sleep(delay);
                        continue;
                    }
                    None => {
                        if e != ffmpeg_next::Error::Eof {
                            log::warn!("Camera read failed: {e}");
                        }
                        return Ok(None);
                    }
                },
            }

            if packet.stream() != self.video_stream_index {
                continue;
            }
            if let Err(e) = self.decoder.send_packet(&packet) {
                log::debug!("Dropping undecodable camera packet: {e}");
            }
        }
    }

    fn try_receive(&mut self) -> Result<Option<Vec<u8>>, Box<dyn std::error::Error>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }
        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(&decoded, &mut rgb_frame)?;
        Ok(Some(extract_rgb_pixels(&rgb_frame, self.width, self.height)))
    }
}

const EAGAIN_BACKOFF: Duration = Duration::from_millis(5);

#[cfg(target_os = "macos")]
const CAPTURE_FORMATS: &[&str] = &["avfoundation"];
#[cfg(not(target_os = "macos"))]
const CAPTURE_FORMATS: &[&str] = &["video4linux2", "v4l2"];

/// How long to wait before reading again, or `None` if the read error ends
/// the capture. EAGAIN means the device has no frame ready yet, which
/// avfoundation reports between every frame.
fn retry_delay(error: &ffmpeg_next::Error) -> Option<Duration> {
    match error {
        ffmpeg_next::Error::Other { errno } if *errno == ffmpeg_next::util::error::EAGAIN => {
            Some(EAGAIN_BACKOFF)
        }
        _ => None,
    }
}

fn device_path(camera_index: u32) -> String {
    if cfg!(target_os = "macos") {
        camera_index.to_string()
    } else {
        format!("/dev/video{camera_index}")
    }
}

/// Finds a registered capture demuxer whose (comma separated) name list
/// contains one of `names`.
fn find_input_format(names: &[&str]) -> Option<ffmpeg_next::format::Input> {
    ffmpeg_next::device::input::video()
        // Iterator yields a null-backed entry when no devices are compiled in
        .take_while(|format| unsafe { !format.as_ptr().is_null() })
        .find(|format| {
            format
                .name()
                .split(',')
                .any(|name| names.contains(&name.trim()))
        })
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg frames may have padding bytes at the end of each row (stride > width*3).
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
