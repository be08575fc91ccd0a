pub mod ffmpeg_camera_reader;
pub mod image_frame_decoder;
pub mod jpeg_frame_encoder;
