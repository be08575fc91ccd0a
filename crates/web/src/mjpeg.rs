use std::convert::Infallible;

use axum::body::Body;
use bytes::{BufMut, Bytes, BytesMut};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use facematch_core::pipeline::stream_faces_use_case::StreamFacesUseCase;

pub const BOUNDARY: &str = "frame";
pub const CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Parts buffered between the capture thread and the HTTP connection.
/// Kept small so a slow client throttles the camera loop.
const CHANNEL_CAPACITY: usize = 2;

/// Wrap one encoded JPEG as a multipart part:
/// `--frame\r\nContent-Type: image/jpeg\r\n\r\n<bytes>\r\n`.
pub fn frame_part(jpeg: &[u8]) -> Bytes {
    let header = format!(
        "--{BOUNDARY}\r\nContent-Type: {}\r\n\r\n",
        mime::IMAGE_JPEG.as_ref()
    );
    let mut part = BytesMut::with_capacity(header.len() + jpeg.len() + 2);
    part.put_slice(header.as_bytes());
    part.put_slice(jpeg);
    part.put_slice(b"\r\n");
    part.freeze()
}

/// Drive `use_case` on a blocking thread and expose its frames as a
/// streaming response body.
///
/// When the client goes away the receiver is dropped, the next send fails
/// and the use case is dropped, which releases the camera.
pub fn stream_body(use_case: StreamFacesUseCase) -> Body {
    let (tx, rx) = mpsc::channel::<Result<Bytes, Infallible>>(CHANNEL_CAPACITY);

    tokio::task::spawn_blocking(move || {
        for jpeg in use_case {
            if tx.blocking_send(Ok(frame_part(&jpeg))).is_err() {
                log::info!("Stream client disconnected");
                break;
            }
        }
    });

    Body::from_stream(ReceiverStream::new(rx))
}
