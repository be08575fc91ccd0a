use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;

use facematch_core::pipeline::register_reference_use_case::RegistrationOutcome;

use crate::error::AppError;
use crate::mjpeg;
use crate::state::AppState;
use crate::upload_storage::save_upload;

const INDEX_HTML: &str = include_str!("../templates/index.html");
const UPLOAD_FIELD: &str = "image";
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index).post(upload))
        .route("/video_feed/", get(video_feed))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Store the uploaded photo and make its first face the reference.
/// The page is rendered whether or not a face was found.
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<&'static str>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
        else {
            continue;
        };
        let data = field.bytes().await?;

        let path = save_upload(&state.media_dir, &file_name, &data).await?;
        log::info!("Saved upload to {} ({} bytes)", path.display(), data.len());

        let registration = Arc::clone(&state.registration);
        let outcome = tokio::task::spawn_blocking(move || {
            registration.execute(&data).map_err(|e| e.to_string())
        })
        .await?
        .map_err(AppError::Registration)?;

        if let RegistrationOutcome::Registered { faces } = outcome {
            log::debug!("Registration used 1 of {faces} face(s)");
        }
        break;
    }
    Ok(Html(INDEX_HTML))
}

async fn video_feed(State(state): State<AppState>) -> impl IntoResponse {
    log::info!("Stream client connected");
    let body = mjpeg::stream_body(state.stream_use_case());
    ([(header::CONTENT_TYPE, mjpeg::CONTENT_TYPE)], body)
}
