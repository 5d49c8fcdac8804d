use crate::AppState;
use crate::api::error::AppError;
use crate::api::templates::render_index;
use crate::models::UploadedImage;
use axum::{
    extract::{Multipart, State, multipart::MultipartError, multipart::MultipartRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use utoipa::ToSchema;

/// Form accepted by `POST /upload`
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Upload form and list of uploaded images", content_type = "text/html", body = String),
        (status = 500, description = "Listing the bucket failed", content_type = "text/plain", body = String)
    ),
    tag = "gallery"
)]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let images = state
        .gallery
        .list_images()
        .await
        .map_err(AppError::ListingFailed)?;

    Ok(Html(render_index(&images)))
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data", description = "Image to upload"),
    responses(
        (status = 302, description = "Uploaded, redirects to the listing"),
        (status = 400, description = "No file part or no selected file", content_type = "text/plain", body = String),
        (status = 500, description = "Staging, upload or visibility change failed", content_type = "text/plain", body = String)
    ),
    tag = "gallery"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!("Upload without a multipart body: {}", rejection);
            return Err(AppError::NoFilePart);
        }
    };

    let result: Result<UploadedImage, AppError> = async {
        while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
            if field.name() != Some("file") {
                continue;
            }
            // A `file` field without a filename parameter is a plain form value
            let Some(filename) = field.file_name().map(str::to_string) else {
                continue;
            };
            if filename.is_empty() {
                return Err(AppError::NoSelectedFile);
            }

            let content_type = field.content_type().map(str::to_string);
            let reader = StreamReader::new(field.map_err(std::io::Error::other));

            let staged = state
                .gallery
                .stage_upload(&filename, content_type, reader)
                .await
                .map_err(staging_error)?;

            return state
                .gallery
                .publish(staged)
                .await
                .map_err(AppError::UploadFailed);
        }

        Err(AppError::NoFilePart)
    }
    .await;

    match result {
        Ok(_) => Ok((StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()),
        Err(e) => {
            // Consume the rest of the body so the browser sees the response instead of a reset
            tracing::warn!("Upload failed: {}. Consuming remaining stream...", e);
            while let Ok(Some(mut field)) = multipart.next_field().await {
                while let Ok(Some(_)) = field.chunk().await {}
            }
            Err(e)
        }
    }
}

fn map_multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the maximum allowed limit".to_string())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// The body limit can also trip while the file content streams to disk; the
/// multipart error then arrives wrapped in the copy's `io::Error`.
fn staging_error(err: anyhow::Error) -> AppError {
    let too_large = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<std::io::Error>())
        .filter_map(|io_err| io_err.get_ref())
        .filter_map(|inner| inner.downcast_ref::<MultipartError>())
        .any(|multipart_err| multipart_err.status() == StatusCode::PAYLOAD_TOO_LARGE);

    if too_large {
        AppError::PayloadTooLarge("Request body exceeds the maximum allowed limit".to_string())
    } else {
        AppError::UploadFailed(err)
    }
}
