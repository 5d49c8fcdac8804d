use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file part in the request")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Payload Too Large: {0}")]
    PayloadTooLarge(String),

    #[error("An error occurred while listing images.")]
    ListingFailed(#[source] anyhow::Error),

    #[error("An error occurred: {0:#}")]
    UploadFailed(anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NoFilePart | AppError::NoSelectedFile | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ListingFailed(_) | AppError::UploadFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::ListingFailed(e) => tracing::error!("Error listing objects: {:?}", e),
            AppError::UploadFailed(e) => tracing::error!("Error during file upload: {:?}", e),
            _ => {}
        }

        (self.status(), self.to_string()).into_response()
    }
}
