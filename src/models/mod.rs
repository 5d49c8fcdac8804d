use serde::Serialize;
use utoipa::ToSchema;

/// An image stored in the bucket, as shown on the listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UploadedImage {
    /// Full object key, e.g. `images/cat.png`
    pub filename: String,
    pub url: String,
}
