pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::gallery_service::GalleryService;
use crate::services::storage::StorageService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::gallery::index,
        api::handlers::gallery::upload_image,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::gallery::UploadForm,
            api::handlers::health::HealthResponse,
            models::UploadedImage,
        )
    ),
    tags(
        (name = "gallery", description = "Image upload and listing"),
        (name = "system", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageService>,
    pub gallery: Arc<GalleryService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageService>, config: AppConfig) -> Self {
        let gallery = Arc::new(GalleryService::new(storage.clone(), config.clone()));
        Self {
            storage,
            gallery,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::http::Request<_>| {
            let request_id = request
                .headers()
                .get(api::middleware::request_id::REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        })
        .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
            info!("📥 {} {}", request.method(), request.uri());
        })
        .on_response(
            |response: &axum::http::Response<_>,
             latency: std::time::Duration,
             _span: &tracing::Span| {
                info!(
                    "📤 Finished in {:?} with status {}",
                    latency,
                    response.status()
                );
            },
        );

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::gallery::index))
        .route("/upload", post(api::handlers::gallery::upload_image))
        .route("/health", get(api::handlers::health::health_check))
        .layer(DefaultBodyLimit::max(state.config.max_upload_size))
        .layer(trace_layer)
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .with_state(state)
}
