use crate::config::AppConfig;
use crate::services::storage::S3StorageService;
use aws_sdk_s3::config::{Credentials, Region};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn setup_storage(config: &AppConfig) -> Arc<S3StorageService> {
    let storage = &config.storage;
    let bucket = config.bucket_name.clone();

    info!(
        "☁️  S3 Storage: {} (Bucket: {})",
        storage.endpoint.as_deref().unwrap_or("provider default"),
        bucket
    );

    let mut loader = aws_config::from_env().region(Region::new(storage.region.clone()));

    if let Some(endpoint) = &storage.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    match (&storage.access_key, &storage.secret_key) {
        (Some(access_key), Some(secret_key)) => {
            loader = loader.credentials_provider(Credentials::new(
                access_key.clone(),
                secret_key.clone(),
                None,
                None,
                "static",
            ));
        }
        _ => info!("🔑 Using default credential chain"),
    }

    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(storage.force_path_style)
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);

    // The bucket is provisioned out of band; only report whether it is reachable
    match s3_client.head_bucket().bucket(&bucket).send().await {
        Ok(_) => info!("✅ Bucket '{}' is ready", bucket),
        Err(e) => warn!("⚠️  Bucket '{}' is not reachable yet: {}", bucket, e),
    }

    Arc::new(S3StorageService::new(
        s3_client,
        bucket,
        config.public_base_url(),
    ))
}
