#![allow(dead_code)]

use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use image_gallery::config::AppConfig;
use image_gallery::services::storage::{StorageService, StoredObject, build_public_url};
use image_gallery::{AppState, create_app};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";
pub const BUCKET: &str = "gallery-bucket";

pub struct MemoryStorage {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
    public: Mutex<HashSet<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            public: Mutex::new(HashSet::new()),
        }
    }

    pub fn insert(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn is_public(&self, key: &str) -> bool {
        self.public.lock().unwrap().contains(key)
    }
}

#[async_trait]
impl StorageService for MemoryStorage {
    fn bucket(&self) -> &str {
        BUCKET
    }

    async fn list_objects(&self, prefix: &str) -> anyhow::Result<Vec<StoredObject>> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .map(|key| StoredObject {
                key: key.clone(),
                public_url: self.public_url(key),
            })
            .collect())
    }

    async fn upload_from_path(
        &self,
        key: &str,
        path: &Path,
        _content_type: Option<&str>,
    ) -> anyhow::Result<()> {
        let data = tokio::fs::read(path).await?;
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn make_public(&self, key: &str) -> anyhow::Result<()> {
        if !self.objects.lock().unwrap().contains_key(key) {
            return Err(anyhow!("no such object: {}", key));
        }
        self.public.lock().unwrap().insert(key.to_string());
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        build_public_url(&format!("https://storage.test/{}", BUCKET), key)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Storage whose every remote call fails, as with revoked credentials
pub struct FailingStorage;

#[async_trait]
impl StorageService for FailingStorage {
    fn bucket(&self) -> &str {
        BUCKET
    }

    async fn list_objects(&self, _prefix: &str) -> anyhow::Result<Vec<StoredObject>> {
        Err(anyhow!("storage unavailable"))
    }

    async fn upload_from_path(
        &self,
        _key: &str,
        _path: &Path,
        _content_type: Option<&str>,
    ) -> anyhow::Result<()> {
        Err(anyhow!("storage unavailable"))
    }

    async fn make_public(&self, _key: &str) -> anyhow::Result<()> {
        Err(anyhow!("storage unavailable"))
    }

    fn public_url(&self, key: &str) -> String {
        build_public_url("https://storage.test/unused", key)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Err(anyhow!("storage unavailable"))
    }
}

pub struct TestApp {
    pub router: axum::Router,
    pub staging: TempDir,
}

impl TestApp {
    pub fn new(storage: Arc<dyn StorageService>) -> Self {
        Self::with_config(storage, AppConfig::default())
    }

    /// Builds the app with `config`, staging into a fresh temporary folder
    pub fn with_config(storage: Arc<dyn StorageService>, config: AppConfig) -> Self {
        let _ = tracing_subscriber::fmt::try_init();
        let staging = tempfile::tempdir().unwrap();
        let config = AppConfig {
            upload_folder: staging.path().join("uploads"),
            ..config
        };
        let router = create_app(AppState::new(storage, config));
        Self { router, staging }
    }

    /// Number of entries left in the upload folder
    pub fn staged_entries(&self) -> usize {
        match std::fs::read_dir(self.staging.path().join("uploads")) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }
}

pub fn file_part(field: &str, filename: Option<&str>, content: &str) -> String {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
        None => format!("form-data; name=\"{}\"", field),
    };
    format!(
        "--{boundary}\r\n\
        Content-Disposition: {disposition}\r\n\
        Content-Type: text/plain\r\n\r\n\
        {content}\r\n",
        boundary = BOUNDARY,
        disposition = disposition,
        content = content
    )
}

pub fn upload_request(parts: &[String]) -> Request<Body> {
    let body = format!("{}--{}--\r\n", parts.concat(), BOUNDARY);
    multipart_request(Body::from(body))
}

/// POST `/upload` with the multipart content type and an arbitrary body
pub fn multipart_request(body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(body)
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: axum::response::Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&body).to_string()
}
