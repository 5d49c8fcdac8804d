use std::env;
use std::path::PathBuf;

/// Application configuration for the gallery service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bucket holding uploaded images (default: "images-uploads-bucket")
    pub bucket_name: String,

    /// Key prefix used for uploads and listing (default: "images/")
    pub image_prefix: String,

    /// Root directory for per-request staging files (default: <tmp>/image-gallery)
    pub upload_folder: PathBuf,

    /// Maximum request body size in bytes (default: 256 MB)
    pub max_upload_size: usize,

    pub storage: StorageConfig,
}

/// Connection settings for the S3-compatible object store
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Custom endpoint, e.g. a MinIO or GCS interoperability URL
    pub endpoint: Option<String>,

    pub region: String,

    /// Static credentials. When absent the SDK default credential chain is used.
    pub access_key: Option<String>,
    pub secret_key: Option<String>,

    pub force_path_style: bool,

    /// Base URL that public object URLs are built from
    pub public_base_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: "us-east-1".to_string(),
            access_key: None,
            secret_key: None,
            force_path_style: false,
            public_base_url: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bucket_name: "images-uploads-bucket".to_string(),
            image_prefix: "images/".to_string(),
            upload_folder: env::temp_dir().join("image-gallery"),
            max_upload_size: 256 * 1024 * 1024, // 256 MB
            storage: StorageConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint = non_empty("S3_ENDPOINT");
        let force_path_style = non_empty("S3_FORCE_PATH_STYLE")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(endpoint.is_some());

        Self {
            bucket_name: non_empty("BUCKET_NAME").unwrap_or(default.bucket_name),

            image_prefix: normalize_prefix(
                &non_empty("IMAGE_PREFIX").unwrap_or(default.image_prefix),
            ),

            upload_folder: non_empty("UPLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or(default.upload_folder),

            max_upload_size: non_empty("MAX_UPLOAD_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            storage: StorageConfig {
                endpoint,
                region: non_empty("S3_REGION").unwrap_or(default.storage.region),
                access_key: non_empty("S3_ACCESS_KEY"),
                secret_key: non_empty("S3_SECRET_KEY"),
                force_path_style,
                public_base_url: non_empty("PUBLIC_BASE_URL"),
            },
        }
    }

    /// Base URL under which objects of the configured bucket are publicly reachable.
    pub fn public_base_url(&self) -> String {
        if let Some(base) = &self.storage.public_base_url {
            return base.trim_end_matches('/').to_string();
        }

        match &self.storage.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket_name),
            None => format!(
                "https://{}.s3.{}.amazonaws.com",
                self.bucket_name, self.storage.region
            ),
        }
    }
}

/// Prefixes always end in a single `/` so keys read `images/<filename>`
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]);
        assert_eq!(config.bucket_name, "images-uploads-bucket");
        assert_eq!(config.image_prefix, "images/");
        assert_eq!(config.max_upload_size, 256 * 1024 * 1024);
        assert!(config.storage.endpoint.is_none());
        assert!(!config.storage.force_path_style);
    }

    #[test]
    fn test_prefix_is_normalized() {
        assert_eq!(config_from(&[("IMAGE_PREFIX", "photos")]).image_prefix, "photos/");
        assert_eq!(config_from(&[("IMAGE_PREFIX", "/a/b//")]).image_prefix, "a/b/");
        assert_eq!(config_from(&[("IMAGE_PREFIX", "/")]).image_prefix, "");
    }

    #[test]
    fn test_endpoint_enables_path_style() {
        let config = config_from(&[("S3_ENDPOINT", "http://127.0.0.1:9000")]);
        assert!(config.storage.force_path_style);

        let config = config_from(&[
            ("S3_ENDPOINT", "http://127.0.0.1:9000"),
            ("S3_FORCE_PATH_STYLE", "false"),
        ]);
        assert!(!config.storage.force_path_style);
    }

    #[test]
    fn test_public_base_url() {
        let config = config_from(&[("BUCKET_NAME", "pics")]);
        assert_eq!(config.public_base_url(), "https://pics.s3.us-east-1.amazonaws.com");

        let config = config_from(&[
            ("BUCKET_NAME", "pics"),
            ("S3_ENDPOINT", "https://storage.googleapis.com/"),
        ]);
        assert_eq!(config.public_base_url(), "https://storage.googleapis.com/pics");

        let config = config_from(&[
            ("S3_ENDPOINT", "http://127.0.0.1:9000"),
            ("PUBLIC_BASE_URL", "https://cdn.example.com/"),
        ]);
        assert_eq!(config.public_base_url(), "https://cdn.example.com");
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("MAX_UPLOAD_SIZE", "lots")]);
        assert_eq!(config.max_upload_size, 256 * 1024 * 1024);
    }
}
