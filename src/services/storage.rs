use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::path::Path;

/// Characters escaped when an object key becomes part of a URL path
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One entry of a bucket listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub public_url: String,
}

#[async_trait]
pub trait StorageService: Send + Sync {
    fn bucket(&self) -> &str;

    /// Lists every object whose key starts with `prefix`.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredObject>>;

    /// Uploads the local file at `path` to `key`, replacing any existing object.
    async fn upload_from_path(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<()>;

    async fn make_public(&self, key: &str) -> Result<()>;

    fn public_url(&self, key: &str) -> String;

    async fn ping(&self) -> Result<()>;
}

/// Joins a public base URL and an object key, escaping the key.
pub fn build_public_url(base_url: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        utf8_percent_encode(key, KEY_ENCODE_SET)
    )
}

pub struct S3StorageService {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3StorageService {
    pub fn new(client: Client, bucket: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredObject>> {
        let mut objects = Vec::new();
        let mut continuation_token = None;

        loop {
            let res = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token)
                .send()
                .await
                .with_context(|| format!("failed to list objects in bucket '{}'", self.bucket))?;

            if let Some(contents) = res.contents {
                for object in contents {
                    if let Some(key) = object.key {
                        objects.push(StoredObject {
                            public_url: self.public_url(&key),
                            key,
                        });
                    }
                }
            }

            if res.is_truncated.unwrap_or(false) {
                continuation_token = res.next_continuation_token;
            } else {
                break;
            }
        }

        Ok(objects)
    }

    async fn upload_from_path(
        &self,
        key: &str,
        path: &Path,
        content_type: Option<&str>,
    ) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("failed to read staged file {}", path.display()))?;

        let res = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .set_content_type(content_type.map(str::to_string))
            .body(body)
            .send()
            .await;

        if let Err(e) = res {
            tracing::error!(
                "S3 put_object failed: bucket={}, key={}, error={:?}",
                self.bucket,
                key,
                e
            );
            return Err(e.into());
        }
        Ok(())
    }

    async fn make_public(&self, key: &str) -> Result<()> {
        self.client
            .put_object_acl()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .with_context(|| format!("failed to make '{}' public", key))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        build_public_url(&self.public_base_url, key)
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .with_context(|| format!("bucket '{}' is not reachable", self.bucket))?;
        Ok(())
    }
}
