//! S3-compatible object storage backend.
//!
//! Works against AWS S3 as well as MinIO and other S3-compatible
//! stores via a custom endpoint with path-style addressing.

use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::primitives::ByteStream;
use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::backend::{StorageBackend, StoredObject, sanitize_filename};
use crate::error::StorageError;

/// Connection settings for the object store.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for MinIO/LocalStack; AWS when unset.
    pub endpoint_url: Option<String>,
    /// Path-style addressing, required by MinIO.
    pub force_path_style: bool,
}

/// S3 storage backend. The client handshake is deferred to the first
/// operation and performed at most once.
pub struct S3Storage {
    config: S3Config,
    client: OnceCell<Client>,
}

impl S3Storage {
    pub fn new(config: S3Config) -> Self {
        Self {
            config,
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                let aws_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(aws_config::Region::new(self.config.region.clone()))
                    .load()
                    .await;

                let mut builder = S3ConfigBuilder::from(&aws_config);
                if let Some(endpoint_url) = &self.config.endpoint_url {
                    builder = builder.endpoint_url(endpoint_url);
                }
                if self.config.force_path_style {
                    builder = builder.force_path_style(true);
                }

                info!(
                    bucket = %self.config.bucket,
                    region = %self.config.region,
                    "S3 storage initialized"
                );

                Client::from_conf(builder.build())
            })
            .await
    }

    /// Public URL of a stored object: path-style against a custom
    /// endpoint, virtual-hosted against AWS.
    fn object_url(&self, path: &str) -> String {
        match &self.config.endpoint_url {
            Some(endpoint) => {
                let endpoint = endpoint.trim_end_matches('/');
                format!("{endpoint}/{}/{path}", self.config.bucket)
            }
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{path}",
                self.config.bucket, self.config.region
            ),
        }
    }
}

impl StorageBackend for S3Storage {
    async fn put(
        &self,
        key: &str,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredObject, StorageError> {
        let name = sanitize_filename(filename)?;
        let stored = format!("{}_{}", Utc::now().timestamp_millis(), name);
        let path = format!("{key}/{stored}");

        debug!(path = %path, size_bytes = bytes.len(), "Uploading object to S3");

        self.client()
            .await
            .put_object()
            .bucket(&self.config.bucket)
            .key(&path)
            .content_type(content_type)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError::backend("s3", &path, e))?;

        let url = self.object_url(&path);

        Ok(StoredObject {
            path,
            filename: stored,
            url: Some(url),
        })
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let result = self
            .client()
            .await
            .get_object()
            .bucket(&self.config.bucket)
            .key(path)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                let service = err.into_service_error();
                if service.is_no_such_key() {
                    return Err(StorageError::NotFound { path: path.into() });
                }
                return Err(StorageError::backend("s3", path, service));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::backend("s3", path, e))?;
        Ok(data.into_bytes().to_vec())
    }

    async fn delete(&self, path: &str) -> Result<(), StorageError> {
        self.client()
            .await
            .delete_object()
            .bucket(&self.config.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| StorageError::backend("s3", path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: Option<&str>) -> S3Config {
        S3Config {
            bucket: "inspectra-media".into(),
            region: "us-east-1".into(),
            endpoint_url: endpoint.map(Into::into),
            force_path_style: endpoint.is_some(),
        }
    }

    #[test]
    fn object_url_is_path_style_for_custom_endpoint() {
        let storage = S3Storage::new(config(Some("http://localhost:9000/")));
        assert_eq!(
            storage.object_url("acme/cam-1/2026/08/25/x.jpg"),
            "http://localhost:9000/inspectra-media/acme/cam-1/2026/08/25/x.jpg"
        );
    }

    #[test]
    fn object_url_is_virtual_hosted_for_aws() {
        let storage = S3Storage::new(config(None));
        assert_eq!(
            storage.object_url("acme/x.jpg"),
            "https://inspectra-media.s3.us-east-1.amazonaws.com/acme/x.jpg"
        );
    }
}
