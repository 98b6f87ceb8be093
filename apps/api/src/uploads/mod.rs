//! Presigned direct-to-S3 uploads, so large resume batches need not pass
//! through this service.

use std::time::Duration;

use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use tracing::info;

use crate::config::S3Settings;
use crate::errors::AppError;

pub mod handlers;

pub const PRESIGN_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Clone)]
pub struct UploadStorage {
    pub client: aws_sdk_s3::Client,
    pub bucket: String,
}

/// Constructs an S3 client for MinIO (custom endpoint) or AWS.
/// Static credentials are used when both keys are set, otherwise the default chain.
pub async fn build_upload_storage(settings: &S3Settings) -> UploadStorage {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()));
    if let (Some(key_id), Some(secret)) = (&settings.access_key_id, &settings.secret_access_key) {
        loader = loader.credentials_provider(Credentials::new(
            key_id,
            secret,
            None,
            None,
            "shortlist-static",
        ));
    }
    if let Some(endpoint) = &settings.endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    let sdk_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(settings.endpoint.is_some())
        .build();
    info!("S3 uploads enabled for bucket '{}'", settings.bucket);

    UploadStorage {
        client: aws_sdk_s3::Client::from_conf(s3_config),
        bucket: settings.bucket.clone(),
    }
}

impl UploadStorage {
    /// Presigned `PUT` URL for `key`, valid for `PRESIGN_TTL`.
    pub async fn presign_upload(&self, key: &str, content_type: &str) -> Result<String, AppError> {
        let presigning =
            PresigningConfig::expires_in(PRESIGN_TTL).map_err(|e| AppError::S3(e.to_string()))?;
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| AppError::S3(e.to_string()))?;
        Ok(request.uri().to_string())
    }
}
