//! # S3互換 オブジェクトストレージ実装
//!
//! AWS S3, MinIO, Cloudflare R2 等のS3互換APIを使用するオブジェクトストレージ実装。

use http_02::header::CONTENT_TYPE;
use http_02::{HeaderMap, HeaderValue};

use super::{ListPage, ObjectLocator, ObjectStore, StorageError, UploadPayload};
use crate::config::StorageConfig;

/// S3互換ストレージによるオブジェクトストレージ実装。
pub struct S3ObjectStore {
    /// 認証情報が未設定の場合はNone。全操作が `NoCredentials` で失敗する。
    bucket: Option<s3::Bucket>,
    bucket_name: String,
    region: String,
    endpoint: Option<String>,
}

impl S3ObjectStore {
    /// 設定からバケットを初期化する。
    ///
    /// 認証情報がなくても起動は継続し、リクエストごとにエラーを返す。
    pub fn new(config: &StorageConfig) -> anyhow::Result<Self> {
        let bucket = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => {
                Some(Self::init_bucket(config, access_key, secret_key)?)
            }
            _ => {
                tracing::warn!(
                    bucket = %config.bucket,
                    "AWS_ACCESS_KEY / AWS_SECRET_KEY が未設定です。ストレージ操作はすべて失敗します"
                );
                None
            }
        };

        Ok(Self {
            bucket,
            bucket_name: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    fn init_bucket(
        config: &StorageConfig,
        access_key: &str,
        secret_key: &str,
    ) -> anyhow::Result<s3::Bucket> {
        let region = match &config.endpoint {
            Some(endpoint) => {
                tracing::info!(s3_endpoint = %endpoint, "S3互換エンドポイントを使用");
                s3::Region::Custom {
                    region: config.region.clone(),
                    endpoint: endpoint.clone(),
                }
            }
            None => config.region.parse::<s3::Region>()?,
        };

        let credentials = s3::creds::Credentials::new(
            Some(access_key),
            Some(secret_key),
            None,
            None,
            None,
        )?;

        let bucket = s3::Bucket::new(&config.bucket, region, credentials)?;
        // S3互換エンドポイントはパス形式でアドレスする
        let bucket = if config.endpoint.is_some() {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(*bucket)
    }

    fn bucket(&self) -> Result<&s3::Bucket, StorageError> {
        self.bucket.as_ref().ok_or(StorageError::NoCredentials)
    }
}

fn backend_err(e: s3::error::S3Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

fn check_status(operation: &str, status: u16) -> Result<(), StorageError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(StorageError::Backend(format!(
            "{operation} failed with HTTP status {status}"
        )))
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn presign_put(
        &self,
        key: &str,
        expiry_secs: u32,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let bucket = self.bucket()?;

        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(content_type)
            .map_err(|e| StorageError::Backend(format!("invalid content type: {e}")))?;
        headers.insert(CONTENT_TYPE, value);

        bucket
            .presign_put(key, expiry_secs, Some(headers), None)
            .await
            .map_err(backend_err)
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError> {
        self.bucket()?
            .presign_get(key, expiry_secs, None)
            .await
            .map_err(backend_err)
    }

    async fn put_object(
        &self,
        key: &str,
        payload: &mut UploadPayload,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .bucket()?
            .put_object_stream_with_content_type(payload, key, content_type)
            .await
            .map_err(backend_err)?;
        check_status("PutObject", response.status_code())
    }

    async fn list_page(
        &self,
        continuation_token: Option<String>,
    ) -> Result<ListPage, StorageError> {
        let (result, status) = self
            .bucket()?
            .list_page(String::new(), None, continuation_token, None, None)
            .await
            .map_err(backend_err)?;
        check_status("ListObjectsV2", status)?;

        let keys = result.contents.into_iter().map(|object| object.key).collect();
        let next_continuation_token = if result.is_truncated {
            result.next_continuation_token
        } else {
            None
        };

        Ok(ListPage {
            keys,
            next_continuation_token,
        })
    }

    fn locate(&self, key: &str) -> ObjectLocator {
        ObjectLocator {
            bucket: self.bucket_name.clone(),
            region: self.region.clone(),
            key: key.to_string(),
            endpoint: self.endpoint.clone(),
        }
    }
}
