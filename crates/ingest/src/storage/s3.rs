//! # S3互換オブジェクトストア実装
//!
//! AWS S3, MinIO 等のS3互換APIに画像を公開読み取り（`public-read`）で保存する。

use std::path::Path;

use super::{ObjectStore, StoreError};
use crate::config::{ConfigError, StoreConfig};

/// S3互換ストレージによるObjectStore実装。
pub struct S3ObjectStore {
    bucket: s3::Bucket,
}

impl S3ObjectStore {
    /// 構築済みバケットから作成する。
    pub fn new(bucket: s3::Bucket) -> Self {
        Self { bucket }
    }

    /// 設定からバケットを初期化する。
    ///
    /// アクセスキーが無い場合は署名なし（匿名）リクエストを使う。
    /// カスタムエンドポイント（MinIO等）の場合はパススタイルでアクセスする。
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let region = s3::Region::Custom {
            region: config.region.clone(),
            endpoint: config.resolved_endpoint(),
        };

        let credentials = match (&config.access_key, &config.secret_key) {
            (Some(access_key), Some(secret_key)) => s3::creds::Credentials::new(
                Some(access_key.as_str()),
                Some(secret_key.as_str()),
                None,
                None,
                None,
            ),
            _ => s3::creds::Credentials::anonymous(),
        }
        .map_err(|e| ConfigError::Store(format!("認証情報の構築に失敗: {e}")))?;

        let bucket = s3::Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| ConfigError::Store(format!("バケットの初期化に失敗: {e}")))?;
        let mut bucket = if config.endpoint.is_some() {
            tracing::info!(
                s3_endpoint = %config.resolved_endpoint(),
                "カスタムS3エンドポイントを使用（パススタイル）"
            );
            *bucket.with_path_style()
        } else {
            *bucket
        };
        bucket.add_header("x-amz-acl", "public-read");

        Ok(Self::new(bucket))
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let content = tokio::fs::read(local_path)
            .await
            .map_err(|source| StoreError::ReadLocal {
                path: local_path.display().to_string(),
                source,
            })?;

        let response = self
            .bucket
            .put_object_with_content_type(key, &content, content_type)
            .await
            .map_err(|e| StoreError::Upload(e.to_string()))?;

        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StoreError::Upload(format!(
                "S3 respondió HTTP {status}: {}",
                String::from_utf8_lossy(response.as_slice())
            )));
        }

        tracing::debug!(
            bucket = %self.bucket.name(),
            key = %key,
            bytes = content.len(),
            "S3へのアップロード完了"
        );
        Ok(())
    }
}
