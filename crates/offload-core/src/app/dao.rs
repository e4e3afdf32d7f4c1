//! S3Dao - 同期版 Backend Accessor
//!
//! BlobClient の put/get/delete を薄く包み、put には構築時に選んだ
//! 暗号化方式と ACL を適用します。エラーはログに残した上でそのまま返します。

use crate::app::config::OffloadConfig;
use crate::domain::encryption::SseStrategy;
use crate::domain::request::{ObjectCannedAcl, PutObjectRequest};
use crate::domain::size::payload_size_in_bytes;
use crate::ports::blob_client::{BlobClient, BlobError};

/// put リクエストの装飾（暗号化 + ACL）
///
/// 構築後は読み取り専用なので、複数スレッドから共有できる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PutOptions {
    pub(crate) sse: SseStrategy,
    pub(crate) acl: Option<ObjectCannedAcl>,
}

impl PutOptions {
    pub(crate) fn from_config(config: &OffloadConfig) -> Self {
        Self {
            sse: config.server_side_encryption().clone(),
            acl: config.object_canned_acl(),
        }
    }

    pub(crate) fn request(&self, bucket: &str, key: &str, content: &str) -> PutObjectRequest {
        let mut builder = PutObjectRequest::builder(bucket, key);
        builder
            .body(content.as_bytes())
            .content_length(payload_size_in_bytes(content));

        if let Some(acl) = self.acl {
            tracing::debug!(%acl, "Using canned ACL in put object request.");
            builder.acl(acl);
        }

        if !self.sse.is_none() {
            tracing::debug!("Using SSE-KMS in put object request.");
            self.sse.decorate(&mut builder);
        }

        builder.build()
    }
}

pub(crate) fn into_text(bucket: &str, key: &str, bytes: Vec<u8>) -> Result<String, BlobError> {
    String::from_utf8(bytes).map_err(|_| BlobError::InvalidContent {
        bucket: bucket.to_string(),
        key: key.to_string(),
    })
}

/// S3Dao は同期版のバックエンドアクセサ
///
/// # 使用例
/// ```ignore
/// let dao = S3Dao::with_options(client, SseStrategy::customer_key("kms-1"), None);
/// dao.store_text("bucket", "key", "payload")?;
/// ```
pub struct S3Dao<C> {
    client: C,
    options: PutOptions,
}

impl<C: BlobClient> S3Dao<C> {
    /// 暗号化なし・ACL なし
    pub fn new(client: C) -> Self {
        Self::with_options(client, SseStrategy::None, None)
    }

    pub fn with_options(client: C, sse: SseStrategy, acl: Option<ObjectCannedAcl>) -> Self {
        Self {
            client,
            options: PutOptions { sse, acl },
        }
    }

    pub fn from_config(client: C, config: &OffloadConfig) -> Self {
        Self {
            client,
            options: PutOptions::from_config(config),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store_text(&self, bucket: &str, key: &str, content: &str) -> Result<(), BlobError> {
        let request = self.options.request(bucket, key, content);
        self.client.put_object(request).inspect_err(|e| {
            tracing::error!(
                bucket,
                key,
                error = %e,
                "Failed to store the message content in an S3 object."
            );
        })
    }

    pub fn get_text(&self, bucket: &str, key: &str) -> Result<String, BlobError> {
        let bytes = self.client.get_object(bucket, key).inspect_err(|e| {
            tracing::error!(
                bucket,
                key,
                error = %e,
                "Failed to get the S3 object which contains the payload."
            );
        })?;
        into_text(bucket, key, bytes).inspect_err(|e| {
            tracing::error!(
                bucket,
                key,
                error = %e,
                "Failure when handling the message which was read from S3 object."
            );
        })
    }

    pub fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BlobError> {
        self.client.delete_object(bucket, key).inspect_err(|e| {
            tracing::error!(
                bucket,
                key,
                error = %e,
                "Failed to delete the S3 object which contains the payload."
            );
        })?;
        tracing::info!(bucket, key, "S3 object deleted.");
        Ok(())
    }

    /// 同じ bucket の複数キーを 1 回で削除（空なら何もしない）
    pub fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), BlobError> {
        if keys.is_empty() {
            return Ok(());
        }
        self.client.delete_objects(bucket, keys).inspect_err(|e| {
            tracing::error!(
                bucket,
                error = %e,
                "Failed to delete the S3 objects which contain the payloads."
            );
        })?;
        tracing::info!(bucket, keys = ?keys, "S3 objects deleted.");
        Ok(())
    }
}
