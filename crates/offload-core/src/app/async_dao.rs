//! S3AsyncDao - 非同期版 Backend Accessor
//!
//! S3Dao と同じ操作を future で返します。呼び出しごとにバックエンド呼び出しを
//! 1 つ発行するだけで、内部でキューイングや直列化はしません。

use crate::app::config::OffloadConfig;
use crate::app::dao::{PutOptions, into_text};
use crate::domain::encryption::SseStrategy;
use crate::domain::request::ObjectCannedAcl;
use crate::ports::blob_client::{AsyncBlobClient, BlobError};

pub struct S3AsyncDao<C> {
    client: C,
    options: PutOptions,
}

impl<C: AsyncBlobClient> S3AsyncDao<C> {
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

    pub async fn store_text(
        &self,
        bucket: &str,
        key: &str,
        content: &str,
    ) -> Result<(), BlobError> {
        let request = self.options.request(bucket, key, content);
        self.client.put_object(request).await.inspect_err(|e| {
            tracing::error!(
                bucket,
                key,
                error = %e,
                "Failed to store the message content in an S3 object."
            );
        })
    }

    pub async fn get_text(&self, bucket: &str, key: &str) -> Result<String, BlobError> {
        let bytes = self.client.get_object(bucket, key).await.inspect_err(|e| {
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

    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BlobError> {
        self.client
            .delete_object(bucket, key)
            .await
            .inspect_err(|e| {
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

    pub async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), BlobError> {
        if keys.is_empty() {
            return Ok(());
        }
        self.client
            .delete_objects(bucket, keys)
            .await
            .inspect_err(|e| {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::ServerSideEncryption;
    use crate::impls::inmem_blob::{BlobCall, InMemoryBlobClient};
    use std::sync::Arc;

    const BUCKET: &str = "test-bucket-name";
    const KEY: &str = "AnyS3key";
    const PAYLOAD: &str = "AnyPayload";

    #[tokio::test]
    async fn store_with_aws_managed_cmk_sets_kms_only() {
        let client = Arc::new(InMemoryBlobClient::new());
        let dao = S3AsyncDao::with_options(client.clone(), SseStrategy::aws_managed_cmk(), None);

        dao.store_text(BUCKET, KEY, PAYLOAD).await.unwrap();

        let puts = client.put_requests();
        assert_eq!(puts.len(), 1);
        assert_eq!(
            puts[0].server_side_encryption,
            Some(ServerSideEncryption::AwsKms)
        );
        assert_eq!(puts[0].ssekms_key_id, None);
        assert_eq!(puts[0].acl, None);
    }

    #[tokio::test]
    async fn from_config_applies_customer_key_and_acl() {
        let config = OffloadConfig::builder()
            .payload_support_enabled(BUCKET)
            .server_side_encryption(SseStrategy::customer_key("kms-1"))
            .object_canned_acl(ObjectCannedAcl::BucketOwnerFullControl)
            .build()
            .unwrap();
        let client = Arc::new(InMemoryBlobClient::new());
        let dao = S3AsyncDao::from_config(client.clone(), &config);

        dao.store_text(BUCKET, KEY, PAYLOAD).await.unwrap();

        let put = &client.put_requests()[0];
        assert_eq!(put.ssekms_key_id.as_deref(), Some("kms-1"));
        assert_eq!(put.acl, Some(ObjectCannedAcl::BucketOwnerFullControl));
    }

    #[tokio::test]
    async fn get_returns_stored_text() {
        let dao = S3AsyncDao::new(InMemoryBlobClient::new());
        dao.store_text(BUCKET, KEY, PAYLOAD).await.unwrap();
        assert_eq!(dao.get_text(BUCKET, KEY).await.unwrap(), PAYLOAD);
    }

    #[tokio::test]
    async fn get_failure_surfaces_through_future() {
        let client = Arc::new(InMemoryBlobClient::new());
        client.fail_next(BlobError::AccessDenied("no".to_string()));
        let dao = S3AsyncDao::new(client.clone());

        let err = dao.get_text(BUCKET, KEY).await.unwrap_err();
        assert_eq!(err, BlobError::AccessDenied("no".to_string()));
    }

    #[tokio::test]
    async fn delete_objects_issues_single_batch_call() {
        let client = Arc::new(InMemoryBlobClient::new());
        let dao = S3AsyncDao::new(client.clone());
        let keys = vec!["k1".to_string(), "k2".to_string()];

        dao.delete_objects(BUCKET, &keys).await.unwrap();

        assert_eq!(
            client.calls(),
            vec![BlobCall::DeleteObjects {
                bucket: BUCKET.to_string(),
                keys,
            }]
        );
    }
}
