//! S3BackedPayloadStoreAsync - 非同期版 PayloadStore
//!
//! 同期版と同じ操作・同じエラー条件を future で返します。
//! ポインタのデコード失敗もバックエンド起因の失敗も、同じく future の Err として返ります。

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::app::async_dao::S3AsyncDao;
use crate::app::config::OffloadConfig;
use crate::app::grouping::plan_batch_delete;
use crate::domain::errors::OffloadError;
use crate::domain::pointer::PayloadPointer;
use crate::ports::blob_client::AsyncBlobClient;
use crate::ports::key_generator::{KeyGenerator, UuidKeyGenerator};
use crate::ports::payload_store::PayloadStoreAsync;

pub struct S3BackedPayloadStoreAsync<C> {
    bucket_name: String,
    dao: S3AsyncDao<C>,
    key_generator: Box<dyn KeyGenerator>,
}

impl<C: AsyncBlobClient> S3BackedPayloadStoreAsync<C> {
    pub fn new(dao: S3AsyncDao<C>, bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            dao,
            key_generator: Box::new(UuidKeyGenerator),
        }
    }

    pub fn from_config(client: C, config: &OffloadConfig) -> Result<Self, OffloadError> {
        let bucket_name = config.require_bucket_name()?.to_string();
        let dao = S3AsyncDao::from_config(client, config);
        Ok(Self::new(dao, bucket_name))
    }

    pub fn with_key_generator(mut self, key_generator: impl KeyGenerator + 'static) -> Self {
        self.key_generator = Box::new(key_generator);
        self
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn dao(&self) -> &S3AsyncDao<C> {
        &self.dao
    }
}

#[async_trait]
impl<C: AsyncBlobClient> PayloadStoreAsync for S3BackedPayloadStoreAsync<C> {
    async fn store_original_payload(&self, payload: &str) -> Result<String, OffloadError> {
        let key = self.key_generator.generate_key();
        self.store_original_payload_with_key(payload, &key).await
    }

    async fn store_original_payload_with_key(
        &self,
        payload: &str,
        key: &str,
    ) -> Result<String, OffloadError> {
        let pointer = PayloadPointer::new(self.bucket_name.as_str(), key)?;
        let (bucket, key) = (pointer.bucket_name(), pointer.key());
        self.dao.store_text(bucket, key, payload).await?;
        tracing::info!(bucket, key, "S3 object created.");
        pointer.to_json()
    }

    async fn get_original_payload(&self, payload_pointer: &str) -> Result<String, OffloadError> {
        let pointer = PayloadPointer::from_json(payload_pointer)?;
        let (bucket, key) = (pointer.bucket_name(), pointer.key());
        let payload = self.dao.get_text(bucket, key).await?;
        tracing::info!(bucket, key, "S3 object read.");
        Ok(payload)
    }

    async fn delete_original_payload(&self, payload_pointer: &str) -> Result<(), OffloadError> {
        let pointer = PayloadPointer::from_json(payload_pointer)?;
        let (bucket, key) = (pointer.bucket_name(), pointer.key());
        self.dao.delete_object(bucket, key).await?;
        Ok(())
    }

    /// bucket ごとの削除を並行に発行し、全て完了する（または 1 つ失敗する）まで待つ
    ///
    /// 返り値の future を drop すると、まだ完了していない bucket の削除も drop される。
    async fn delete_original_payloads(
        &self,
        payload_pointers: &[String],
    ) -> Result<(), OffloadError> {
        if payload_pointers.is_empty() {
            return Ok(());
        }
        let batches = plan_batch_delete(payload_pointers)?;
        let deletes = batches
            .iter()
            .map(|batch| self.dao.delete_objects(&batch.bucket, &batch.keys));
        try_join_all(deletes).await?;
        Ok(())
    }
}
