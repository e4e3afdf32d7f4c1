//! S3BackedPayloadStore - 同期版 PayloadStore
//!
//! キーの決定 → Dao で保存 → ポインタのエンコード、をまとめます。
//! 読み出し・削除はその逆で、ポインタのデコードは必ずバックエンド呼び出しより先に行います。

use crate::app::config::OffloadConfig;
use crate::app::dao::S3Dao;
use crate::app::grouping::plan_batch_delete;
use crate::domain::errors::OffloadError;
use crate::domain::pointer::PayloadPointer;
use crate::ports::blob_client::BlobClient;
use crate::ports::key_generator::{KeyGenerator, UuidKeyGenerator};
use crate::ports::payload_store::PayloadStore;

/// S3BackedPayloadStore は bucket 名と Dao だけを持つステートレスなストア
///
/// # 使用例
/// ```ignore
/// let store = S3BackedPayloadStore::new(S3Dao::new(client), "my-bucket");
/// let pointer = store.store_original_payload(&body)?;
/// let body = store.get_original_payload(&pointer)?;
/// ```
pub struct S3BackedPayloadStore<C> {
    bucket_name: String,
    dao: S3Dao<C>,
    key_generator: Box<dyn KeyGenerator>,
}

impl<C: BlobClient> S3BackedPayloadStore<C> {
    pub fn new(dao: S3Dao<C>, bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            dao,
            key_generator: Box::new(UuidKeyGenerator),
        }
    }

    /// 設定から Dao とストアを組み立てる（payload support 無効なら Config エラー）
    pub fn from_config(client: C, config: &OffloadConfig) -> Result<Self, OffloadError> {
        let bucket_name = config.require_bucket_name()?.to_string();
        let dao = S3Dao::from_config(client, config);
        Ok(Self::new(dao, bucket_name))
    }

    /// キー生成器を差し替える（デフォルトは UUID v4）
    pub fn with_key_generator(mut self, key_generator: impl KeyGenerator + 'static) -> Self {
        self.key_generator = Box::new(key_generator);
        self
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn dao(&self) -> &S3Dao<C> {
        &self.dao
    }
}

impl<C: BlobClient> PayloadStore for S3BackedPayloadStore<C> {
    fn store_original_payload(&self, payload: &str) -> Result<String, OffloadError> {
        let key = self.key_generator.generate_key();
        self.store_original_payload_with_key(payload, &key)
    }

    fn store_original_payload_with_key(
        &self,
        payload: &str,
        key: &str,
    ) -> Result<String, OffloadError> {
        let pointer = PayloadPointer::new(self.bucket_name.as_str(), key)?;
        let (bucket, key) = (pointer.bucket_name(), pointer.key());
        self.dao.store_text(bucket, key, payload)?;
        tracing::info!(bucket, key, "S3 object created.");
        pointer.to_json()
    }

    fn get_original_payload(&self, payload_pointer: &str) -> Result<String, OffloadError> {
        let pointer = PayloadPointer::from_json(payload_pointer)?;
        let (bucket, key) = (pointer.bucket_name(), pointer.key());
        let payload = self.dao.get_text(bucket, key)?;
        tracing::info!(bucket, key, "S3 object read.");
        Ok(payload)
    }

    fn delete_original_payload(&self, payload_pointer: &str) -> Result<(), OffloadError> {
        let pointer = PayloadPointer::from_json(payload_pointer)?;
        let (bucket, key) = (pointer.bucket_name(), pointer.key());
        self.dao.delete_object(bucket, key)?;
        Ok(())
    }

    fn delete_original_payloads(&self, payload_pointers: &[String]) -> Result<(), OffloadError> {
        if payload_pointers.is_empty() {
            return Ok(());
        }
        for batch in plan_batch_delete(payload_pointers)? {
            self.dao.delete_objects(&batch.bucket, &batch.keys)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pointer::{decode, encode};
    use crate::impls::inmem_blob::{BlobCall, InMemoryBlobClient};
    use crate::ports::blob_client::{BlobError, DeleteFailure};
    use crate::ports::{FixedClock, UlidKeyGenerator};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    const BUCKET: &str = "test-bucket-name";
    const KEY: &str = "AnyS3key";
    const PAYLOAD: &str = "AnyPayload";

    type Fixture = (
        Arc<InMemoryBlobClient>,
        S3BackedPayloadStore<Arc<InMemoryBlobClient>>,
    );

    fn store() -> Fixture {
        let client = Arc::new(InMemoryBlobClient::new());
        let store = S3BackedPayloadStore::new(S3Dao::new(client.clone()), BUCKET);
        (client, store)
    }

    #[test]
    fn store_generates_key_and_returns_pointer() {
        let (client, store) = store();

        let pointer = store.store_original_payload(PAYLOAD).unwrap();

        let (bucket, key) = decode(&pointer).unwrap();
        assert_eq!(bucket, BUCKET);
        assert!(client.contains(BUCKET, &key));
        assert_eq!(client.calls(), vec![BlobCall::Put { bucket, key }]);
    }

    #[test]
    fn store_with_key_uses_exactly_that_key() {
        let (client, store) = store();

        let pointer = store.store_original_payload_with_key(PAYLOAD, KEY).unwrap();

        assert_eq!(pointer, encode(BUCKET, KEY).unwrap());
        assert!(client.contains(BUCKET, KEY));
    }

    #[test]
    fn store_always_creates_new_objects() {
        let (client, store) = store();

        let p1 = store.store_original_payload(PAYLOAD).unwrap();
        let p2 = store.store_original_payload(PAYLOAD).unwrap();

        assert_ne!(p1, p2);
        assert_ne!(decode(&p1).unwrap().1, decode(&p2).unwrap().1);
        assert_eq!(client.object_count(), 2);
    }

    #[test]
    fn store_propagates_backend_error_unchanged() {
        let (client, store) = store();
        client.fail_next(BlobError::Service("boom".to_string()));

        let err = store.store_original_payload(PAYLOAD).unwrap_err();

        let expected = BlobError::Service("boom".to_string());
        assert_eq!(err.as_backend(), Some(&expected));
    }

    #[test]
    fn empty_key_is_rejected_before_backend_call() {
        let (client, store) = store();
        assert!(store.store_original_payload_with_key(PAYLOAD, "").is_err());
        assert!(client.calls().is_empty());
    }

    #[test]
    fn get_reads_back_original_payload() {
        let (_client, store) = store();
        let pointer = store.store_original_payload(PAYLOAD).unwrap();
        let payload = store.get_original_payload(&pointer).unwrap();
        assert_eq!(payload, PAYLOAD);
    }

    #[test]
    fn get_with_malformed_pointer_makes_no_backend_call() {
        let (client, store) = store();
        let err = store.get_original_payload("not-a-pointer").unwrap_err();
        assert!(err.is_malformed_pointer());
        assert!(client.calls().is_empty());
    }

    #[test]
    fn get_error_message_contains_backend_cause() {
        let (client, store) = store();
        client.fail_next(BlobError::Service("boom".to_string()));
        let err = store
            .get_original_payload(&encode(BUCKET, KEY).unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn delete_with_malformed_pointer_makes_no_backend_call() {
        let (client, store) = store();
        let err = store.delete_original_payload("{}").unwrap_err();
        assert!(err.is_malformed_pointer());
        assert!(client.calls().is_empty());
    }

    #[test]
    fn delete_removes_object() {
        let (client, store) = store();
        let pointer = store.store_original_payload_with_key(PAYLOAD, KEY).unwrap();
        store.delete_original_payload(&pointer).unwrap();
        assert!(!client.contains(BUCKET, KEY));
    }

    #[test]
    fn batch_delete_issues_one_call_per_bucket() {
        let (client, store) = store();
        let pointers = vec![
            encode("B1", "k1").unwrap(),
            encode("B1", "k2").unwrap(),
            encode("B2", "k3").unwrap(),
        ];

        store.delete_original_payloads(&pointers).unwrap();

        assert_eq!(
            client.calls(),
            vec![
                BlobCall::DeleteObjects {
                    bucket: "B1".to_string(),
                    keys: vec!["k1".to_string(), "k2".to_string()],
                },
                BlobCall::DeleteObjects {
                    bucket: "B2".to_string(),
                    keys: vec!["k3".to_string()],
                },
            ]
        );
    }

    #[test]
    fn batch_delete_fails_fast_on_malformed_pointer() {
        let (client, store) = store();
        let pointers = vec![encode("B1", "k1").unwrap(), "garbage".to_string()];

        let err = store.delete_original_payloads(&pointers).unwrap_err();

        assert!(err.is_malformed_pointer());
        assert!(client.calls().is_empty());
    }

    #[test]
    fn batch_delete_stops_at_first_failing_bucket() {
        let (client, store) = store();
        for (bucket, key) in [("B1", "k1"), ("B2", "k2"), ("B3", "k3")] {
            client.insert_raw(bucket, key, b"payload".to_vec());
        }
        let partial = BlobError::PartialDelete {
            bucket: "B2".to_string(),
            failed: vec![DeleteFailure {
                key: "k2".to_string(),
                code: "AccessDenied".to_string(),
                message: "Access Denied".to_string(),
            }],
        };
        client.fail_deletes_in("B2", partial.clone());
        let pointers = vec![
            encode("B1", "k1").unwrap(),
            encode("B2", "k2").unwrap(),
            encode("B3", "k3").unwrap(),
        ];

        let err = store.delete_original_payloads(&pointers).unwrap_err();

        assert_eq!(err.as_backend(), Some(&partial));
        assert!(!client.contains("B1", "k1"));
        assert!(client.contains("B2", "k2"));
        assert!(client.contains("B3", "k3"));
        assert_eq!(client.calls().len(), 2);
    }

    #[test]
    fn empty_batch_delete_is_noop() {
        let (client, store) = store();
        store.delete_original_payloads(&[]).unwrap();
        assert!(client.calls().is_empty());
    }

    #[test]
    fn from_config_requires_payload_support() {
        let config = OffloadConfig::builder().build().unwrap();
        let result = S3BackedPayloadStore::from_config(InMemoryBlobClient::new(), &config);
        assert!(matches!(result, Err(OffloadError::Config(_))));
    }

    #[test]
    fn ulid_key_generator_can_be_injected() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let (_client, store) = store();
        let generator = UlidKeyGenerator::new(FixedClock::new(fixed_time));
        let store = store.with_key_generator(generator);

        let pointer = store.store_original_payload(PAYLOAD).unwrap();

        let (_, key) = decode(&pointer).unwrap();
        let ulid = ulid::Ulid::from_string(&key).unwrap();
        assert_eq!(ulid.timestamp_ms(), fixed_time.timestamp_millis() as u64);
    }
}
