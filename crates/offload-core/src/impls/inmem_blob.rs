//! InMemoryBlobClient - 開発用の Blob バックエンド
//!
//! # 学習ポイント
//! - 同じ状態を同期 trait と async trait の両方から使う
//! - 呼び出し履歴の記録（テストで「バックエンドに触れていない」ことを確認する）
//! - 失敗の注入（次の 1 回だけ失敗 / 特定 bucket の削除が失敗）

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::request::PutObjectRequest;
use crate::ports::blob_client::{AsyncBlobClient, BlobClient, BlobError};

/// 記録されるバックエンド呼び出し
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobCall {
    Put { bucket: String, key: String },
    Get { bucket: String, key: String },
    DeleteObject { bucket: String, key: String },
    DeleteObjects { bucket: String, keys: Vec<String> },
}

#[derive(Default)]
struct State {
    objects: HashMap<(String, String), Vec<u8>>,
    calls: Vec<BlobCall>,
    puts: Vec<PutObjectRequest>,
    fail_next: VecDeque<BlobError>,
    failing_delete_buckets: HashMap<String, BlobError>,
}

/// InMemoryBlobClient は開発・テスト用のバックエンド
///
/// # 実装詳細
/// - HashMap<(bucket, key), bytes> でオブジェクトを管理
/// - Mutex で排他制御（await をまたいでロックを保持しない）
/// - async 版は `latency` だけ待ってから処理する
///
/// # 使用例
/// ```ignore
/// let client = Arc::new(InMemoryBlobClient::new());
/// let dao = S3Dao::new(client.clone());
/// assert!(client.calls().is_empty());
/// ```
#[derive(Default)]
pub struct InMemoryBlobClient {
    state: Mutex<State>,
    latency: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl InMemoryBlobClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// async 呼び出しごとに待つ時間を設定
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // テスト中の panic でロックが汚染されても中身はそのまま使う
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 次の呼び出しを 1 回だけ失敗させる（複数回呼べばその順に失敗）
    pub fn fail_next(&self, error: BlobError) {
        self.lock().fail_next.push_back(error);
    }

    /// 指定 bucket への削除を常に失敗させる
    pub fn fail_deletes_in(&self, bucket: impl Into<String>, error: BlobError) {
        self.lock()
            .failing_delete_buckets
            .insert(bucket.into(), error);
    }

    /// テスト用: 生のバイト列を直接置く（呼び出し履歴には残らない）
    pub fn insert_raw(&self, bucket: &str, key: &str, bytes: Vec<u8>) {
        self.lock()
            .objects
            .insert((bucket.to_string(), key.to_string()), bytes);
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.lock()
            .objects
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn object_count(&self) -> usize {
        self.lock().objects.len()
    }

    /// 記録された全呼び出し（失敗したものも含む）
    pub fn calls(&self) -> Vec<BlobCall> {
        self.lock().calls.clone()
    }

    /// 記録された put リクエスト（暗号化・ACL フィールドの確認用）
    pub fn put_requests(&self) -> Vec<PutObjectRequest> {
        self.lock().puts.clone()
    }

    /// async 呼び出しの同時実行数の最大値
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, state: &mut State, call: BlobCall) -> Result<(), BlobError> {
        state.calls.push(call);
        match state.fail_next.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn put_sync(&self, request: PutObjectRequest) -> Result<(), BlobError> {
        let mut state = self.lock();
        let call = BlobCall::Put {
            bucket: request.bucket.clone(),
            key: request.key.clone(),
        };
        state.puts.push(request.clone());
        self.record(&mut state, call)?;
        state
            .objects
            .insert((request.bucket, request.key), request.body);
        Ok(())
    }

    fn get_sync(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        let mut state = self.lock();
        let call = BlobCall::Get {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };
        self.record(&mut state, call)?;
        state
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| BlobError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    fn delete_sync(&self, bucket: &str, key: &str) -> Result<(), BlobError> {
        let mut state = self.lock();
        let call = BlobCall::DeleteObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        };
        self.record(&mut state, call)?;
        if let Some(error) = state.failing_delete_buckets.get(bucket) {
            return Err(error.clone());
        }
        // S3 と同じく、存在しないキーの削除も成功扱い
        state.objects.remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }

    fn delete_many_sync(&self, bucket: &str, keys: &[String]) -> Result<(), BlobError> {
        let mut state = self.lock();
        let call = BlobCall::DeleteObjects {
            bucket: bucket.to_string(),
            keys: keys.to_vec(),
        };
        self.record(&mut state, call)?;
        if let Some(error) = state.failing_delete_buckets.get(bucket) {
            return Err(error.clone());
        }
        let keys: HashSet<&String> = keys.iter().collect();
        state
            .objects
            .retain(|(b, k), _| !(b == bucket && keys.contains(k)));
        Ok(())
    }

    async fn simulate_round_trip(&self) {
        let _slot = InFlightSlot::acquire(self);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

/// 同時実行数の 1 枠。途中で future が drop されても Drop で枠を返す
struct InFlightSlot<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> InFlightSlot<'a> {
    fn acquire(client: &'a InMemoryBlobClient) -> Self {
        let now = client.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        client.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self {
            in_flight: &client.in_flight,
        }
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl BlobClient for InMemoryBlobClient {
    fn put_object(&self, request: PutObjectRequest) -> Result<(), BlobError> {
        self.put_sync(request)
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        self.get_sync(bucket, key)
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BlobError> {
        self.delete_sync(bucket, key)
    }

    fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), BlobError> {
        self.delete_many_sync(bucket, keys)
    }
}

#[async_trait]
impl AsyncBlobClient for InMemoryBlobClient {
    async fn put_object(&self, request: PutObjectRequest) -> Result<(), BlobError> {
        self.simulate_round_trip().await;
        self.put_sync(request)
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        self.simulate_round_trip().await;
        self.get_sync(bucket, key)
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BlobError> {
        self.simulate_round_trip().await;
        self.delete_sync(bucket, key)
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), BlobError> {
        self.simulate_round_trip().await;
        self.delete_many_sync(bucket, keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn put(bucket: &str, key: &str, body: &str) -> PutObjectRequest {
        let mut builder = PutObjectRequest::builder(bucket, key);
        builder.body(body);
        builder.build()
    }

    #[test]
    fn put_get_roundtrip() {
        let client = InMemoryBlobClient::new();
        BlobClient::put_object(&client, put("b", "k", "hello")).unwrap();
        let bytes = BlobClient::get_object(&client, "b", "k").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn fail_next_fails_exactly_once() {
        let client = InMemoryBlobClient::new();
        client.fail_next(BlobError::Transport("reset".to_string()));

        let first = BlobClient::put_object(&client, put("b", "k", "x"));
        let second = BlobClient::put_object(&client, put("b", "k", "x"));

        assert_eq!(first, Err(BlobError::Transport("reset".to_string())));
        assert!(second.is_ok());
        assert_eq!(client.calls().len(), 2);
    }

    #[test]
    fn delete_objects_only_touches_named_bucket() {
        let client = InMemoryBlobClient::new();
        client.insert_raw("b1", "k", b"1".to_vec());
        client.insert_raw("b2", "k", b"2".to_vec());

        BlobClient::delete_objects(&client, "b1", &["k".to_string()]).unwrap();

        assert!(!client.contains("b1", "k"));
        assert!(client.contains("b2", "k"));
    }

    #[tokio::test]
    async fn async_calls_share_state_with_sync_calls() {
        let client = InMemoryBlobClient::new();
        AsyncBlobClient::put_object(&client, put("b", "k", "async"))
            .await
            .unwrap();
        let bytes = BlobClient::get_object(&client, "b", "k").unwrap();
        assert_eq!(bytes, b"async");
    }

    #[tokio::test]
    async fn concurrent_async_calls_overlap() {
        let latency = Duration::from_millis(50);
        let client = Arc::new(InMemoryBlobClient::new().with_latency(latency));
        let a = AsyncBlobClient::delete_object(&client, "b1", "k");
        let b = AsyncBlobClient::delete_object(&client, "b2", "k");
        let (ra, rb) = tokio::join!(a, b);
        ra.unwrap();
        rb.unwrap();
        assert_eq!(client.max_in_flight(), 2);
    }

    #[tokio::test]
    async fn cancelled_call_gives_back_its_in_flight_slot() {
        let latency = Duration::from_millis(200);
        let client = InMemoryBlobClient::new().with_latency(latency);

        let pending = AsyncBlobClient::delete_object(&client, "b", "k");
        let timed_out = tokio::time::timeout(Duration::from_millis(10), pending).await;
        assert!(timed_out.is_err());
        assert_eq!(client.in_flight.load(Ordering::SeqCst), 0);

        AsyncBlobClient::delete_object(&client, "b", "k")
            .await
            .unwrap();
        assert_eq!(client.max_in_flight(), 1);
    }
}
