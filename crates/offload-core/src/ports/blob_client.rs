//! BlobClient port - Blob ストレージ（S3 互換）クライアントの抽象化
//!
//! 実際の S3 クライアントはこのクレートの外側にあり、
//! この trait を実装して Dao に渡します。
//!
//! # 実装
//! - **InMemoryBlobClient**: 開発・テスト用（impls::inmem_blob）

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::request::PutObjectRequest;

/// バッチ削除で削除できなかったキー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteFailure {
    pub key: String,
    pub code: String,
    pub message: String,
}

/// BlobError はバックエンドが報告するエラー
///
/// NotFound と他のエラーの区別はバックエンドが行う。
/// Dao / PayloadStore はこのエラーを包み直さずに呼び出し元へ返す。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlobError {
    #[error("object not found: bucket={bucket} key={key}")]
    NotFound { bucket: String, key: String },

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("blob service error: {0}")]
    Service(String),

    #[error("blob transport error: {0}")]
    Transport(String),

    /// 一部のキーだけ削除に失敗した（バックエンドの報告をそのまま渡す）
    #[error("failed to delete {} object(s) from bucket={bucket}", .failed.len())]
    PartialDelete {
        bucket: String,
        failed: Vec<DeleteFailure>,
    },

    #[error("object content is not valid UTF-8: bucket={bucket} key={key}")]
    InvalidContent { bucket: String, key: String },
}

impl BlobError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// ネットワーク断やサーバ側の一時障害
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Service(_) | Self::Transport(_))
    }
}

/// BlobClient は同期版のバックエンド操作
///
/// # Thread Safety
/// - `Send + Sync` を要求（Dao は複数スレッドから共有される）
pub trait BlobClient: Send + Sync {
    fn put_object(&self, request: PutObjectRequest) -> Result<(), BlobError>;

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError>;

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BlobError>;

    /// 同じ bucket 内の複数キーを 1 回の呼び出しで削除
    fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), BlobError>;
}

/// AsyncBlobClient は非同期版のバックエンド操作
///
/// 呼び出しごとに 1 つのバックエンド呼び出しを発行する。
/// 直列化やキューイングは行わない（並行度の制御は呼び出し側の責任）。
#[async_trait]
pub trait AsyncBlobClient: Send + Sync {
    async fn put_object(&self, request: PutObjectRequest) -> Result<(), BlobError>;

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError>;

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BlobError>;

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), BlobError>;
}

impl<T: BlobClient + ?Sized> BlobClient for Arc<T> {
    fn put_object(&self, request: PutObjectRequest) -> Result<(), BlobError> {
        (**self).put_object(request)
    }

    fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        (**self).get_object(bucket, key)
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BlobError> {
        (**self).delete_object(bucket, key)
    }

    fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), BlobError> {
        (**self).delete_objects(bucket, keys)
    }
}

#[async_trait]
impl<T: AsyncBlobClient + ?Sized> AsyncBlobClient for Arc<T> {
    async fn put_object(&self, request: PutObjectRequest) -> Result<(), BlobError> {
        (**self).put_object(request).await
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, BlobError> {
        (**self).get_object(bucket, key).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), BlobError> {
        (**self).delete_object(bucket, key).await
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<(), BlobError> {
        (**self).delete_objects(bucket, keys).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_delete_reports_failed_count() {
        let err = BlobError::PartialDelete {
            bucket: "b1".to_string(),
            failed: vec![DeleteFailure {
                key: "k1".to_string(),
                code: "AccessDenied".to_string(),
                message: "nope".to_string(),
            }],
        };
        assert_eq!(
            err.to_string(),
            "failed to delete 1 object(s) from bucket=b1"
        );
        assert!(!err.is_transient());
    }

    #[test]
    fn not_found_is_reported_by_backend() {
        let err = BlobError::NotFound {
            bucket: "b".to_string(),
            key: "k".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }
}
