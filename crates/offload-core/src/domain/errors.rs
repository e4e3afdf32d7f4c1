//! Errors - オフロード処理のエラー分類
//!
//! # 分類
//! - MalformedPointer: ポインタ文字列が壊れている（呼び出し側の問題、リトライ無意味）
//! - Encoding: ポインタのシリアライズ失敗（内部不変条件違反）
//! - Backend: Blob バックエンドのエラー（そのまま透過させる）
//! - Config: 構築時の設定エラー

use thiserror::Error;

use crate::ports::blob_client::BlobError;

/// OffloadError はクレート全体のエラー型
#[derive(Debug, Error)]
pub enum OffloadError {
    /// ポインタ文字列が (bucket, key) にデコードできない
    ///
    /// バックエンド呼び出しの前に必ず検出される。
    #[error("Failed to read the S3 object pointer from given string: {reason}")]
    MalformedPointer { reason: String },

    #[error("Failed to convert S3 object pointer to text: {0}")]
    Encoding(#[source] serde_json::Error),

    /// バックエンドのエラーを包まずにそのまま返す
    #[error(transparent)]
    Backend(#[from] BlobError),

    #[error("invalid offload configuration: {0}")]
    Config(String),
}

impl OffloadError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPointer {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }

    /// リトライで回復しうるエラーかどうか
    ///
    /// 分類のみ。このクレート自身はリトライしない。
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Backend(e) => e.is_transient(),
            Self::MalformedPointer { .. } | Self::Encoding(_) | Self::Config(_) => false,
        }
    }

    pub fn is_malformed_pointer(&self) -> bool {
        matches!(self, Self::MalformedPointer { .. })
    }

    /// バックエンド由来のエラーであれば参照を返す
    pub fn as_backend(&self) -> Option<&BlobError> {
        match self {
            Self::Backend(e) => Some(e),
            _ => None,
        }
    }
}
