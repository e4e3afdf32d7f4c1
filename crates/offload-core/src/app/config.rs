//! OffloadConfig - オフロード設定
//!
//! # 学習ポイント
//! - Builder パターンで組み立てて、構築後は不変
//! - 起動時検証（Fail-fast 設計）
//! - serde で JSON から読み込めるように全フィールドにデフォルト値

use serde::Deserialize;

use crate::domain::constants::DEFAULT_PAYLOAD_SIZE_THRESHOLD;
use crate::domain::encryption::SseStrategy;
use crate::domain::errors::OffloadError;
use crate::domain::request::ObjectCannedAcl;
use crate::domain::size::payload_size_in_bytes;

/// OffloadConfig は構築後に変更されない設定値
///
/// Dao / PayloadStore のコンストラクタに 1 度だけ渡される。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OffloadConfig {
    bucket_name: Option<String>,
    payload_size_threshold: usize,
    always_through_s3: bool,
    server_side_encryption: SseStrategy,
    object_canned_acl: Option<ObjectCannedAcl>,
}

impl Default for OffloadConfig {
    fn default() -> Self {
        Self {
            bucket_name: None,
            payload_size_threshold: DEFAULT_PAYLOAD_SIZE_THRESHOLD,
            always_through_s3: false,
            server_side_encryption: SseStrategy::None,
            object_canned_acl: None,
        }
    }
}

impl OffloadConfig {
    pub fn builder() -> OffloadConfigBuilder {
        OffloadConfigBuilder::new()
    }

    /// JSON から読み込む
    ///
    /// # Example
    /// ```ignore
    /// let config = OffloadConfig::from_json_str(r#"{ "bucket_name": "my-bucket" }"#)?;
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, OffloadError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| OffloadError::Config(format!("json decode: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), OffloadError> {
        if matches!(self.bucket_name.as_deref(), Some("")) {
            return Err(OffloadError::config("S3 bucket name cannot be empty."));
        }
        if let SseStrategy::CustomerKey { kms_key_id } = &self.server_side_encryption
            && kms_key_id.is_empty()
        {
            return Err(OffloadError::config("KMS key id cannot be empty."));
        }
        Ok(())
    }

    pub fn payload_support_enabled(&self) -> bool {
        self.bucket_name.is_some()
    }

    pub fn bucket_name(&self) -> Option<&str> {
        self.bucket_name.as_deref()
    }

    /// payload support が無効なら Config エラー
    pub fn require_bucket_name(&self) -> Result<&str, OffloadError> {
        self.bucket_name
            .as_deref()
            .ok_or_else(|| OffloadError::config("payload support is disabled"))
    }

    pub fn payload_size_threshold(&self) -> usize {
        self.payload_size_threshold
    }

    pub fn always_through_s3(&self) -> bool {
        self.always_through_s3
    }

    pub fn server_side_encryption(&self) -> &SseStrategy {
        &self.server_side_encryption
    }

    pub fn object_canned_acl(&self) -> Option<ObjectCannedAcl> {
        self.object_canned_acl
    }

    /// サイズ（バイト）がしきい値を超えるか
    ///
    /// しきい値ちょうどはオフロードしない。
    pub fn is_large(&self, size_in_bytes: u64) -> bool {
        size_in_bytes > self.payload_size_threshold as u64
    }

    /// このペイロードをオフロードすべきか
    pub fn should_offload(&self, payload: &str) -> bool {
        self.always_through_s3 || self.is_large(payload_size_in_bytes(payload))
    }
}

/// OffloadConfigBuilder は OffloadConfig を組み立てる
///
/// # 使用例
/// ```ignore
/// let config = OffloadConfig::builder()
///     .payload_support_enabled("my-bucket")
///     .server_side_encryption(SseStrategy::customer_key("kms-1"))
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct OffloadConfigBuilder {
    config: OffloadConfig,
}

impl OffloadConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payload_support_enabled(mut self, bucket_name: impl Into<String>) -> Self {
        if self.config.bucket_name.is_some() {
            tracing::warn!(
                "Payload support is already enabled. Overwriting S3 bucket name."
            );
        }
        self.config.bucket_name = Some(bucket_name.into());
        self
    }

    pub fn payload_support_disabled(mut self) -> Self {
        self.config.bucket_name = None;
        self
    }

    pub fn payload_size_threshold(mut self, threshold: usize) -> Self {
        self.config.payload_size_threshold = threshold;
        self
    }

    pub fn always_through_s3(mut self, always: bool) -> Self {
        self.config.always_through_s3 = always;
        self
    }

    pub fn server_side_encryption(mut self, strategy: SseStrategy) -> Self {
        self.config.server_side_encryption = strategy;
        self
    }

    pub fn object_canned_acl(mut self, acl: ObjectCannedAcl) -> Self {
        self.config.object_canned_acl = Some(acl);
        self
    }

    /// # 検証
    /// - bucket 名が空文字なら Config エラー
    /// - CustomerKey の key id が空文字なら Config エラー
    pub fn build(self) -> Result<OffloadConfig, OffloadError> {
        self.config.validate()?;
        if self.config.payload_support_enabled() {
            tracing::info!(bucket = ?self.config.bucket_name, "Payload support enabled.");
        }
        Ok(self.config)
    }
}
