//! PayloadPointer - オフロードしたペイロードへの参照
//!
//! メッセージ本文の代わりに送られる (bucket, key) の組です。
//!
//! # ワイヤーフォーマット
//! 型タグ付きの 2 要素 JSON 配列:
//!
//! ```text
//! ["software.amazon.payloadoffloading.PayloadS3Pointer",{"s3BucketName":"b","s3Key":"k"}]
//! ```
//!
//! - 未知のフィールドは無視する（将来のフィールド追加に耐える）
//! - 旧パッケージ名の型タグも受け付ける
//! - 形が違う・フィールド欠落・空文字は MalformedPointer

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::OffloadError;

/// エンコード時に書き込む型タグ
pub const POINTER_TYPE_TAG: &str = "software.amazon.payloadoffloading.PayloadS3Pointer";

/// デコード時に受け付ける型タグ
const ACCEPTED_TYPE_TAGS: [&str; 3] = [
    POINTER_TYPE_TAG,
    "com.amazonaws.payloadoffloading.PayloadS3Pointer",
    "com.amazonaws.largepayloadoffloading.PayloadS3Pointer",
];

#[derive(Serialize)]
struct WirePointerRef<'a> {
    #[serde(rename = "s3BucketName")]
    s3_bucket_name: &'a str,
    #[serde(rename = "s3Key")]
    s3_key: &'a str,
}

#[derive(Deserialize)]
struct WirePointer {
    #[serde(rename = "s3BucketName", default)]
    s3_bucket_name: Option<String>,
    #[serde(rename = "s3Key", default)]
    s3_key: Option<String>,
}

/// PayloadPointer は不変の (bucket, key) の組
///
/// # 不変条件
/// - bucket_name, key ともに空でない
/// - 等価性・エンコードは構造的
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PayloadPointer {
    bucket_name: String,
    key: String,
}

impl PayloadPointer {
    pub fn new(
        bucket_name: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<Self, OffloadError> {
        let bucket_name = bucket_name.into();
        let key = key.into();
        if bucket_name.is_empty() {
            return Err(OffloadError::malformed("bucket name is empty"));
        }
        if key.is_empty() {
            return Err(OffloadError::malformed("object key is empty"));
        }
        Ok(Self { bucket_name, key })
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn into_parts(self) -> (String, String) {
        (self.bucket_name, self.key)
    }

    pub fn to_json(&self) -> Result<String, OffloadError> {
        let wire = WirePointerRef {
            s3_bucket_name: &self.bucket_name,
            s3_key: &self.key,
        };
        serde_json::to_string(&(POINTER_TYPE_TAG, wire)).map_err(OffloadError::Encoding)
    }

    pub fn from_json(text: &str) -> Result<Self, OffloadError> {
        Self::parse(text).inspect_err(|e| {
            tracing::warn!(error = %e, "Failed to read the S3 object pointer from given string.");
        })
    }

    fn parse(text: &str) -> Result<Self, OffloadError> {
        let (tag, wire): (String, WirePointer) = serde_json::from_str(text)
            .map_err(|e| OffloadError::malformed(format!("not a pointer: {e}")))?;

        if !ACCEPTED_TYPE_TAGS.contains(&tag.as_str()) {
            let reason = format!("unexpected type tag {tag:?}");
            return Err(OffloadError::malformed(reason));
        }

        let bucket_name = wire
            .s3_bucket_name
            .ok_or_else(|| OffloadError::malformed("missing s3BucketName"))?;
        let key = wire
            .s3_key
            .ok_or_else(|| OffloadError::malformed("missing s3Key"))?;
        Self::new(bucket_name, key)
    }
}

impl FromStr for PayloadPointer {
    type Err = OffloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json(s)
    }
}

impl fmt::Display for PayloadPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket_name, self.key)
    }
}

/// (bucket, key) をポインタ文字列にエンコード
pub fn encode(bucket_name: &str, key: &str) -> Result<String, OffloadError> {
    PayloadPointer::new(bucket_name, key)?.to_json()
}

/// ポインタ文字列を (bucket, key) にデコード
pub fn decode(text: &str) -> Result<(String, String), OffloadError> {
    PayloadPointer::from_json(text).map(PayloadPointer::into_parts)
}
