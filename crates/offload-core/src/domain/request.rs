//! PutObjectRequest - バックエンドへ渡す書き込みリクエスト
//!
//! 暗号化（SseStrategy）や ACL はこのビルダーを装飾することで設定します。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// サーバ側暗号化の方式（S3 の x-amz-server-side-encryption）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServerSideEncryption {
    #[serde(rename = "AES256")]
    Aes256,
    #[serde(rename = "aws:kms")]
    AwsKms,
}

impl ServerSideEncryption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aes256 => "AES256",
            Self::AwsKms => "aws:kms",
        }
    }
}

/// S3 の canned ACL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectCannedAcl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
    AwsExecRead,
    BucketOwnerRead,
    BucketOwnerFullControl,
}

impl ObjectCannedAcl {
    /// x-amz-acl ヘッダの値
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::PublicRead => "public-read",
            Self::PublicReadWrite => "public-read-write",
            Self::AuthenticatedRead => "authenticated-read",
            Self::AwsExecRead => "aws-exec-read",
            Self::BucketOwnerRead => "bucket-owner-read",
            Self::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }
}

impl fmt::Display for ObjectCannedAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown canned ACL: {0}")]
pub struct UnknownAcl(pub String);

impl FromStr for ObjectCannedAcl {
    type Err = UnknownAcl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "public-read" => Ok(Self::PublicRead),
            "public-read-write" => Ok(Self::PublicReadWrite),
            "authenticated-read" => Ok(Self::AuthenticatedRead),
            "aws-exec-read" => Ok(Self::AwsExecRead),
            "bucket-owner-read" => Ok(Self::BucketOwnerRead),
            "bucket-owner-full-control" => Ok(Self::BucketOwnerFullControl),
            other => Err(UnknownAcl(other.to_string())),
        }
    }
}

/// バックエンドに送る put リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_length: u64,
    pub server_side_encryption: Option<ServerSideEncryption>,
    pub ssekms_key_id: Option<String>,
    pub acl: Option<ObjectCannedAcl>,
}

impl PutObjectRequest {
    pub fn builder(bucket: impl Into<String>, key: impl Into<String>) -> PutObjectRequestBuilder {
        PutObjectRequestBuilder::new(bucket, key)
    }

    /// 暗号化フィールドが 1 つでも設定されているか
    pub fn is_encrypted(&self) -> bool {
        self.server_side_encryption.is_some()
    }
}

/// PutObjectRequestBuilder は送信前のリクエストを組み立てる
///
/// SseStrategy::decorate が `&mut` で受け取って暗号化フィールドを書き込む。
#[derive(Debug, Clone)]
pub struct PutObjectRequestBuilder {
    bucket: String,
    key: String,
    body: Vec<u8>,
    content_length: Option<u64>,
    server_side_encryption: Option<ServerSideEncryption>,
    ssekms_key_id: Option<String>,
    acl: Option<ObjectCannedAcl>,
}

impl PutObjectRequestBuilder {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            body: Vec::new(),
            content_length: None,
            server_side_encryption: None,
            ssekms_key_id: None,
            acl: None,
        }
    }

    pub fn body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.body = body.into();
        self
    }

    pub fn content_length(&mut self, length: u64) -> &mut Self {
        self.content_length = Some(length);
        self
    }

    pub fn server_side_encryption(&mut self, sse: ServerSideEncryption) -> &mut Self {
        self.server_side_encryption = Some(sse);
        self
    }

    pub fn ssekms_key_id(&mut self, key_id: impl Into<String>) -> &mut Self {
        self.ssekms_key_id = Some(key_id.into());
        self
    }

    pub fn acl(&mut self, acl: ObjectCannedAcl) -> &mut Self {
        self.acl = Some(acl);
        self
    }

    /// content_length が未設定なら body の長さを使う
    pub fn build(self) -> PutObjectRequest {
        let content_length = self.content_length.unwrap_or(self.body.len() as u64);
        PutObjectRequest {
            bucket: self.bucket,
            key: self.key,
            body: self.body,
            content_length,
            server_side_encryption: self.server_side_encryption,
            ssekms_key_id: self.ssekms_key_id,
            acl: self.acl,
        }
    }
}
