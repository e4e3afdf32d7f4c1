//! SseStrategy - サーバ側暗号化の方式
//!
//! Dao の構築時に 1 度だけ選び、put のたびにリクエストを装飾します。
//!
//! | variant | 効果 |
//! |---|---|
//! | None | 何もしない |
//! | AwsManagedCmk | `aws:kms`（プロバイダ管理キー） |
//! | CustomerKey | `aws:kms` + 指定した KMS key id |

use serde::{Deserialize, Serialize};

use super::request::{PutObjectRequestBuilder, ServerSideEncryption};

/// SseStrategy は閉じた variant 集合
///
/// 生成は `none()` / `aws_managed_cmk()` / `customer_key()` の 3 つだけ。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SseStrategy {
    #[default]
    None,
    AwsManagedCmk,
    CustomerKey { kms_key_id: String },
}

impl SseStrategy {
    pub fn none() -> Self {
        Self::None
    }

    pub fn aws_managed_cmk() -> Self {
        Self::AwsManagedCmk
    }

    pub fn customer_key(kms_key_id: impl Into<String>) -> Self {
        Self::CustomerKey {
            kms_key_id: kms_key_id.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// 送信前の put リクエストに暗号化フィールドを書き込む
    ///
    /// 不正な key id はここでは検証しない（バックエンドのエラーとして返る）。
    pub fn decorate(&self, builder: &mut PutObjectRequestBuilder) {
        match self {
            Self::None => {}
            Self::AwsManagedCmk => {
                builder.server_side_encryption(ServerSideEncryption::AwsKms);
            }
            Self::CustomerKey { kms_key_id } => {
                builder
                    .server_side_encryption(ServerSideEncryption::AwsKms)
                    .ssekms_key_id(kms_key_id.clone());
            }
        }
    }
}
