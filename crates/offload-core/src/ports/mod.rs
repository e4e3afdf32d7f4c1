//! Ports - 抽象化レイヤー
//!
//! 各 trait は外部システム（S3 互換の Blob storage など）への
//! インターフェースを提供し、実装の詳細を隠蔽します。

pub mod blob_client;
pub mod clock;
pub mod key_generator;
pub mod payload_store;

// 主要な trait を再エクスポート
pub use self::blob_client::{AsyncBlobClient, BlobClient, BlobError, DeleteFailure};
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::key_generator::{KeyGenerator, UlidKeyGenerator, UuidKeyGenerator};
pub use self::payload_store::{PayloadStore, PayloadStoreAsync};
