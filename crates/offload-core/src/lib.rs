//! offload-core
//!
//! メッセージ本文をサイズ上限の大きい Blob storage（S3 互換）に逃がし、
//! 代わりに小さなポインタを送るための部品です。
//!
//! # モジュール構成
//! - **domain**: 値型（PayloadPointer, SseStrategy, PutObjectRequest, サイズ計測, errors）
//! - **ports**: 抽象化レイヤー（BlobClient, PayloadStore, KeyGenerator, Clock）
//! - **app**: Dao と PayloadStore（同期・非同期）、設定、一括削除のグルーピング
//! - **impls**: 実装（InMemoryBlobClient など開発用）
//!
//! # 例
//! ```ignore
//! let config = OffloadConfig::builder()
//!     .payload_support_enabled("my-bucket")
//!     .build()?;
//! let store = S3BackedPayloadStore::from_config(client, &config)?;
//!
//! let body = if config.should_offload(&body) {
//!     store.store_original_payload(&body)?
//! } else {
//!     body
//! };
//! ```

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{
    OffloadConfig, OffloadConfigBuilder, S3AsyncDao, S3BackedPayloadStore,
    S3BackedPayloadStoreAsync, S3Dao,
};
pub use domain::{ObjectCannedAcl, OffloadError, PayloadPointer, SseStrategy};
pub use ports::{AsyncBlobClient, BlobClient, BlobError, PayloadStore, PayloadStoreAsync};
