//! Impls - 実装（開発用・テスト用）
//!
//! このモジュールには ports の実装を含めます。
//!
//! # 含まれる実装
//! - **InMemoryBlobClient**: 開発用の Blob バックエンド（同期・非同期の両方）
//!
//! # 本番用実装
//! 本番用の BlobClient（S3 SDK を包むもの）は利用側のクレートに置きます。

pub mod inmem_blob;

pub use self::inmem_blob::{BlobCall, InMemoryBlobClient};
