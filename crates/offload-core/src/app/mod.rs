//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてオフロード処理を実装します。
//!
//! # 主要コンポーネント
//! - **OffloadConfig**: 不変の設定値とその Builder
//! - **S3Dao / S3AsyncDao**: BlobClient を包む Backend Accessor
//! - **S3BackedPayloadStore / S3BackedPayloadStoreAsync**: キー決定・保存・ポインタ化
//! - **plan_batch_delete**: 一括削除の bucket ごとのグルーピング

pub mod async_dao;
pub mod async_store;
pub mod config;
pub mod dao;
pub mod grouping;
pub mod store;

// 主要な型を再エクスポート
pub use self::async_dao::S3AsyncDao;
pub use self::async_store::S3BackedPayloadStoreAsync;
pub use self::config::{OffloadConfig, OffloadConfigBuilder};
pub use self::dao::S3Dao;
pub use self::grouping::{BucketBatch, plan_batch_delete};
pub use self::store::S3BackedPayloadStore;
