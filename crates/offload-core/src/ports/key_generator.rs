//! KeyGenerator port - オブジェクトキー生成の抽象化
//!
//! キーを省略して storeOriginalPayload を呼んだときに使われます。
//! バックエンドへの一意性チェックは行わないので、衝突確率が無視できることが前提です。
//!
//! # 実装
//! - **UuidKeyGenerator**: ランダム UUID v4（デフォルト）
//! - **UlidKeyGenerator**: 時刻でソート可能な ULID

use ulid::Ulid;
use uuid::Uuid;

use crate::ports::Clock;

/// KeyGenerator は新しいオブジェクトキーを生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（PayloadStore は複数スレッドから使える）
pub trait KeyGenerator: Send + Sync {
    fn generate_key(&self) -> String;
}

/// ランダム UUID v4 のキー（例: `"1b4e28ba-2fa1-11d2-883f-0016d3cca427"`）
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeyGenerator;

impl KeyGenerator for UuidKeyGenerator {
    fn generate_key(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// ULID ベースのキー
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// 同じ bucket 内でキーが作成順に並ぶので、一覧や期限切れ掃除がしやすくなります。
pub struct UlidKeyGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidKeyGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> KeyGenerator for UlidKeyGenerator<C> {
    fn generate_key(&self) -> String {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random()).to_string()
    }
}
