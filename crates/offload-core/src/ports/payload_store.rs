//! PayloadStore port - ペイロードのオフロード先
//!
//! 呼び出し側（メッセージングクライアント）は大きすぎる本文をここに預け、
//! 代わりに返ってくるポインタ文字列を本文として送ります。
//!
//! オフロードするかどうかの判断（しきい値・always_through_s3）は呼び出し側の責任です。
//! store_original_payload は呼ばれたら必ず新しいオブジェクトを作ります。

use async_trait::async_trait;

use crate::domain::errors::OffloadError;

/// 同期版 PayloadStore
pub trait PayloadStore: Send + Sync {
    /// 新しいキーを生成して保存し、ポインタ文字列を返す
    fn store_original_payload(&self, payload: &str) -> Result<String, OffloadError>;

    /// 指定したキーで保存し、ポインタ文字列を返す
    fn store_original_payload_with_key(
        &self,
        payload: &str,
        key: &str,
    ) -> Result<String, OffloadError>;

    /// ポインタから元のペイロードを読み出す
    ///
    /// ポインタが壊れていればバックエンドに触れる前に MalformedPointer を返す。
    fn get_original_payload(&self, payload_pointer: &str) -> Result<String, OffloadError>;

    fn delete_original_payload(&self, payload_pointer: &str) -> Result<(), OffloadError>;

    /// 複数のポインタを bucket ごとにまとめて削除
    ///
    /// 全ポインタのデコードが先に行われ、1 つでも壊れていればバックエンド呼び出しは 0 回。
    fn delete_original_payloads(&self, payload_pointers: &[String]) -> Result<(), OffloadError>;
}

/// 非同期版 PayloadStore
///
/// エラーはデコード失敗も含めて全て返り値の future 経由で返る。
#[async_trait]
pub trait PayloadStoreAsync: Send + Sync {
    async fn store_original_payload(&self, payload: &str) -> Result<String, OffloadError>;

    async fn store_original_payload_with_key(
        &self,
        payload: &str,
        key: &str,
    ) -> Result<String, OffloadError>;

    async fn get_original_payload(&self, payload_pointer: &str) -> Result<String, OffloadError>;

    async fn delete_original_payload(&self, payload_pointer: &str) -> Result<(), OffloadError>;

    /// bucket ごとのバッチ削除は並行に実行される（相互の順序保証なし）
    async fn delete_original_payloads(
        &self,
        payload_pointers: &[String],
    ) -> Result<(), OffloadError>;
}
