//! Domain model (pointer, encryption, put request, size, errors).
//!
//! - pointer: PayloadPointer とワイヤーフォーマット
//! - encryption: SseStrategy（サーバ側暗号化）
//! - request: PutObjectRequest と canned ACL
//! - size: ペイロードのバイト長計測
//! - errors: OffloadError
//! - constants: 予約属性名などの定数

pub mod constants;
pub mod encryption;
pub mod errors;
pub mod pointer;
pub mod request;
pub mod size;

pub use self::constants::{
    DEFAULT_PAYLOAD_SIZE_THRESHOLD, MAX_ALLOWED_ATTRIBUTES, OFFLOADED_PAYLOAD_SIZE_ATTRIBUTE,
    RESERVED_ATTRIBUTE_NAME, user_agent,
};
pub use self::encryption::SseStrategy;
pub use self::errors::OffloadError;
pub use self::pointer::PayloadPointer;
pub use self::request::{
    ObjectCannedAcl, PutObjectRequest, PutObjectRequestBuilder, ServerSideEncryption,
};
pub use self::size::{ByteCounter, payload_size_in_bytes};
