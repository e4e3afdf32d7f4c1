//! メッセージ属性などの定数

/// オフロード済みメッセージに付ける予約属性名（値は元ペイロードのバイト長）
pub const RESERVED_ATTRIBUTE_NAME: &str = "ExtendedPayloadSize";

/// SQS / SNS 拡張クライアント間で共有される予約属性名
pub const OFFLOADED_PAYLOAD_SIZE_ATTRIBUTE: &str = "AWSOffloadedPayloadSize";

/// ユーザーが付けられる属性数（SQS/SNS の上限 10 から予約属性の 1 つを引く）
pub const MAX_ALLOWED_ATTRIBUTES: usize = 10 - 1;

/// SQS / SNS のペイロード上限（256 KiB）
pub const DEFAULT_PAYLOAD_SIZE_THRESHOLD: usize = 262_144;

/// User-Agent ヘッダの値 `"{client_name}/{crate version}"`
pub fn user_agent(client_name: &str) -> String {
    format!("{client_name}/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_appends_version() {
        let ua = user_agent("sqs-extended");
        assert!(ua.starts_with("sqs-extended/"));
        assert!(ua.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
