//! Size Estimator - ペイロードの UTF-8 バイト長を数える
//!
//! エンコード済みのバッファを丸ごと作らずに、書き込まれたバイト数だけを
//! 数えるシンク（ByteCounter）を通して計測します。

use std::fmt::{self, Write as _};

/// 書き込まれたバイト数だけを積算するシンク
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ByteCounter {
    total: u64,
}

impl ByteCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}

impl fmt::Write for ByteCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.total += s.len() as u64;
        Ok(())
    }
}

/// 文字列の UTF-8 バイト長
pub fn payload_size_in_bytes(payload: &str) -> u64 {
    let mut counter = ByteCounter::new();
    // ByteCounter::write_str は失敗しない
    let _ = counter.write_str(payload);
    counter.total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fmt::Write;

    #[rstest]
    #[case("", 0)]
    #[case("AnyPayload", 10)]
    #[case("é", 2)]
    #[case("日本語", 9)]
    #[case("🦀", 4)]
    fn counts_utf8_bytes(#[case] payload: &str, #[case] expected: u64) {
        assert_eq!(payload_size_in_bytes(payload), expected);
        assert_eq!(payload_size_in_bytes(payload), payload.len() as u64);
    }

    #[test]
    fn counter_accumulates_across_writes() {
        let mut counter = ByteCounter::new();
        let (item, quantity) = ("注文", 42);
        write!(counter, "{item}:{quantity}").unwrap();
        counter.write_str("-order").unwrap();
        assert_eq!(counter.total(), "注文:42-order".len() as u64);
    }
}
