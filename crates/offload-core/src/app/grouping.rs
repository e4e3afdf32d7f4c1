//! 一括削除のための bucket ごとのグルーピング
//!
//! 同じ bucket のキーを 1 回のバッチ削除にまとめて、往復回数を bucket 数まで減らします。

use std::collections::{HashMap, HashSet};

use crate::domain::errors::OffloadError;
use crate::domain::pointer::PayloadPointer;

/// 1 つの bucket に対する 1 回のバッチ削除
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketBatch {
    pub bucket: String,
    pub keys: Vec<String>,
}

/// ポインタ文字列を全てデコードしてから bucket ごとにまとめる
///
/// # 保証
/// - 1 つでも壊れたポインタがあれば最初のものでエラー（この時点ではバックエンドに触れていない）
/// - bucket は最初に現れた順、キーは bucket 内で最初に現れた順
/// - 同じ (bucket, key) の重複は 1 つにまとめる
pub fn plan_batch_delete(payload_pointers: &[String]) -> Result<Vec<BucketBatch>, OffloadError> {
    let pointers = payload_pointers
        .iter()
        .map(|text| PayloadPointer::from_json(text.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(group_by_bucket(pointers))
}

fn group_by_bucket(pointers: Vec<PayloadPointer>) -> Vec<BucketBatch> {
    let mut batches: Vec<BucketBatch> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut seen: HashSet<PayloadPointer> = HashSet::new();

    for pointer in pointers {
        if !seen.insert(pointer.clone()) {
            continue;
        }
        let (bucket, key) = pointer.into_parts();
        match index.get(&bucket) {
            Some(&i) => batches[i].keys.push(key),
            None => {
                index.insert(bucket.clone(), batches.len());
                batches.push(BucketBatch {
                    bucket,
                    keys: vec![key],
                });
            }
        }
    }

    batches
}
