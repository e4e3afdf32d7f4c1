use serde::Serialize;
use std::sync::Arc;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

use offload_core::domain::{OFFLOADED_PAYLOAD_SIZE_ATTRIBUTE, payload_size_in_bytes};
use offload_core::impls::InMemoryBlobClient;
use offload_core::{OffloadConfig, OffloadError, PayloadStoreAsync, S3BackedPayloadStoreAsync};

#[derive(Debug, Serialize)]
struct OrderMessage {
    order_id: u32,
    note: String,
}

/// 設定ファイル（JSON）があれば読み込み、なければデモ用の設定を使う
fn load_config() -> Result<OffloadConfig, OffloadError> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| OffloadError::Config(format!("read {path}: {e}")))?;
            OffloadConfig::from_json_str(&json)
        }
        None => OffloadConfig::builder()
            .payload_support_enabled("demo-bucket")
            .payload_size_threshold(1024)
            .build(),
    }
}

#[tokio::main]
async fn main() -> Result<(), OffloadError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // (A) 設定と in-memory バックエンドを用意
    let config = load_config()?;
    let latency = Duration::from_millis(20);
    let client = Arc::new(InMemoryBlobClient::new().with_latency(latency));
    let store = S3BackedPayloadStoreAsync::from_config(client.clone(), &config)?;

    // (B) 小さい本文と大きい本文を作る
    let bodies = [
        OrderMessage {
            order_id: 1,
            note: "small".to_string(),
        },
        OrderMessage {
            order_id: 2,
            note: "x".repeat(4096),
        },
    ]
    .iter()
    .map(serde_json::to_string)
    .collect::<Result<Vec<_>, _>>()
    .map_err(OffloadError::Encoding)?;

    // (C) しきい値を超えたものだけオフロードして、ポインタを本文の代わりにする
    let mut pointers = Vec::new();
    for body in &bodies {
        let size = payload_size_in_bytes(body);
        if config.should_offload(body) {
            let pointer = store.store_original_payload(body).await?;
            println!(
                "offloaded: {OFFLOADED_PAYLOAD_SIZE_ATTRIBUTE}={size} body={pointer}"
            );
            pointers.push(pointer);
        } else {
            println!("sent inline: size={size}");
        }
    }

    // (D) 受信側: ポインタから元の本文を復元
    for pointer in &pointers {
        let original = store.get_original_payload(pointer).await?;
        println!("resolved: {} bytes", payload_size_in_bytes(&original));
    }

    // (E) 処理が終わったらまとめて削除
    store.delete_original_payloads(&pointers).await?;
    println!("remaining objects: {}", client.object_count());
    Ok(())
}
