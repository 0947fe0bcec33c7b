//! Basic usage example for the IPFS API client
//!
//! This example demonstrates:
//! - Querying the peer identity and version
//! - Reading and writing config knobs
//! - Adding files and reading them back
//! - Working with raw blocks and MerkleDAG objects
//!
//! Requires a running daemon (set IPFS_API_URL to override http://localhost:5001).
//!
//! Run with: cargo run --example basic_usage

use bytes::Bytes;
use ipfs_client::{FileUpload, IpfsClient, IpfsConfig};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ipfs_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = IpfsConfig::from_env();
    println!("🚀 IPFS API client - talking to {}\n", config.api_url);
    let client = IpfsClient::new(config)?;

    // ==================== Generic ====================

    let id = client.id().await?;
    println!("🆔 Peer ID: {}", id["ID"]);

    let version = client.version().await?;
    println!("📦 Daemon version: {}", version["Version"]);

    // ==================== Config ====================

    let datastore = client.config_get("Datastore").await?;
    println!("\n⚙️  Datastore config: {}", datastore);

    let storage_max = client.config_get("Datastore.StorageMax").await?;
    client
        .config_set("Datastore.StorageMax", &json!("20GB"))
        .await?;
    println!("   ✅ Datastore.StorageMax set to 20GB");
    client
        .config_set("Datastore.StorageMax", &storage_max)
        .await?;
    println!("   ↩️  Datastore.StorageMax restored to {}", storage_max);

    // ==================== Files ====================

    println!("\n📤 Adding foo.txt and bar.txt...");
    let added = client
        .files_add(&[
            FileUpload::from_bytes("foo.txt", "abcd"),
            FileUpload::from_bytes("bar.txt", "x".repeat(1176)),
        ])
        .await?;
    for file in &added {
        println!(
            "   - {} -> {} ({} bytes)",
            file.path,
            file.hash_str().unwrap_or("?"),
            file.size_u64().unwrap_or(0)
        );
    }

    if let Some(hash) = added.first().and_then(|f| f.hash_str()) {
        let mut content = Vec::new();
        client.files_get(&format!("/ipfs/{}", hash), &mut content).await?;
        println!("📥 Read back: {}", String::from_utf8_lossy(&content));
    }

    // ==================== Blocks ====================

    let stored = client
        .block_put(&FileUpload::from_bytes("block.data", Bytes::from_static(b"block payload")))
        .await?;
    println!("\n🧱 Stored block: {}", stored);

    if let Some(key) = stored["Key"].as_str() {
        let stat = client.block_stat(key).await?;
        println!("   Stat: {}", stat);

        let mut block = Vec::new();
        client.block_get(key, &mut block).await?;
        println!("   Content: {}", String::from_utf8_lossy(&block));
    }

    // ==================== Objects ====================

    let empty = client.object_new().await?;
    println!("\n🌳 New empty object: {}", empty);

    let stored = client
        .object_put(&json!({"Data": "another", "Links": []}))
        .await?;
    println!("   Stored object: {}", stored);

    if let Some(hash) = stored["Hash"].as_str() {
        println!("   Node: {}", client.object_get(hash).await?);
        let data = client.object_data(hash).await?;
        println!("   Data: {}", String::from_utf8_lossy(&data));
        println!("   Stat: {}", client.object_stat(hash).await?);
    }

    println!("\n✨ Done");
    Ok(())
}
