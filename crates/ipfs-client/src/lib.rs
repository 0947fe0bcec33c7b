//! # IPFS Client
//!
//! A client for the IPFS daemon HTTP API (`/api/v0`).
//!
//! ## Features
//!
//! - **Request building**: ordered, repeatable query parameters, each
//!   percent-encoded on its own
//! - **Uploads**: in-memory or on-disk files sent as multipart parts
//! - **Streaming**: raw block and file content written straight into any
//!   `AsyncWrite` sink
//! - **Progress reconciliation**: `add` progress lines folded into one result
//!   per file
//! - **Pluggable transport**: HTTP via reqwest, or [`MemoryTransport`] in tests
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │               IpfsClient                │
//! ├──────────────┬──────────────────────────┤
//! │  ApiRequest  │  parse_json / aggregate  │
//! ├──────────────┴──────────────────────────┤
//! │             Transport Trait             │
//! ├────────────────────┬────────────────────┤
//! │   HttpTransport    │  MemoryTransport   │
//! └────────────────────┴────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use ipfs_client::{FileUpload, IpfsClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = IpfsClient::from_host_port("localhost", 5001)?;
//!
//!     let version = client.version().await?;
//!     println!("daemon version: {}", version["Version"]);
//!
//!     let added = client
//!         .files_add(&[FileUpload::from_bytes("foo.txt", "abcd")])
//!         .await?;
//!     println!("{} -> {:?}", added[0].path, added[0].hash);
//!
//!     let mut content = Vec::new();
//!     client.files_get("/ipfs/QmWPyMW2u7J2Zyzut7TcBMT8pG6F2cB4hmZk1vBJFBt1nP", &mut content).await?;
//!
//!     Ok(())
//! }
//! ```

mod add;
mod client;
mod config;
mod error;
mod memory;
pub mod response;
pub mod transport;
pub mod url;

pub use add::{aggregate_add_response, FileAddResult};
pub use client::IpfsClient;
pub use config::{IpfsConfig, API_URL_ENV, DEFAULT_API_URL};
pub use error::{ClientError, Result};
pub use memory::{MemoryTransport, RecordedRequest};
pub use transport::{FileContent, FileUpload, HttpTransport, Transport};
pub use url::{build_url, ApiRequest};

/// Arbitrary JSON document as sent to and received from the daemon
pub use serde_json::Value as Json;
