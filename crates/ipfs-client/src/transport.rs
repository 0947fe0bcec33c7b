//! Transport seam between the API client and the network
//!
//! The client only ever asks two things of a transport: run one request and
//! stream its body somewhere, and percent-encode a query component. The HTTP
//! implementation lives here; [`crate::MemoryTransport`] is the in-process
//! stand-in used by tests.

use crate::{ClientError, IpfsConfig, Result};
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::{header, multipart, Client};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::instrument;

/// Network capability the client is built on
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request to `url` and write the complete response body to `sink`.
    ///
    /// With a non-empty `files` the request carries a multipart body holding
    /// one part per upload. Any failure before the body is fully delivered is
    /// reported as [`ClientError::Transport`].
    async fn fetch(
        &self,
        url: &str,
        files: &[FileUpload],
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<()>;

    /// Percent-encode one query component
    fn url_encode(&self, raw: &str) -> String;
}

/// Percent-encoding shared by the bundled transports
pub fn percent_encode(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Where the bytes of an upload come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileContent {
    /// Content held in memory
    Bytes(Bytes),
    /// Content read from disk when the request is sent
    Path(PathBuf),
}

/// A named file sent as one multipart part
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    /// File name the daemon reports results under
    pub name: String,
    /// Content source
    pub content: FileContent,
}

impl FileUpload {
    /// Upload in-memory content
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: FileContent::Bytes(data.into()),
        }
    }

    /// Upload the content of a file on disk
    pub fn from_path(name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self {
            name: name.into(),
            content: FileContent::Path(path.as_ref().to_path_buf()),
        }
    }

    /// Upload a JSON document serialized to text
    pub fn from_json(name: impl Into<String>, document: &serde_json::Value) -> Self {
        Self::from_bytes(name, document.to_string())
    }

    /// Resolve the content into memory
    pub async fn read(&self) -> Result<Bytes> {
        match &self.content {
            FileContent::Bytes(data) => Ok(data.clone()),
            FileContent::Path(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    ClientError::Transport(format!(
                        "failed to read {} for upload: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(Bytes::from(data))
            }
        }
    }
}

/// Transport over HTTP using reqwest
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport honouring the timeout and user agent of `config`
    pub fn new(config: &IpfsConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            config
                .user_agent
                .parse()
                .map_err(|_| {
                    ClientError::Config(format!("invalid user agent: {}", config.user_agent))
                })?,
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn build_form(files: &[FileUpload]) -> Result<multipart::Form> {
        let mut form = multipart::Form::new();
        for file in files {
            let data = file.read().await?;
            let length = data.len() as u64;
            let part = multipart::Part::stream_with_length(data, length)
                .file_name(file.name.clone())
                .mime_str("application/octet-stream")
                .map_err(|e| ClientError::Transport(e.to_string()))?;
            form = form.part(file.name.clone(), part);
        }
        Ok(form)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, files, sink), fields(files = files.len()))]
    async fn fetch(
        &self,
        url: &str,
        files: &[FileUpload],
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<()> {
        // The API accepts POST only, with or without a body.
        let mut request = self.client.post(url);
        if !files.is_empty() {
            request = request.multipart(Self::build_form(files).await?);
        }

        tracing::debug!(url = %url, "Sending request to IPFS");
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(status = %status, "Received response from IPFS");

        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, error = %error, "IPFS request failed");
            return Err(ClientError::Transport(format!(
                "request to {} failed with {}: {}",
                url, status, error
            )));
        }

        let mut written = 0usize;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            sink.write_all(&chunk).await?;
            written += chunk.len();
        }
        sink.flush().await?;

        tracing::debug!(bytes = written, "Response body delivered");
        Ok(())
    }

    fn url_encode(&self, raw: &str) -> String {
        percent_encode(raw)
    }
}
