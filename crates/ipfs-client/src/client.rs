//! Main client implementation

use crate::{
    add::{aggregate_add_response, FileAddResult},
    response::{body_text, parse_json, require_field, unwrap_config_value},
    transport::{FileUpload, HttpTransport, Transport},
    url::ApiRequest,
    ClientError, IpfsConfig, Json, Result,
};
use bytes::Bytes;
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tracing::instrument;

/// IPFS HTTP API client
///
/// Every call is a single request through the configured [`Transport`]. The
/// client keeps no state between calls, so clones can be used from as many
/// tasks as the transport tolerates.
#[derive(Clone)]
pub struct IpfsClient {
    config: IpfsConfig,
    prefix: String,
    transport: Arc<dyn Transport>,
}

impl IpfsClient {
    /// Create a new client talking HTTP to the configured daemon
    pub fn new(config: IpfsConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client on top of any transport
    pub fn with_transport(config: IpfsConfig, transport: Arc<dyn Transport>) -> Self {
        let prefix = config.api_prefix();
        Self {
            config,
            prefix,
            transport,
        }
    }

    /// Create for a daemon at `host:port`
    pub fn from_host_port(host: &str, port: u16) -> Result<Self> {
        Self::new(IpfsConfig::from_host_port(host, port))
    }

    /// Create with default config
    pub fn default_local() -> Result<Self> {
        Self::new(IpfsConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &IpfsConfig {
        &self.config
    }

    // ==================== Generic ====================

    /// Identity of the peer; contains at least `ID`, `PublicKey` and `Addresses`
    #[instrument(skip(self))]
    pub async fn id(&self) -> Result<Json> {
        self.fetch_json(ApiRequest::new("id"), &[]).await
    }

    /// Implementation version of the peer; contains at least `Version`,
    /// `Repo` and `System`
    #[instrument(skip(self))]
    pub async fn version(&self) -> Result<Json> {
        self.fetch_json(ApiRequest::new("version"), &[]).await
    }

    // ==================== Config ====================

    /// Fetch the config of the peer.
    ///
    /// An empty `key` returns the whole config. Otherwise only the value
    /// stored under `key` is returned, without the `Key`/`Value` envelope the
    /// daemon wraps it in.
    #[instrument(skip(self))]
    pub async fn config_get(&self, key: &str) -> Result<Json> {
        if key.is_empty() {
            return self.fetch_json(ApiRequest::new("config/show"), &[]).await;
        }

        let document = self.fetch_json(ApiRequest::new("config").arg(key), &[]).await?;
        unwrap_config_value(document)
    }

    /// Add or replace one config knob
    #[instrument(skip(self, value))]
    pub async fn config_set(&self, key: &str, value: &Json) -> Result<()> {
        let request = ApiRequest::new("config").arg(key).arg(value.to_string());
        self.fetch_json(request, &[]).await?;
        Ok(())
    }

    /// Replace the entire config of the peer
    #[instrument(skip(self, config))]
    pub async fn config_replace(&self, config: &Json) -> Result<()> {
        // Sent as a file since the document easily exceeds the query size limit.
        let upload = FileUpload::from_json("new_config.json", config);
        let mut discard = tokio::io::sink();
        self.fetch_into(ApiRequest::new("config/replace"), &[upload], &mut discard)
            .await
    }

    // ==================== Block ====================

    /// Stream the raw content of a block into `sink`
    #[instrument(skip(self, sink))]
    pub async fn block_get<W>(&self, block_id: &str, sink: &mut W) -> Result<()>
    where
        W: AsyncWrite + Send + Unpin,
    {
        self.fetch_into(ApiRequest::new("block/get").arg(block_id), &[], sink)
            .await
    }

    /// Store a raw block; the answer holds its `Key` and `Size`
    #[instrument(skip(self, block), fields(name = %block.name))]
    pub async fn block_put(&self, block: &FileUpload) -> Result<Json> {
        self.fetch_json(ApiRequest::new("block/put"), std::slice::from_ref(block))
            .await
    }

    /// Information about a block
    #[instrument(skip(self))]
    pub async fn block_stat(&self, block_id: &str) -> Result<Json> {
        self.fetch_json(ApiRequest::new("block/stat").arg(block_id), &[])
            .await
    }

    // ==================== Files ====================

    /// Stream the content of a file, e.g. `/ipfs/Qm.../readme`, into `sink`
    #[instrument(skip(self, sink))]
    pub async fn files_get<W>(&self, path: &str, sink: &mut W) -> Result<()>
    where
        W: AsyncWrite + Send + Unpin,
    {
        self.fetch_into(ApiRequest::new("cat").arg(path), &[], sink)
            .await
    }

    /// Add files, returning one result per file in the order the daemon first
    /// reported them
    #[instrument(skip(self, files), fields(files = files.len()))]
    pub async fn files_add(&self, files: &[FileUpload]) -> Result<Vec<FileAddResult>> {
        let body = self
            .fetch_text(ApiRequest::new("add").param("progress", "true"), files)
            .await?;
        aggregate_add_response(&body)
    }

    // ==================== Object ====================

    /// Create a new, empty MerkleDAG node and return its id
    #[instrument(skip(self))]
    pub async fn object_new(&self) -> Result<String> {
        let response = self.fetch_json(ApiRequest::new("object/new"), &[]).await?;
        match require_field(&response, "Hash")? {
            Json::String(hash) => Ok(hash.clone()),
            other => Err(ClientError::MalformedResponse {
                message: format!("\"Hash\" is not a string: {}", other),
                body: response.to_string(),
            }),
        }
    }

    /// Store a MerkleDAG node given as JSON, e.g.
    /// `{"Data": "abc", "Links": [{"Name": "l", "Hash": "Qm...", "Size": 8}]}`
    #[instrument(skip(self, object))]
    pub async fn object_put(&self, object: &Json) -> Result<Json> {
        let upload = FileUpload::from_json("node.json", object);
        self.fetch_json(ApiRequest::new("object/put").param("inputenc", "json"), &[upload])
            .await
    }

    /// Fetch a MerkleDAG node
    #[instrument(skip(self))]
    pub async fn object_get(&self, object_id: &str) -> Result<Json> {
        self.fetch_json(ApiRequest::new("object/get").arg(object_id), &[])
            .await
    }

    /// Raw data field of a MerkleDAG node
    #[instrument(skip(self))]
    pub async fn object_data(&self, object_id: &str) -> Result<Bytes> {
        let body = self
            .fetch_buffered(ApiRequest::new("object/data").arg(object_id), &[])
            .await?;
        Ok(Bytes::from(body))
    }

    /// Stats of a MerkleDAG node, e.g. `NumLinks`, `BlockSize`, `LinksSize`
    #[instrument(skip(self))]
    pub async fn object_stat(&self, object_id: &str) -> Result<Json> {
        self.fetch_json(ApiRequest::new("object/stat").arg(object_id), &[])
            .await
    }

    // ==================== Helper Methods ====================

    /// Render a request into a full URL
    pub fn url_for(&self, request: &ApiRequest) -> String {
        request.to_url(&self.prefix, |raw| self.transport.url_encode(raw))
    }

    async fn fetch_into<W>(
        &self,
        request: ApiRequest,
        files: &[FileUpload],
        sink: &mut W,
    ) -> Result<()>
    where
        W: AsyncWrite + Send + Unpin,
    {
        let url = self.url_for(&request);
        tracing::debug!(url = %url, files = files.len(), "Dispatching IPFS request");
        self.transport.fetch(&url, files, sink).await
    }

    async fn fetch_buffered(&self, request: ApiRequest, files: &[FileUpload]) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        self.fetch_into(request, files, &mut body).await?;
        Ok(body)
    }

    async fn fetch_text(&self, request: ApiRequest, files: &[FileUpload]) -> Result<String> {
        body_text(self.fetch_buffered(request, files).await?)
    }

    async fn fetch_json(&self, request: ApiRequest, files: &[FileUpload]) -> Result<Json> {
        let body = self.fetch_text(request, files).await?;
        parse_json(&body)
    }
}
