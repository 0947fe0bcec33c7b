//! In-memory transport for testing

use crate::transport::{percent_encode, FileUpload, Transport};
use crate::{ClientError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// A request observed by [`MemoryTransport`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Full URL as built by the client
    pub url: String,
    /// Uploaded parts as `(name, content)`, path-backed uploads already read
    pub files: Vec<(String, Bytes)>,
}

enum Reply {
    Body(Bytes),
    Failure(String),
}

/// Transport that answers from a queue of canned replies and records every
/// request it sees. Clones share the same queue and log.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MemoryTransport {
    /// Create a transport with no queued replies
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply body
    pub fn push_body(&self, body: impl Into<Bytes>) -> &Self {
        self.replies.lock().push_back(Reply::Body(body.into()));
        self
    }

    /// Queue a transport failure
    pub fn push_failure(&self, message: impl Into<String>) -> &Self {
        self.replies.lock().push_back(Reply::Failure(message.into()));
        self
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().last().cloned()
    }

    /// Number of replies not consumed yet
    pub fn pending_replies(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn fetch(
        &self,
        url: &str,
        files: &[FileUpload],
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<()> {
        let mut parts = Vec::with_capacity(files.len());
        for file in files {
            parts.push((file.name.clone(), file.read().await?));
        }
        self.requests.lock().push(RecordedRequest {
            url: url.to_string(),
            files: parts,
        });

        let reply = self.replies.lock().pop_front();
        match reply {
            Some(Reply::Body(body)) => {
                sink.write_all(&body).await?;
                sink.flush().await?;
                Ok(())
            }
            Some(Reply::Failure(message)) => Err(ClientError::Transport(message)),
            None => Err(ClientError::Transport(format!("no reply queued for {}", url))),
        }
    }

    fn url_encode(&self, raw: &str) -> String {
        percent_encode(raw)
    }
}
