//! Reconciliation of `add` progress streams
//!
//! With `progress=true` the daemon answers one JSON object per line. A file
//! usually shows up in several lines, byte counts first and its hash last,
//! and lines of different files may interleave:
//!
//! ```text
//! {"Name":"foo.txt","Bytes":4}
//! {"Name":"foo.txt","Hash":"QmWPyMW2u7J2Zyzut7TcBMT8pG6F2cB4hmZk1vBJFBt1nP"}
//! {"Name":"bar.txt","Bytes":1176}
//! {"Name":"bar.txt","Hash":"QmVjQsMgtRsRKpNM8amTCDRuUPriY8tGswsTpo137jPWwL"}
//! ```
//!
//! These fold into one [`FileAddResult`] per file, in the order the files
//! were first mentioned.

use crate::response::parse_json;
use crate::{ClientError, Json, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of adding one file
///
/// `hash` and `size` hold whatever the daemon sent for `Hash` and `Bytes`;
/// normally a string and an integer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAddResult {
    /// File name as reported by the daemon
    pub path: String,
    /// Content identifier, once the daemon reported it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<Json>,
    /// Bytes processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Json>,
}

impl FileAddResult {
    /// Content identifier as text
    pub fn hash_str(&self) -> Option<&str> {
        self.hash.as_ref().and_then(Json::as_str)
    }

    /// Bytes processed as an integer
    pub fn size_u64(&self) -> Option<u64> {
        self.size.as_ref().and_then(Json::as_u64)
    }
}

/// Results keyed by file name, remembering first-seen order
#[derive(Default)]
struct OrderedResults {
    results: Vec<FileAddResult>,
    index: HashMap<String, usize>,
}

impl OrderedResults {
    fn entry(&mut self, name: &str) -> &mut FileAddResult {
        let slot = match self.index.get(name) {
            Some(&slot) => slot,
            None => {
                self.results.push(FileAddResult::default());
                self.index.insert(name.to_string(), self.results.len() - 1);
                self.results.len() - 1
            }
        };
        &mut self.results[slot]
    }

    fn into_vec(self) -> Vec<FileAddResult> {
        self.results
    }
}

/// Value of an optional progress field; `null` counts as absent
fn present(chunk: &Json, field: &str) -> Option<Json> {
    chunk.get(field).filter(|value| !value.is_null()).cloned()
}

/// Fold a complete progress body into one result per file.
///
/// A single bad line fails the whole batch: a partial list of added files
/// cannot be told apart from a successful add of fewer files. Only an
/// unparsable line or a missing or non-string `Name` is bad; `Hash` and
/// `Bytes` are carried over as sent.
pub fn aggregate_add_response(body: &str) -> Result<Vec<FileAddResult>> {
    let mut results = OrderedResults::default();

    for (i, line) in body.trim_end().lines().enumerate() {
        let line_number = i + 1;

        let chunk = parse_json(line).map_err(|e| ClientError::MalformedLine {
            line: line_number,
            message: match e {
                ClientError::MalformedResponse { message, .. } => message,
                other => other.to_string(),
            },
            body: body.to_string(),
        })?;

        let name = match chunk.get("Name") {
            None => {
                return Err(ClientError::MissingName {
                    line: line_number,
                    body: body.to_string(),
                })
            }
            Some(Json::String(name)) => name.clone(),
            Some(other) => {
                return Err(ClientError::MalformedLine {
                    line: line_number,
                    message: format!("\"Name\" is not a string: {}", other),
                    body: body.to_string(),
                })
            }
        };

        let result = results.entry(&name);
        result.path = name;
        if let Some(hash) = present(&chunk, "Hash") {
            result.hash = Some(hash);
        }
        if let Some(bytes) = present(&chunk, "Bytes") {
            result.size = Some(bytes);
        }
    }

    let results = results.into_vec();
    tracing::debug!(files = results.len(), "Aggregated add progress");
    Ok(results)
}
