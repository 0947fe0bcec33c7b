//! Response decoding
//!
//! The daemon is expected to always answer with well-formed JSON. When it does
//! not, the body is most likely an error page, a truncated transfer or the
//! answer of an endpoint that was misused, so every decoding error keeps the
//! full text it failed on.

use crate::{ClientError, Result};
use serde_json::Value as Json;

/// Interpret a buffered body as UTF-8 text
pub fn body_text(body: Vec<u8>) -> Result<String> {
    String::from_utf8(body).map_err(|e| ClientError::MalformedResponse {
        message: e.utf8_error().to_string(),
        body: String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Parse a JSON document
pub fn parse_json(text: &str) -> Result<Json> {
    serde_json::from_str(text).map_err(|e| ClientError::MalformedResponse {
        message: e.to_string(),
        body: text.to_string(),
    })
}

/// Look up a field the caller cannot do without
pub fn require_field<'a>(document: &'a Json, field: &'static str) -> Result<&'a Json> {
    document.get(field).ok_or_else(|| ClientError::MissingField {
        field,
        document: document.to_string(),
    })
}

/// Strip the `{"Key": .., "Value": ..}` envelope of a keyed config lookup
pub fn unwrap_config_value(mut document: Json) -> Result<Json> {
    require_field(&document, "Value")?;
    Ok(document["Value"].take())
}
