//! Endpoint URL construction

/// Query flags every API call carries ahead of its own parameters
pub const FIXED_QUERY: &str = "stream-channels=true&json=true&encoding=json";

/// One API call in the making: an endpoint path plus ordered query parameters.
///
/// Parameter order is kept as given and names may repeat; `config` for
/// instance reads the key from the first `arg` and the value from the second.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ApiRequest {
    path: String,
    params: Vec<(String, String)>,
}

impl ApiRequest {
    /// Start a request for an endpoint path such as `"block/get"`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Append a positional `arg` parameter
    pub fn arg(self, value: impl Into<String>) -> Self {
        self.param("arg", value)
    }

    /// Append a named parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Endpoint path
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Parameters in insertion order
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Render against `prefix`, percent-encoding with `encode`
    pub fn to_url(&self, prefix: &str, encode: impl Fn(&str) -> String) -> String {
        build_url(prefix, &self.path, &self.params, encode)
    }
}

/// Build `prefix/path?<fixed flags>&name=value...`.
///
/// Each name and value is encoded on its own, so `&` and `=` inside them can
/// never split a pair.
pub fn build_url<F>(prefix: &str, path: &str, params: &[(String, String)], encode: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut url = format!("{}/{}?{}", prefix, path, FIXED_QUERY);

    for (name, value) in params {
        url.push('&');
        url.push_str(&encode(name));
        url.push('=');
        url.push_str(&encode(value));
    }

    url
}
