#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize)]
pub struct ErrorResponse<K> {
    #[serde(rename = "error")]
    pub kind: K,
    #[serde(rename = "error_description")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "error_uri")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl<K> ErrorResponse<K> {
    pub fn new(kind: K) -> Self {
        Self {
            kind,
            description: None,
            uri: None,
        }
    }
}

/// Errors shown to the resource owner instead of being redirected, because no trusted
/// redirect URI is known when they occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BadRequest {
    #[error("Unknown client")]
    UnknownClient,
    #[error("Invalid redirect_uris")]
    BadRedirect,
    #[error("No matching authorization request")]
    RequestNotFound,
    #[error("server_error")]
    ServerError,
}

impl serde::Serialize for BadRequest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
