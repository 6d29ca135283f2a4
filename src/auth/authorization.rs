use crate::auth::error::{BadRequest, ErrorResponse};
use crate::core::models::Client;
use crate::core::types::{AuthCode, ClientId, RedirectUri, RequestId};

use super::{MaybeRedirect, WithState};

pub type AuthorizationErrorResponse = WithState<ErrorResponse<AuthorizationErrorKind>>;
pub type AuthorizationError = MaybeRedirect<AuthorizationErrorResponse, BadRequest>;

/// Query of `GET /authorize`. Every field is optional on the wire; absence is
/// reported by the provider, not by the decoder.
#[derive(Debug, Clone, Default)]
#[derive(serde::Deserialize)]
pub struct AuthorizationRequest {
    pub client_id: Option<ClientId>,
    pub redirect_uri: Option<RedirectUri>,
    pub response_type: Option<String>,
    pub state: Option<String>,
}

/// Public view of a registered client.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize)]
pub struct ClientInfo {
    pub client_id: ClientId,
    pub redirect_uris: Vec<RedirectUri>,
}

impl From<&Client> for ClientInfo {
    fn from(client: &Client) -> Self {
        Self {
            client_id: client.id.clone(),
            redirect_uris: client.redirect_uris.iter().cloned().collect(),
        }
    }
}

/// Everything the approval page needs to ask the resource owner for a decision.
#[derive(Debug, Clone)]
#[derive(serde::Serialize)]
pub struct ApprovalPrompt {
    pub client: ClientInfo,
    #[serde(rename = "reqid")]
    pub request_id: RequestId,
}

/// Form posted to `/approve`.
#[derive(Debug, Clone, Default)]
#[derive(serde::Deserialize)]
pub struct ApprovalRequest {
    pub reqid: Option<RequestId>,
    pub approve: Option<String>,
}

impl ApprovalRequest {
    /// The approve button submits a non-empty value; any other submission is a denial.
    pub fn approved(&self) -> bool {
        matches!(&self.approve, Some(v) if !v.is_empty())
    }
}

#[derive(Debug, Clone)]
#[derive(serde::Serialize)]
pub struct AuthorizationCodeResponse {
    pub code: AuthCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl AuthorizationCodeResponse {
    pub fn new(code: AuthCode, state: Option<String>) -> Self {
        Self { code, state }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationErrorKind {
    AccessDenied,
    UnsupportedResponseType,
    ServerError,
}

impl From<AuthorizationErrorKind> for ErrorResponse<AuthorizationErrorKind> {
    fn from(kind: AuthorizationErrorKind) -> Self {
        ErrorResponse::new(kind)
    }
}
