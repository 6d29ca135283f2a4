use crate::core::types::{AccessToken, AuthCode, ClientId, ClientSecret, GrantType, TokenType};

use super::error::ErrorResponse;
use super::BodyCredentials;

pub type AccessTokenError = ErrorResponse<AccessTokenErrorKind>;

/// Body of `POST /token`, before client credentials are separated from the grant.
#[derive(Debug, Default)]
#[derive(serde::Deserialize)]
pub struct TokenForm {
    pub grant_type: Option<String>,
    pub code: Option<AuthCode>,
    pub client_id: Option<ClientId>,
    pub client_secret: Option<ClientSecret>,
}

impl TokenForm {
    pub fn split(self) -> (BodyCredentials, TokenRequest) {
        let credentials = BodyCredentials {
            client_id: self.client_id,
            client_secret: self.client_secret,
        };
        let req = TokenRequest {
            grant_type: self.grant_type.map(GrantType::from),
            code: self.code,
        };
        (credentials, req)
    }
}

#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub grant_type: Option<GrantType>,
    pub code: Option<AuthCode>,
}

#[derive(serde::Serialize, Debug)]
pub struct AccessTokenResponse {
    pub access_token: AccessToken,
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessTokenErrorKind {
    InvalidRequest,
    InvalidClient,
    InvalidGrant,
    #[serde(rename = "Invalid grant_type")]
    UnsupportedGrantType,
    ServerError,
}

impl From<AccessTokenErrorKind> for AccessTokenError {
    fn from(kind: AccessTokenErrorKind) -> Self {
        ErrorResponse::new(kind)
    }
}
