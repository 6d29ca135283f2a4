use std::collections::BTreeSet;

use super::types::*;

#[derive(Clone, Debug)]
pub struct Client {
    pub id: ClientId,
    pub secret: ClientSecret,
    pub redirect_uris: BTreeSet<RedirectUri>,
}

impl Client {
    pub fn allows_redirect(&self, uri: &RedirectUri) -> bool {
        self.redirect_uris.contains(uri)
    }
}

/// An `/authorize` request waiting for the resource owner's decision.
#[derive(Clone, Debug)]
pub struct PendingAuthRequest {
    pub id: RequestId,
    pub client_id: ClientId,
    pub redirect_uri: RedirectUri,
    pub response_type: ResponseType,
    pub state: Option<String>,
}

impl Expire for PendingAuthRequest {
    const EXPIRES_IN_SECS: u64 = 5 * 60;
}

/// An issued authorization code, keyed by the digest of the code itself.
#[derive(Clone, Debug)]
pub struct AuthCodeData {
    pub code: HashedAuthCode,
    pub client_id: ClientId,
    pub redirect_uri: RedirectUri,
    pub state: Option<String>,
}

impl Expire for AuthCodeData {
    const EXPIRES_IN_SECS: u64 = 10 * 60;
}

/// What the audit log learns about an issued access token.
#[derive(Clone, Debug, serde::Serialize)]
pub struct AccessTokenRecord {
    #[serde(rename = "access_token")]
    pub token: AccessToken,
    pub client_id: ClientId,
    pub token_type: TokenType,
    pub issued_at: u64,
}
