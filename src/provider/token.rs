use crate::core::models::AccessTokenRecord;
use crate::core::types::{unix_timestamp, AccessToken, ClientId, TokenType};
use crate::util::random::FromRandom;

use tracing::{event, Level};

/// Mints opaque bearer tokens. Tokens carry no claims; the audit log is the only
/// place they are written down.
#[derive(Debug, Default)]
pub struct TokenService;

impl TokenService {
    pub fn token_type() -> TokenType {
        TokenType::Bearer
    }

    #[tracing::instrument(skip(self))]
    pub fn new_token(&self, client_id: &ClientId) -> AccessTokenRecord {
        let record = AccessTokenRecord {
            token: AccessToken::from_random(),
            client_id: client_id.clone(),
            token_type: Self::token_type(),
            issued_at: unix_timestamp(),
        };
        event!(Level::DEBUG, "Issuing access_token");
        record
    }
}
