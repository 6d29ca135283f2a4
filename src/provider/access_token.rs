use crate::auth::{
    AccessTokenError, AccessTokenErrorKind, AccessTokenResponse, ClientCredentials, TokenRequest,
};
use crate::core::types::GrantType;
use crate::provider::token::TokenService;
use crate::util::hash::hash_without_salt;

use super::OAuth2Provider;

use tracing::{event, Level};

impl OAuth2Provider {
    /// Exchanges an authorization code for an access token.
    ///
    /// The code is removed from the store as soon as it is looked up, before the client
    /// binding is checked, so a code never survives a failed redemption.
    #[tracing::instrument(skip_all, fields(client_id = ?credentials.client_id))]
    pub async fn access_token_request(
        &self,
        credentials: ClientCredentials,
        req: TokenRequest,
    ) -> Result<AccessTokenResponse, AccessTokenError> {
        event!(Level::TRACE, "Handling access token request");
        let client = self.check_client_authentication(&credentials)?;

        match req.grant_type {
            Some(GrantType::AuthorizationCode) => {}
            other => {
                event!(Level::INFO, grant_type = ?other, "Unsupported grant_type");
                return Err(AccessTokenErrorKind::UnsupportedGrantType.into());
            }
        }

        let code = req.code.ok_or(AccessTokenErrorKind::InvalidGrant)?;
        let data = self
            .codes
            .take_code(&hash_without_salt(&code))
            .map_err(|e| {
                event!(Level::ERROR, error = %e, "Failed to take authorization code");
                AccessTokenErrorKind::ServerError
            })?
            .ok_or_else(|| {
                event!(Level::INFO, "Unknown or already redeemed authorization code");
                AccessTokenErrorKind::InvalidGrant
            })?;

        if data.client_id != client.id {
            event!(
                Level::WARN,
                original_client_id = ?data.client_id,
                redeeming_client_id = ?client.id,
                "client_ids do not match"
            );
            return Err(AccessTokenErrorKind::InvalidGrant.into());
        }

        let record = self.token.new_token(&client.id);
        self.audit.record(&record).await.map_err(|e| {
            event!(Level::ERROR, error = %e, "Failed to record issued access token");
            AccessTokenErrorKind::ServerError
        })?;

        Ok(AccessTokenResponse {
            access_token: record.token,
            token_type: TokenService::token_type(),
        })
    }
}
