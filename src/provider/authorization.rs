use crate::auth::{ApprovalPrompt, AuthorizationRequest, BadRequest};
use crate::core::models::PendingAuthRequest;
use crate::core::types::{RequestId, ResponseType};
use crate::util::random::FromRandom;

use tracing::{event, Level};

use super::OAuth2Provider;

impl OAuth2Provider {
    /// Validates an `/authorize` request and parks it until the resource owner decides.
    ///
    /// Failures here are never redirected: until the redirect URI is matched against
    /// the client's registration there is nowhere trustworthy to send them.
    #[tracing::instrument(skip_all, fields(client_id = ?req.client_id))]
    pub async fn authorization_request(
        &self,
        req: AuthorizationRequest,
    ) -> Result<ApprovalPrompt, BadRequest> {
        let client = match &req.client_id {
            Some(id) => self.clients.get_client(id).map_err(|e| {
                event!(Level::ERROR, error = %e, "Client lookup failed");
                BadRequest::ServerError
            })?,
            None => None,
        };
        let client = client.ok_or_else(|| {
            event!(Level::INFO, "Unknown client");
            BadRequest::UnknownClient
        })?;

        let redirect_uri = req
            .redirect_uri
            .filter(|uri| client.allows_redirect(uri))
            .ok_or_else(|| {
                event!(Level::INFO, "Redirect URI not registered for client");
                BadRequest::BadRedirect
            })?;

        let pending = PendingAuthRequest {
            id: RequestId::from_random(),
            client_id: client.id.clone(),
            redirect_uri,
            response_type: ResponseType::from(req.response_type.unwrap_or_default()),
            state: req.state,
        };

        let request_id = self.requests.store_request(pending).map_err(|e| {
            event!(Level::ERROR, error = %e, "Failed to store authorization request");
            BadRequest::ServerError
        })?;

        event!(Level::DEBUG, "Awaiting resource owner approval");
        Ok(ApprovalPrompt {
            client: (&client).into(),
            request_id,
        })
    }
}
