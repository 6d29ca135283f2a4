use crate::auth::{
    ApprovalRequest, AuthorizationCodeResponse, AuthorizationError, AuthorizationErrorKind,
    AuthorizationErrorResponse, BadRequest, ErrorResponse, MaybeRedirect, Redirect,
};
use crate::core::models::AuthCodeData;
use crate::core::types::{AuthCode, RedirectUri, ResponseType};
use crate::provider::error::ResultExt;
use crate::util::{hash::hash_without_salt, random::FromRandom};

use tracing::{event, Level};

use super::OAuth2Provider;

fn redirect_error(
    uri: RedirectUri,
    state: Option<String>,
    kind: AuthorizationErrorKind,
) -> AuthorizationError {
    let params: AuthorizationErrorResponse = (ErrorResponse::new(kind), state).into();
    MaybeRedirect::Redirected(Redirect::new(uri, params))
}

impl OAuth2Provider {
    /// Resolves a pending request with the resource owner's decision.
    ///
    /// The pending request is consumed whatever the outcome, so a replayed approval
    /// form always ends in [`BadRequest::RequestNotFound`].
    #[tracing::instrument(skip_all, fields(approved = req.approved()))]
    pub async fn approval_request(
        &self,
        req: ApprovalRequest,
    ) -> Result<Redirect<AuthorizationCodeResponse>, AuthorizationError> {
        let approved = req.approved();

        let pending = match &req.reqid {
            Some(id) => self
                .requests
                .take_request(id)
                .map_err(|e| {
                    event!(Level::ERROR, error = %e, "Failed to take authorization request");
                    BadRequest::ServerError
                })
                .without_redirect::<AuthorizationErrorResponse>()?,
            None => None,
        };
        let pending = pending
            .ok_or_else(|| {
                event!(Level::INFO, "No matching authorization request");
                BadRequest::RequestNotFound
            })
            .without_redirect::<AuthorizationErrorResponse>()?;

        let uri = pending.redirect_uri;
        let state = pending.state;

        if !approved {
            event!(Level::DEBUG, client_id = ?pending.client_id, "Access denied by resource owner");
            return Err(redirect_error(uri, state, AuthorizationErrorKind::AccessDenied));
        }

        match pending.response_type {
            ResponseType::Code => {
                let code = AuthCode::from_random();
                let data = AuthCodeData {
                    code: hash_without_salt(&code),
                    client_id: pending.client_id.clone(),
                    redirect_uri: uri.clone(),
                    state: state.clone(),
                };

                self.codes
                    .store_code(data)
                    .map_err(|e| {
                        event!(Level::ERROR, error = %e, "Failed to store authorization code");
                        ErrorResponse::new(AuthorizationErrorKind::ServerError)
                    })
                    .add_state_context(&state)
                    .add_redirect_context::<BadRequest>(uri.clone())?;

                event!(Level::DEBUG, client_id = ?pending.client_id, "Issuing authorization code");
                Ok(Redirect::new(uri, AuthorizationCodeResponse::new(code, state)))
            }
            ResponseType::Unsupported(response_type) => {
                event!(Level::INFO, %response_type, "Unsupported response_type");
                Err(redirect_error(
                    uri,
                    state,
                    AuthorizationErrorKind::UnsupportedResponseType,
                ))
            }
        }
    }
}
