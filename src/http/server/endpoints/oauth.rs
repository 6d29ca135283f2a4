use std::sync::Arc;

use warp::Filter;

use crate::auth::{
    AccessTokenError, AccessTokenErrorKind, ApprovalRequest, AuthorizationRequest, BadRequest,
    ClientCredentials, ClientInfo, CredentialsError, TokenRequest,
};
use crate::http::encoding::{self, reply};
use crate::provider::OAuth2Provider;

use tracing::{event, Level};

#[derive(Debug, serde::Serialize)]
pub struct ServerInfo {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub clients: Vec<ClientInfo>,
}

pub fn oauth_endpoint(
    provider: Arc<OAuth2Provider>,
    issuer: String,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_provider = warp::any().map(move || provider.clone());
    let with_issuer = warp::any().map(move || issuer.clone());

    let index = warp::path::end()
        .and(warp::get())
        .and(with_provider.clone())
        .and(with_issuer)
        .and_then(|provider: Arc<OAuth2Provider>, issuer: String| async move {
            let issuer = issuer.trim_end_matches('/');
            let info = provider.registered_clients().map(|clients| ServerInfo {
                authorization_endpoint: format!("{}/authorize", issuer),
                token_endpoint: format!("{}/token", issuer),
                clients: clients.iter().map(ClientInfo::from).collect(),
            });
            reply::json_encode(info.map_err(|e| {
                event!(Level::ERROR, error = %e, "Failed to list clients");
                BadRequest::ServerError
            }))
        });

    // Renders either the approval prompt or an error page; never redirects.
    let authorize = warp::path!("authorize")
        .and(warp::get())
        .and(with_provider.clone())
        .and(warp::query())
        .and_then(|provider: Arc<OAuth2Provider>, req: AuthorizationRequest| async move {
            reply::reply(provider.authorization_request(req).await)
        });

    let approve = warp::path!("approve")
        .and(warp::post())
        .and(with_provider.clone())
        .and(encoding::form())
        .and_then(|provider: Arc<OAuth2Provider>, req: ApprovalRequest| async move {
            reply::reply(provider.approval_request(req).await)
        });

    // Either a direct success or a direct error
    let token = warp::path!("token")
        .and(warp::post())
        .and(with_provider)
        .and(encoding::body_with_credentials())
        .and_then(
            |provider: Arc<OAuth2Provider>,
             (credentials, req): (Result<ClientCredentials, CredentialsError>, TokenRequest)| async move {
                let credentials = reply::accept(credentials.map_err(|e| {
                    event!(Level::INFO, reason = %e, "Rejected client credentials");
                    AccessTokenError::from(AccessTokenErrorKind::InvalidClient)
                }))?;
                reply::reply(provider.access_token_request(credentials, req).await)
            },
        );

    index.or(authorize).or(approve).or(token)
}
