use crate::auth::{
    AccessTokenError, AccessTokenErrorKind, AuthorizationError, AuthorizationErrorResponse,
    BadRequest, MaybeRedirect, Redirect,
};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

#[derive(Debug, Clone)]
pub enum AuthRejection {
    Authorization(Redirect<AuthorizationErrorResponse>),
    AccessToken(AccessTokenError),
    BadRequest(BadRequest),
}

impl warp::reject::Reject for AuthRejection {}

impl From<AuthorizationError> for AuthRejection {
    fn from(error: AuthorizationError) -> Self {
        match error {
            MaybeRedirect::Redirected(r) => Self::Authorization(r),
            MaybeRedirect::Direct(d) => Self::BadRequest(d),
        }
    }
}

impl From<BadRequest> for AuthRejection {
    fn from(error: BadRequest) -> Self {
        Self::BadRequest(error)
    }
}

impl From<AccessTokenError> for AuthRejection {
    fn from(error: AccessTokenError) -> Self {
        Self::AccessToken(error)
    }
}

impl Reply for AuthRejection {
    fn into_response(self) -> warp::reply::Response {
        match self {
            Self::Authorization(e) => e.into_response(),
            Self::AccessToken(e) => e.into_response(),
            Self::BadRequest(e) => e.into_response(),
        }
    }
}

/// Turns protocol failures and malformed input into responses; anything else (unknown
/// paths, wrong methods) falls through to warp's defaults.
pub async fn handle_reject(err: Rejection) -> Result<warp::reply::Response, Rejection> {
    if let Some(e) = err.find::<AuthRejection>() {
        return Ok(e.clone().into_response());
    }

    let malformed = err.find::<warp::reject::InvalidQuery>().is_some()
        || err.find::<warp::body::BodyDeserializeError>().is_some();
    if malformed {
        let body = AccessTokenError::from(AccessTokenErrorKind::InvalidRequest);
        return Ok(
            warp::reply::with_status(warp::reply::json(&body), StatusCode::BAD_REQUEST)
                .into_response(),
        );
    }

    Err(err)
}
