use crate::auth::{
    AccessTokenError, AccessTokenErrorKind, AccessTokenResponse, ApprovalPrompt, BadRequest,
    Redirect,
};
use tracing::{event, Level};
use warp::http::header::{CACHE_CONTROL, LOCATION, PRAGMA, WWW_AUTHENTICATE};
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

impl<T: serde::Serialize + Send> Reply for Redirect<T> {
    fn into_response(self) -> Response {
        match self.location() {
            Ok(location) => warp::reply::with_header(
                warp::reply::with_status(warp::reply(), StatusCode::FOUND),
                LOCATION,
                location,
            )
            .into_response(),
            Err(e) => {
                event!(Level::ERROR, error = %e, uri = %self.uri, "Failed to build redirect");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Rendered by the approval page.
impl Reply for ApprovalPrompt {
    fn into_response(self) -> Response {
        warp::reply::json(&self).into_response()
    }
}

/// Rendered by the error page.
impl Reply for BadRequest {
    fn into_response(self) -> Response {
        #[derive(serde::Serialize)]
        struct ErrorPage {
            error: BadRequest,
        }

        let status = match self {
            BadRequest::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        warp::reply::with_status(warp::reply::json(&ErrorPage { error: self }), status)
            .into_response()
    }
}

impl Reply for AccessTokenResponse {
    fn into_response(self) -> Response {
        let reply = warp::reply::json(&self);
        let reply = warp::reply::with_header(reply, CACHE_CONTROL, "no-store");
        warp::reply::with_header(reply, PRAGMA, "no-cache").into_response()
    }
}

impl Reply for AccessTokenError {
    fn into_response(self) -> Response {
        use AccessTokenErrorKind::*;

        let status = match self.kind {
            InvalidClient => StatusCode::UNAUTHORIZED,
            InvalidRequest | InvalidGrant | UnsupportedGrantType => StatusCode::BAD_REQUEST,
            ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let mut response =
            warp::reply::with_status(warp::reply::json(&self), status).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                WWW_AUTHENTICATE,
                warp::http::HeaderValue::from_static("Basic realm=\"kagi\""),
            );
        }
        response
    }
}
