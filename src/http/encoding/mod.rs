pub mod error;
pub mod reply;

use crate::auth::{credentials, ClientCredentials, CredentialsError, TokenForm, TokenRequest};
use warp::{Filter, Rejection};

/// Upper bound on form bodies; the forms handled here are a handful of short fields.
pub const FORM_LIMIT: u64 = 16 * 1024;

pub fn form<T: serde::de::DeserializeOwned + Send>(
) -> impl Filter<Extract = (T,), Error = Rejection> + Clone {
    warp::body::content_length_limit(FORM_LIMIT).and(warp::body::form::<T>())
}

/// Extracts the client credentials and the grant from a token request.
///
/// Credential resolution is left unresolved in the extracted value so the endpoint can
/// answer with a protocol error instead of a generic rejection.
pub fn body_with_credentials(
) -> impl Filter<Extract = ((Result<ClientCredentials, CredentialsError>, TokenRequest),), Error = Rejection>
       + Clone {
    warp::header::optional::<String>("authorization")
        .and(form::<TokenForm>())
        .map(|header: Option<String>, form: TokenForm| {
            let (body, req) = form.split();
            (credentials::resolve(header.as_deref(), body), req)
        })
}
