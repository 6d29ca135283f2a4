use crate::core::models::{AccessTokenRecord, AuthCodeData, Client, PendingAuthRequest};
use crate::core::types::{ClientId, HashedAuthCode, RedirectUri, RequestId};

pub mod access_token;
pub mod authorization;
pub mod credentials;
pub mod error;

pub use access_token::*;
pub use authorization::*;
pub use credentials::*;
pub use error::{BadRequest, ErrorResponse};

use crate::provider::error::Error;

#[derive(Debug)]
pub enum MaybeRedirect<R, D> {
    Redirected(Redirect<R>),
    Direct(D),
}

#[derive(Debug, Clone)]
#[derive(serde::Serialize)]
pub struct WithState<T> {
    #[serde(flatten)]
    pub inner: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl<T> From<(T, Option<String>)> for WithState<T> {
    fn from((t, state): (T, Option<String>)) -> Self {
        Self { inner: t, state }
    }
}

#[derive(Debug, Clone)]
pub struct Redirect<T> {
    pub uri: RedirectUri,
    pub params: T,
}

impl<T> Redirect<T> {
    pub fn new(uri: RedirectUri, params: T) -> Self {
        Redirect { uri, params }
    }
}

impl<T: serde::Serialize> Redirect<T> {
    /// The final location: `uri` with `params` merged into its query.
    pub fn location(&self) -> Result<String, Error> {
        crate::util::url::build_url(self.uri.as_ref(), &self.params, None)
    }
}

/// Registered clients, fixed for the lifetime of the process.
pub trait ClientRegistry: Send + Sync {
    fn get_client(&self, client_id: &ClientId) -> Result<Option<Client>, Error>;
    fn clients(&self) -> Result<Vec<Client>, Error>;
}

/// Authorization requests awaiting the resource owner's decision.
///
/// `take_request` must remove and return the entry in one step so that a request id
/// resolves at most once.
pub trait PendingRequestStore: Send + Sync {
    fn store_request(&self, req: PendingAuthRequest) -> Result<RequestId, Error>;
    fn take_request(&self, id: &RequestId) -> Result<Option<PendingAuthRequest>, Error>;
    fn clean_up(&self) -> Result<usize, Error>;
}

/// Issued, unredeemed authorization codes.
///
/// `take_code` must remove and return the entry in one step so that two concurrent
/// redemptions of the same code cannot both succeed.
pub trait AuthCodeStore: Send + Sync {
    fn store_code(&self, data: AuthCodeData) -> Result<(), Error>;
    fn take_code(&self, code: &HashedAuthCode) -> Result<Option<AuthCodeData>, Error>;
    fn clean_up(&self) -> Result<usize, Error>;
}

/// Append-only record of issued access tokens.
#[async_trait::async_trait]
pub trait TokenAuditSink: Send + Sync {
    async fn record(&self, token: &AccessTokenRecord) -> Result<(), Error>;
}
