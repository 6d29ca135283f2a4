use crate::auth::{MaybeRedirect, Redirect, WithState};
use crate::core::types::RedirectUri;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("identifier collision in {0}")]
    Conflict(&'static str),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("invalid client registry: {0}")]
    Registry(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
    #[error("query encoding error: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
    #[error("http server error: {0}")]
    Http(#[from] warp::Error),
}

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

pub trait ResultExt<T, E> {
    fn without_redirect<R>(self) -> Result<T, MaybeRedirect<R, E>>;
    fn add_redirect_context<D>(self, uri: RedirectUri) -> Result<T, MaybeRedirect<E, D>>;
    fn add_state_context(self, state: &Option<String>) -> Result<T, WithState<E>>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn without_redirect<R>(self) -> Result<T, MaybeRedirect<R, E>> {
        self.map_err(MaybeRedirect::Direct)
    }

    fn add_redirect_context<D>(self, uri: RedirectUri) -> Result<T, MaybeRedirect<E, D>> {
        self.map_err(|e| MaybeRedirect::Redirected(Redirect::new(uri, e)))
    }

    fn add_state_context(self, state: &Option<String>) -> Result<T, WithState<E>> {
        self.map_err(|e| WithState {
            state: state.clone(),
            inner: e,
        })
    }
}
