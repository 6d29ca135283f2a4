use crate::auth::{
    AccessTokenError, AccessTokenErrorKind, AuthCodeStore, ClientCredentials, ClientRegistry,
    PendingRequestStore, TokenAuditSink,
};
use crate::core::models::Client;
use crate::db::{FileTokenLog, MemoryStore, StaticClientRegistry};
use crate::http::server::Server;
use crate::util::hash::secrets_match;

use std::sync::Arc;
use std::time::Duration;

use tracing::{event, Level};

pub mod access_token;
pub mod approval;
pub mod authorization;
pub mod config;
pub mod error;
pub mod token;

pub use config::Config;
use error::Error;
use token::TokenService;

/// The authorization code flow, from `/authorize` through `/token`.
///
/// Every store is injected, so the provider holds no ambient state of its own.
pub struct OAuth2Provider {
    clients: Arc<dyn ClientRegistry>,
    requests: Arc<dyn PendingRequestStore>,
    codes: Arc<dyn AuthCodeStore>,
    audit: Arc<dyn TokenAuditSink>,
    token: TokenService,
}

impl std::fmt::Debug for OAuth2Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OAuth2Provider {{ ... }}")
    }
}

impl OAuth2Provider {
    pub fn new(
        clients: Arc<dyn ClientRegistry>,
        requests: Arc<dyn PendingRequestStore>,
        codes: Arc<dyn AuthCodeStore>,
        audit: Arc<dyn TokenAuditSink>,
    ) -> Self {
        Self {
            clients,
            requests,
            codes,
            audit,
            token: TokenService,
        }
    }

    pub fn registered_clients(&self) -> Result<Vec<Client>, Error> {
        self.clients.clients()
    }

    fn check_client_authentication(
        &self,
        cred: &ClientCredentials,
    ) -> Result<Client, AccessTokenError> {
        let client = self.clients.get_client(&cred.client_id).map_err(|e| {
            event!(Level::ERROR, error = %e, "Client lookup failed");
            AccessTokenErrorKind::ServerError
        })?;

        match client {
            Some(c) if secrets_match(&cred.client_secret, &c.secret) => Ok(c),
            Some(_) => {
                event!(Level::INFO, "Client secret mismatch");
                Err(AccessTokenErrorKind::InvalidClient.into())
            }
            None => {
                event!(Level::INFO, "Unknown client");
                Err(AccessTokenErrorKind::InvalidClient.into())
            }
        }
    }

    /// Evicts expired requests and codes every `period`. Never returns.
    pub async fn start_clean_up_worker(&self, period: Duration) {
        use tokio::time::interval;

        let mut interval = interval(period);

        loop {
            interval.tick().await;
            if let Err(e) = self.requests.clean_up() {
                event!(Level::ERROR, error = %e, "Failed to clean up authorization requests");
            }
            if let Err(e) = self.codes.clean_up() {
                event!(Level::ERROR, error = %e, "Failed to clean up authorization codes");
            }
        }
    }
}

async fn kagid(config: Config) -> Result<(), Error> {
    let clients = StaticClientRegistry::load(&config.clients_file)?;
    let store = Arc::new(MemoryStore::with_ttl(config.request_ttl(), config.code_ttl()));
    let audit = FileTokenLog::create(&config.audit_log).await?;

    let provider = Arc::new(OAuth2Provider::new(
        Arc::new(clients),
        store.clone(),
        store,
        Arc::new(audit),
    ));

    let _clean_up = {
        let provider = Arc::clone(&provider);
        let period = config.clean_up_interval();
        tokio::spawn(async move { provider.start_clean_up_worker(period).await })
    };

    let server = Server::new(provider, config.issuer.clone());
    server.serve(config.bind).await
}

pub async fn main() -> Result<(), Error> {
    use clap::Parser;

    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();
    let config = Config::parse();
    event!(Level::DEBUG, ?config, "Starting kagid");
    kagid(config).await
}
