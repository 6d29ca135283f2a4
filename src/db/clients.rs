use std::collections::BTreeMap;
use std::path::Path;

use crate::auth::ClientRegistry;
use crate::core::models::Client;
use crate::core::types::{ClientId, RedirectUri};
use crate::provider::error::Error;

use super::models::ClientRecord;

use tracing::{event, Level};

/// Clients loaded once at startup and never modified afterwards.
#[derive(Debug, Default)]
pub struct StaticClientRegistry {
    clients: BTreeMap<ClientId, Client>,
}

impl StaticClientRegistry {
    pub fn from_clients(clients: impl IntoIterator<Item = Client>) -> Result<Self, Error> {
        let mut map = BTreeMap::new();
        for client in clients {
            validate_client(&client)?;
            let id = client.id.clone();
            if map.insert(id.clone(), client).is_some() {
                return Err(Error::Registry(format!("duplicate client_id {}", id)));
            }
        }
        Ok(Self { clients: map })
    }

    pub fn from_records(records: Vec<ClientRecord>) -> Result<Self, Error> {
        Self::from_clients(records.into_iter().map(Client::from))
    }

    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self, Error> {
        let records = read_records(path)?;
        let registry = Self::from_records(records)?;
        event!(Level::INFO, clients = registry.clients.len(), "Loaded client registry");
        Ok(registry)
    }
}

pub fn read_records(path: &Path) -> Result<Vec<ClientRecord>, Error> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn write_records(path: &Path, records: &[ClientRecord]) -> Result<(), Error> {
    let mut contents = serde_json::to_string_pretty(records)?;
    contents.push('\n');
    std::fs::write(path, contents)?;
    Ok(())
}

fn validate_client(client: &Client) -> Result<(), Error> {
    if client.id.0.is_empty() {
        return Err(Error::Registry("empty client_id".to_string()));
    }
    if client.secret.0.is_empty() {
        return Err(Error::Registry(format!("empty client_secret for {}", client.id)));
    }
    for uri in &client.redirect_uris {
        validate_redirect_uri(uri)
            .map_err(|e| Error::Registry(format!("client {}: {}", client.id, e)))?;
    }
    Ok(())
}

/// Registered redirect URIs must be absolute and must not carry a fragment.
pub fn validate_redirect_uri(uri: &RedirectUri) -> Result<(), String> {
    let parsed = url::Url::parse(uri.as_ref()).map_err(|e| format!("redirect_uri {}: {}", uri, e))?;
    if parsed.fragment().is_some() {
        return Err(format!("redirect_uri {} has a fragment", uri));
    }
    Ok(())
}

impl ClientRegistry for StaticClientRegistry {
    fn get_client(&self, client_id: &ClientId) -> Result<Option<Client>, Error> {
        Ok(self.clients.get(client_id).cloned())
    }

    fn clients(&self) -> Result<Vec<Client>, Error> {
        Ok(self.clients.values().cloned().collect())
    }
}
