use crate::core::models::Client;
use crate::core::types::{ClientId, ClientSecret, RedirectUri};

/// One entry of the clients file.
#[derive(Debug, Clone)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct ClientRecord {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

impl From<ClientRecord> for Client {
    fn from(record: ClientRecord) -> Self {
        Self {
            id: ClientId(record.client_id),
            secret: ClientSecret(record.client_secret),
            redirect_uris: record.redirect_uris.into_iter().map(RedirectUri).collect(),
        }
    }
}

impl From<&Client> for ClientRecord {
    fn from(client: &Client) -> Self {
        Self {
            client_id: client.id.0.clone(),
            client_secret: client.secret.0.clone(),
            redirect_uris: client.redirect_uris.iter().map(|u| u.0.clone()).collect(),
        }
    }
}
