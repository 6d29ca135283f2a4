use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::models::{AuthCodeData, PendingAuthRequest};
use crate::core::types::Expire;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(
    name = "kagid",
    version = env!("CARGO_PKG_VERSION"),
    about = "OAuth 2.0 authorization code server"
)]
pub struct Config {
    /// Address to listen on
    #[clap(long, env = "KAGI_BIND", default_value = "127.0.0.1:9001")]
    pub bind: SocketAddr,
    /// JSON file holding the registered clients
    #[clap(long, env = "KAGI_CLIENTS_FILE", default_value = "clients.json")]
    pub clients_file: PathBuf,
    /// Issued access tokens are appended here, one JSON object per line
    #[clap(long, env = "KAGI_AUDIT_LOG", default_value = "tokens.jsonl")]
    pub audit_log: PathBuf,
    /// Public base URL, used to advertise the endpoints
    #[clap(long, env = "KAGI_ISSUER", default_value = "http://localhost:9001")]
    pub issuer: String,
    #[clap(long, env = "KAGI_REQUEST_TTL_SECS", default_value_t = PendingAuthRequest::EXPIRES_IN_SECS)]
    pub request_ttl_secs: u64,
    #[clap(long, env = "KAGI_CODE_TTL_SECS", default_value_t = AuthCodeData::EXPIRES_IN_SECS)]
    pub code_ttl_secs: u64,
    #[clap(long, env = "KAGI_CLEAN_UP_INTERVAL_SECS", default_value_t = 15)]
    pub clean_up_interval_secs: u64,
}

impl Config {
    pub fn request_ttl(&self) -> Duration {
        Duration::from_secs(self.request_ttl_secs)
    }

    pub fn code_ttl(&self) -> Duration {
        Duration::from_secs(self.code_ttl_secs)
    }

    pub fn clean_up_interval(&self) -> Duration {
        Duration::from_secs(self.clean_up_interval_secs.max(1))
    }
}
