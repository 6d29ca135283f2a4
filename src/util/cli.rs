use std::path::PathBuf;

use crate::core::types::RedirectUri;
use crate::db::clients::{read_records, validate_redirect_uri, write_records, StaticClientRegistry};
use crate::db::models::ClientRecord;
use crate::provider::error::Error;
use crate::util::random::random_string;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[clap(
    name = "kagi-util",
    version = env!("CARGO_PKG_VERSION"),
    about = "Manage the clients file read by kagid"
)]
pub struct Options {
    #[clap(long, env = "KAGI_CLIENTS_FILE", default_value = "clients.json")]
    clients_file: PathBuf,
    #[clap(subcommand)]
    command: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    ListClients,
    CreateClient(CreateClient),
    DeleteClient(DeleteClient),
    ListClientUris(ListClientUris),
    AddClientUri(AddClientUri),
    DeleteClientUri(DeleteClientUri),
}

#[derive(Args)]
struct CreateClient {
    #[clap(short, long)]
    id: String,
    /// Generated when omitted
    #[clap(short, long)]
    secret: Option<String>,
}

#[derive(Args)]
struct DeleteClient {
    #[clap(short, long)]
    id: String,
}

#[derive(Args)]
struct ListClientUris {
    #[clap(short, long)]
    id: String,
}

#[derive(Args)]
struct AddClientUri {
    #[clap(short, long)]
    id: String,
    #[clap(short, long)]
    uri: String,
}

#[derive(Args)]
struct DeleteClientUri {
    #[clap(short, long)]
    id: String,
    #[clap(short, long)]
    uri: String,
}

fn find<'r>(records: &'r mut [ClientRecord], id: &str) -> Result<&'r mut ClientRecord, Error> {
    records
        .iter_mut()
        .find(|r| r.client_id == id)
        .ok_or_else(|| Error::Registry(format!("no client {}", id)))
}

fn list_clients(records: &[ClientRecord]) -> Vec<String> {
    let mut ids: Vec<String> = records
        .iter()
        .map(|r| format!("{} ({} redirect uris)", r.client_id, r.redirect_uris.len()))
        .collect();
    ids.sort();
    ids
}

fn create_client(c: &CreateClient, records: &mut Vec<ClientRecord>) -> Result<Vec<String>, Error> {
    if records.iter().any(|r| r.client_id == c.id) {
        return Err(Error::Registry(format!("client {} already exists", c.id)));
    }
    let secret = c.secret.clone().unwrap_or_else(|| random_string(24));
    records.push(ClientRecord {
        client_id: c.id.clone(),
        client_secret: secret.clone(),
        redirect_uris: Vec::new(),
    });
    Ok(vec![format!("client_id: {}", c.id), format!("client_secret: {}", secret)])
}

fn delete_client(c: &DeleteClient, records: &mut Vec<ClientRecord>) -> Result<(), Error> {
    let before = records.len();
    records.retain(|r| r.client_id != c.id);
    if records.len() == before {
        return Err(Error::Registry(format!("no client {}", c.id)));
    }
    Ok(())
}

fn list_client_uris(c: &ListClientUris, records: &mut [ClientRecord]) -> Result<Vec<String>, Error> {
    let mut uris = find(records, &c.id)?.redirect_uris.clone();
    uris.sort();
    Ok(uris)
}

fn add_client_uri(c: &AddClientUri, records: &mut [ClientRecord]) -> Result<(), Error> {
    validate_redirect_uri(&RedirectUri(c.uri.clone())).map_err(Error::Registry)?;
    let record = find(records, &c.id)?;
    if !record.redirect_uris.contains(&c.uri) {
        record.redirect_uris.push(c.uri.clone());
    }
    Ok(())
}

fn delete_client_uri(c: &DeleteClientUri, records: &mut [ClientRecord]) -> Result<(), Error> {
    let record = find(records, &c.id)?;
    let before = record.redirect_uris.len();
    record.redirect_uris.retain(|u| *u != c.uri);
    if record.redirect_uris.len() == before {
        return Err(Error::Registry(format!("client {} has no uri {}", c.id, c.uri)));
    }
    Ok(())
}

/// Applies one command to the clients file, returning the lines to print.
///
/// The file is only rewritten when the command changed it and the result would still
/// load as a registry.
pub fn run_cli_action(opts: Options) -> Result<Vec<String>, Error> {
    use SubCommand::*;

    let mut records = if opts.clients_file.exists() {
        read_records(&opts.clients_file)?
    } else {
        Vec::new()
    };

    let (output, changed) = match &opts.command {
        ListClients => (list_clients(&records), false),
        CreateClient(c) => (create_client(c, &mut records)?, true),
        DeleteClient(c) => (delete_client(c, &mut records).map(|_| Vec::new())?, true),
        ListClientUris(c) => (list_client_uris(c, &mut records)?, false),
        AddClientUri(c) => (add_client_uri(c, &mut records).map(|_| Vec::new())?, true),
        DeleteClientUri(c) => (delete_client_uri(c, &mut records).map(|_| Vec::new())?, true),
    };

    if changed {
        StaticClientRegistry::from_records(records.clone())?;
        write_records(&opts.clients_file, &records)?;
    }
    Ok(output)
}
