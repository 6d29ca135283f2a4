use crate::core::types::{ClientId, ClientSecret};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientCredentials {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
}

/// `client_id` / `client_secret` as found in a request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyCredentials {
    pub client_id: Option<ClientId>,
    pub client_secret: Option<ClientSecret>,
}

impl BodyCredentials {
    pub fn is_present(&self) -> bool {
        self.client_id.is_some() || self.client_secret.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    #[error("client credentials supplied in both header and body")]
    Conflicting,
    #[error("malformed client credentials")]
    Malformed,
    #[error("no client credentials supplied")]
    Missing,
}

/// Decodes an `Authorization: Basic` header value.
///
/// Both halves are percent-decoded after base64 decoding, since clients are expected to
/// url-encode identifiers and secrets before joining them.
pub fn decode_basic(header: &str) -> Result<ClientCredentials, CredentialsError> {
    let (scheme, encoded) = header
        .trim()
        .split_once(' ')
        .ok_or(CredentialsError::Malformed)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(CredentialsError::Malformed);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| CredentialsError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| CredentialsError::Malformed)?;
    let (id, secret) = decoded
        .split_once(':')
        .ok_or(CredentialsError::Malformed)?;

    Ok(ClientCredentials {
        client_id: ClientId(unescape(id)?),
        client_secret: ClientSecret(unescape(secret)?),
    })
}

fn unescape(s: &str) -> Result<String, CredentialsError> {
    urlencoding::decode(s)
        .map(|s| s.into_owned())
        .map_err(|_| CredentialsError::Malformed)
}

/// Picks the single source of client credentials for a token request.
///
/// A request carrying credentials in both the header and the body is refused outright
/// rather than preferring either.
pub fn resolve(
    header: Option<&str>,
    body: BodyCredentials,
) -> Result<ClientCredentials, CredentialsError> {
    match (header, body.is_present()) {
        (Some(_), true) => Err(CredentialsError::Conflicting),
        (Some(header), false) => decode_basic(header),
        (None, true) => match body {
            BodyCredentials {
                client_id: Some(client_id),
                client_secret: Some(client_secret),
            } => Ok(ClientCredentials {
                client_id,
                client_secret,
            }),
            _ => Err(CredentialsError::Malformed),
        },
        (None, false) => Err(CredentialsError::Missing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    fn creds(id: &str, secret: &str) -> ClientCredentials {
        ClientCredentials {
            client_id: ClientId(id.to_string()),
            client_secret: ClientSecret(secret.to_string()),
        }
    }

    #[test]
    fn decodes_basic_header() {
        assert_eq!(decode_basic(&basic("c1:s1")), Ok(creds("c1", "s1")));
        assert_eq!(
            decode_basic(&format!("basic {}", STANDARD.encode("c1:s1"))),
            Ok(creds("c1", "s1"))
        );
    }

    #[test]
    fn unescapes_id_and_secret() {
        assert_eq!(
            decode_basic(&basic("my%20client:p%3Ass")),
            Ok(creds("my client", "p:ss"))
        );
    }

    #[test]
    fn secret_may_contain_colons() {
        assert_eq!(decode_basic(&basic("c1:a:b")), Ok(creds("c1", "a:b")));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert_eq!(decode_basic("Bearer abc"), Err(CredentialsError::Malformed));
        assert_eq!(decode_basic("Basic"), Err(CredentialsError::Malformed));
        assert_eq!(decode_basic("Basic !!!"), Err(CredentialsError::Malformed));
        assert_eq!(decode_basic(&basic("no-colon")), Err(CredentialsError::Malformed));
    }

    #[test]
    fn refuses_credentials_from_both_sources() {
        let body = BodyCredentials {
            client_id: Some(ClientId("c1".to_string())),
            client_secret: Some(ClientSecret("s1".to_string())),
        };
        assert_eq!(
            resolve(Some(&basic("c1:s1")), body),
            Err(CredentialsError::Conflicting)
        );
    }

    #[test]
    fn accepts_exactly_one_source() {
        assert_eq!(
            resolve(Some(&basic("c1:s1")), BodyCredentials::default()),
            Ok(creds("c1", "s1"))
        );

        let body = BodyCredentials {
            client_id: Some(ClientId("c2".to_string())),
            client_secret: Some(ClientSecret("s2".to_string())),
        };
        assert_eq!(resolve(None, body), Ok(creds("c2", "s2")));
    }

    #[test]
    fn incomplete_or_missing_body_credentials() {
        let body = BodyCredentials {
            client_id: Some(ClientId("c2".to_string())),
            client_secret: None,
        };
        assert_eq!(resolve(None, body), Err(CredentialsError::Malformed));
        assert_eq!(
            resolve(None, BodyCredentials::default()),
            Err(CredentialsError::Missing)
        );
    }
}
