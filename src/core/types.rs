use std::{
    fmt,
    str::FromStr,
    time::{Duration, SystemTime},
};

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl FromStr for ClientId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct ClientSecret(pub String);

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret([redacted])")
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compared byte for byte. No normalisation of any kind is applied.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct RedirectUri(pub String);

impl AsRef<str> for RedirectUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RedirectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies a pending authorization request between `/authorize` and `/approve`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl FromStr for RequestId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct AuthCode(pub String);

impl AsRef<str> for AuthCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct HashedAuthCode(pub String);

impl From<String> for HashedAuthCode {
    fn from(from: String) -> Self {
        Self(from)
    }
}

#[derive(Clone, Eq, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct AccessToken(pub String);

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([redacted])")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TokenType {
    Bearer,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResponseType {
    Code,
    Unsupported(String),
}

impl From<String> for ResponseType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "code" => Self::Code,
            _ => Self::Unsupported(s),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GrantType {
    AuthorizationCode,
    Unsupported(String),
}

impl From<String> for GrantType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "authorization_code" => Self::AuthorizationCode,
            _ => Self::Unsupported(s),
        }
    }
}

/// Default lifetime of a stored record.
pub trait Expire {
    const EXPIRES_IN_SECS: u64;

    fn expires_in() -> Duration {
        Duration::from_secs(Self::EXPIRES_IN_SECS)
    }
}

/// Seconds since the Unix epoch, saturating to zero for clocks set before it.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs()
}
