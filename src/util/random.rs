use crate::core::types::{AccessToken, AuthCode, RequestId};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

pub trait FromRandom {
    fn from_random() -> Self;
}

impl FromRandom for RequestId {
    fn from_random() -> Self {
        RequestId(random_string(24))
    }
}

impl FromRandom for AuthCode {
    fn from_random() -> Self {
        AuthCode(random_string(32))
    }
}

impl FromRandom for AccessToken {
    fn from_random() -> Self {
        AccessToken(random_string(32))
    }
}

/// `size` bytes from the operating system CSPRNG, base64url encoded without padding.
pub fn random_string(size: usize) -> String {
    let mut bytes = vec![0u8; size];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
