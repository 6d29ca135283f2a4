use crate::core::types::{AuthCode, ClientSecret, HashedAuthCode};

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use subtle::ConstantTimeEq;

pub trait HashTo: AsRef<str> {
    type HashedType: From<String>;
}

impl HashTo for AuthCode {
    type HashedType = HashedAuthCode;
}

/// Unsalted SHA-512 digest, suitable for lookup keys of high-entropy values.
pub fn hash_without_salt<T: HashTo>(to_hash: &T) -> T::HashedType {
    use sha2::Digest;

    let digest = sha2::Sha512::digest(to_hash.as_ref().as_bytes());
    URL_SAFE.encode(digest).into()
}

/// Exact comparison of two client secrets that does not leak where they differ.
///
/// Both sides are digested first so the comparison runs over equal-length input
/// regardless of the presented secret's length.
pub fn secrets_match(presented: &ClientSecret, registered: &ClientSecret) -> bool {
    use sha2::Digest;

    let lhs = sha2::Sha512::digest(presented.as_ref().as_bytes());
    let rhs = sha2::Sha512::digest(registered.as_ref().as_bytes());
    lhs.as_slice().ct_eq(rhs.as_slice()).into()
}
