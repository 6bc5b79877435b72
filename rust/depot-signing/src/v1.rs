//! Single-stage HMAC-SHA1 policy signatures.
//!
//! Some verifiers expect `HMAC_SHA1(secret_key, base64_policy)` directly,
//! with no key derivation chain. The signature is hex encoded.

use crate::encode::hex_encode;
use crate::hash::hmac_sha1;
use crate::policy::EncodedPolicy;

/// An HMAC-SHA1 policy signature. Displays as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureV1(Vec<u8>);

impl SignatureV1 {
    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for SignatureV1 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex_encode(&self.0))
    }
}

/// Sign an encoded policy with a single-stage HMAC-SHA1.
///
/// The MAC input is the UTF-8 bytes of the base64 string itself, not the
/// underlying JSON — the [`EncodedPolicy`] parameter enforces that.
pub fn sign_policy(secret_key: &str, policy: &EncodedPolicy) -> SignatureV1 {
    SignatureV1(hmac_sha1(
        secret_key.as_bytes(),
        policy.as_str().as_bytes(),
    ))
}
