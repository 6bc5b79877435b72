//! AWS Signature Version 4 building blocks.
//!
//! SigV4 scopes a long-lived secret to a date, region, and service through a
//! four-stage HMAC-SHA256 chain, then signs a `string-to-sign` assembled
//! from the algorithm name, the request timestamp, the credential scope,
//! and the SHA-256 hash of the canonical document. See [creating a signed
//! request] for the protocol description.
//!
//! The derived key is date-scoped: it must be recomputed for every signing
//! event, never cached across days.
//!
//! [creating a signed request]: https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html

use chrono::{DateTime, Utc};

use crate::encode::hex_encode;
use crate::hash::{hmac_sha256, sha256_hex};
use crate::policy::EncodedPolicy;

/// The SigV4 algorithm identifier.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Compact UTC timestamp used in `X-Amz-Date`, e.g. `20240101T000000Z`.
pub fn format_amz_date(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

/// UTC date stamp used in the credential scope, e.g. `20240101`.
pub fn format_date_stamp(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%d").to_string()
}

/// A credential scope: `{date}/{region}/s3/aws4_request`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    date_stamp: String,
    region: String,
}

impl Scope {
    /// Create a scope for the given date stamp and region.
    pub fn new(date_stamp: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            date_stamp: date_stamp.into(),
            region: region.into(),
        }
    }

    /// The date stamp this scope covers.
    pub fn date_stamp(&self) -> &str {
        &self.date_stamp
    }

    /// The `X-Amz-Credential` value: `{access_key}/{scope}`.
    pub fn credential(&self, access_key: &str) -> String {
        format!("{}/{}", access_key, self)
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/s3/aws4_request", self.date_stamp, self.region)
    }
}

/// A SigV4 signing key derived from credentials.
///
/// The key is derived through an HMAC chain:
/// `HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")`
#[derive(Debug, Clone)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    /// Derive a signing key using the AWS4 key derivation algorithm.
    pub fn derive(secret: &str, date_stamp: &str, region: &str, service: &str) -> Self {
        let secret = format!("AWS4{}", secret);
        let k_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes());
        let k_region = hmac_sha256(&k_date, region.as_bytes());
        let k_service = hmac_sha256(&k_region, service.as_bytes());
        Self(hmac_sha256(&k_service, b"aws4_request"))
    }

    /// Sign data using this key.
    pub fn sign(&self, data: &[u8]) -> Signature {
        Signature(hmac_sha256(&self.0, data))
    }
}

/// HMAC-SHA256 signature bytes. Displays as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex_encode(&self.0))
    }
}

/// Assemble the SigV4 string-to-sign from a hashed canonical document.
///
/// `document_hash_hex` is the hex SHA-256 of whatever canonical bytes the
/// operation defines — a canonical request for presigning, the base64
/// policy string for POST policies.
pub fn string_to_sign(amz_date: &str, scope: &Scope, document_hash_hex: &str) -> String {
    format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM, amz_date, scope, document_hash_hex
    )
}

/// String-to-sign for a POST policy.
///
/// The hashed document is the UTF-8 bytes of the base64 policy string —
/// hashing the policy JSON instead is the classic mistake this signature
/// guards against, which is why the parameter is [`EncodedPolicy`].
pub fn post_policy_string_to_sign(
    amz_date: &str,
    scope: &Scope,
    policy: &EncodedPolicy,
) -> String {
    string_to_sign(amz_date, scope, &sha256_hex(policy.as_str().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn it_formats_timestamps() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(format_amz_date(instant), "20240101T000000Z");
        assert_eq!(format_date_stamp(instant), "20240101");
    }

    #[test]
    fn it_formats_scope_and_credential() {
        let scope = Scope::new("20240101", "us-east-1");
        assert_eq!(scope.to_string(), "20240101/us-east-1/s3/aws4_request");
        assert_eq!(
            scope.credential("AKIATESTKEY"),
            "AKIATESTKEY/20240101/us-east-1/s3/aws4_request"
        );
    }

    #[test]
    fn it_derives_deterministic_keys() {
        let a = SigningKey::derive("secret", "20240101", "us-east-1", "s3");
        let b = SigningKey::derive("secret", "20240101", "us-east-1", "s3");
        assert_eq!(a.sign(b"payload"), b.sign(b"payload"));
    }

    #[test]
    fn it_derives_different_keys_across_days() {
        let today = SigningKey::derive("secret", "20240101", "us-east-1", "s3");
        let tomorrow = SigningKey::derive("secret", "20240102", "us-east-1", "s3");
        assert_ne!(today.sign(b"payload"), tomorrow.sign(b"payload"));
    }

    #[test]
    fn it_matches_the_expanded_hmac_chain() {
        use crate::hash::hmac_sha256;

        let derived = SigningKey::derive("secret", "20240101", "eu-west-1", "s3");

        let k_date = hmac_sha256(b"AWS4secret", b"20240101");
        let k_region = hmac_sha256(&k_date, b"eu-west-1");
        let k_service = hmac_sha256(&k_region, b"s3");
        let signing_key = hmac_sha256(&k_service, b"aws4_request");
        let expected = hmac_sha256(&signing_key, b"payload");

        assert_eq!(derived.sign(b"payload").to_string(), hex_encode(&expected));
    }

    #[test]
    fn it_assembles_the_post_policy_string_to_sign() {
        let scope = Scope::new("20240101", "us-east-1");
        let policy = EncodedPolicy::from_base64("eyJ0ZXN0IjoxfQ==");
        let payload = post_policy_string_to_sign("20240101T000000Z", &scope, &policy);

        let lines: Vec<&str> = payload.split('\n').collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "AWS4-HMAC-SHA256");
        assert_eq!(lines[1], "20240101T000000Z");
        assert_eq!(lines[2], "20240101/us-east-1/s3/aws4_request");
        assert_eq!(lines[3], sha256_hex(b"eyJ0ZXN0IjoxfQ=="));
    }
}
