//! Opaque upload tokens.
//!
//! Token-based stores authorize uploads with a single string:
//! `{access_key}:{urlsafe_b64(hmac_sha1(secret, encoded_policy))}:{encoded_policy}`
//! where `encoded_policy` is the URL-safe base64 of a small JSON policy
//! carrying the upload scope and a unix-seconds deadline. The token embeds
//! the exact policy bytes that were signed, so the verifier recomputes the
//! MAC over the middle of the string it received.

use serde::Serialize;
use thiserror::Error;

use crate::encode::base64_url_safe;
use crate::hash::hmac_sha1;

/// The scope a token is valid for.
///
/// `bucket` alone permits any key in the bucket; `bucket:key` pins one
/// object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadScope(String);

impl UploadScope {
    /// Scope covering a whole bucket.
    pub fn bucket(bucket: impl Into<String>) -> Self {
        Self(bucket.into())
    }

    /// Scope pinned to a single object key.
    pub fn bucket_and_key(bucket: &str, key: &str) -> Self {
        Self(format!("{}:{}", bucket, key))
    }
}

impl std::fmt::Display for UploadScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Token policy payload. Field order is part of the signed bytes.
#[derive(Serialize)]
struct TokenPolicy<'a> {
    scope: &'a str,
    deadline: i64,
}

/// Errors that can occur while building an upload token.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The token policy could not be serialized to JSON.
    #[error("token policy serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Compute an upload token locally.
///
/// `deadline` is the expiration instant in unix seconds; the verifier
/// rejects uploads arriving after it.
pub fn upload_token(
    access_key: &str,
    secret_key: &str,
    scope: &UploadScope,
    deadline: i64,
) -> Result<String, TokenError> {
    let policy = TokenPolicy {
        scope: &scope.0,
        deadline,
    };
    let encoded_policy = base64_url_safe(serde_json::to_string(&policy)?.as_bytes());
    let digest = hmac_sha1(secret_key.as_bytes(), encoded_policy.as_bytes());

    Ok(format!(
        "{}:{}:{}",
        access_key,
        base64_url_safe(&digest),
        encoded_policy
    ))
}
