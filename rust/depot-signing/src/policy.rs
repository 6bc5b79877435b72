//! POST policy documents.
//!
//! A POST policy is a JSON document constraining a browser form upload:
//! where it may land (bucket and exact key), how large it may be, and until
//! when it is valid. The storage backend verifies the signature over the
//! *base64 encoding* of the document, so serialization must be canonical:
//! `expiration` precedes `conditions`, and conditions appear exactly in the
//! order they were added. Reordering anything changes the signature.
//!
//! [`PolicyDocument::encode`] produces an [`EncodedPolicy`] — an opaque
//! newtype over the base64 string. The signing functions in [`crate::v1`]
//! and [`crate::sigv4`] accept only `EncodedPolicy`, which makes it
//! impossible to sign the raw JSON bytes by mistake.

use chrono::{DateTime, Utc};
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::encode::base64_standard;

/// A single upload constraint inside a policy document.
///
/// Serializes in the array forms the verifier expects:
/// `["eq", "$field", "value"]` and `["content-length-range", min, max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Exact match on a form field (without the leading `$`).
    Equals {
        /// Form field name, e.g. `bucket` or `x-amz-date`.
        field: String,
        /// Required value.
        value: String,
    },
    /// Inclusive bounds on the upload size in bytes.
    ContentLengthRange {
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Equals { field, value } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("eq")?;
                seq.serialize_element(&format!("${}", field))?;
                seq.serialize_element(value)?;
                seq.end()
            }
            Self::ContentLengthRange { min, max } => {
                let mut seq = serializer.serialize_seq(Some(3))?;
                seq.serialize_element("content-length-range")?;
                seq.serialize_element(min)?;
                seq.serialize_element(max)?;
                seq.end()
            }
        }
    }
}

/// An upload policy: expiration instant plus ordered conditions.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use depot_signing::policy::PolicyDocument;
///
/// let expiration = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
/// let policy = PolicyDocument::new(expiration)
///     .match_bucket("media")
///     .match_key("avatars/01HV.png")
///     .content_length_range(0, 1_073_741_824);
///
/// let json = policy.to_json().unwrap();
/// assert!(json.starts_with(r#"{"expiration":"2024-01-01T00:30:00Z","conditions":["#));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyDocument {
    /// Instant after which the policy is rejected. Always UTC.
    #[serde(serialize_with = "serialize_expiration")]
    expiration: DateTime<Utc>,
    /// Constraints, serialized in insertion order.
    conditions: Vec<Condition>,
}

/// Second-precision ISO-8601 UTC, e.g. `2024-01-01T00:30:00Z`.
fn serialize_expiration<S>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&instant.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

impl PolicyDocument {
    /// Create an empty policy expiring at the given instant.
    pub fn new(expiration: DateTime<Utc>) -> Self {
        Self {
            expiration,
            conditions: Vec::new(),
        }
    }

    /// Require an exact bucket match.
    pub fn match_bucket(self, bucket: impl Into<String>) -> Self {
        self.match_field("bucket", bucket)
    }

    /// Require an exact object-key match.
    pub fn match_key(self, key: impl Into<String>) -> Self {
        self.match_field("key", key)
    }

    /// Require an exact match on an arbitrary form field.
    pub fn match_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::Equals {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Bound the upload size to `[min, max]` bytes.
    pub fn content_length_range(mut self, min: u64, max: u64) -> Self {
        self.conditions
            .push(Condition::ContentLengthRange { min, max });
        self
    }

    /// The canonical JSON text of this policy.
    pub fn to_json(&self) -> Result<String, PolicyError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Canonical JSON, UTF-8 encoded, then base64 encoded.
    ///
    /// The resulting [`EncodedPolicy`] is the document that gets signed and
    /// the string the client submits in the `policy` form field.
    pub fn encode(&self) -> Result<EncodedPolicy, PolicyError> {
        Ok(EncodedPolicy(base64_standard(self.to_json()?.as_bytes())))
    }
}

/// The base64 encoding of a policy document.
///
/// Signing functions take this type rather than a plain string so that the
/// raw JSON can never be signed by accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPolicy(String);

impl EncodedPolicy {
    /// The base64 string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an already-encoded policy string.
    ///
    /// Intended for callers that received the encoding from elsewhere and
    /// only need to sign it.
    pub fn from_base64(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl std::fmt::Display for EncodedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors that can occur while building a policy document.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// The policy could not be serialized to JSON.
    #[error("policy serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
