//! Signing primitives for scoped object-storage upload credentials.
//!
//! This crate builds the exact byte sequences that object-storage verifiers
//! check — POST policy documents, AWS SigV4 canonical requests and
//! string-to-sign payloads, opaque upload tokens — and the HMAC chains that
//! sign them. It knows nothing about backends, configuration, or object-key
//! generation; callers hand it already-resolved strings and instants.
//!
//! Everything here is a pure function of its inputs: no I/O, no clocks, no
//! randomness, no shared state. Canonicalization is order-sensitive by
//! design, so the building blocks either fix the order themselves (sorted
//! query strings) or preserve caller order exactly (policy conditions).
//!
//! # Modules
//!
//! - [`policy`] - POST policy JSON documents and their base64 encoding
//! - [`v1`] - single-stage HMAC-SHA1 policy signatures
//! - [`sigv4`] - AWS4 key derivation and string-to-sign construction
//! - [`presign`] - SigV4 presigned URL generation
//! - [`token`] - opaque upload tokens computed from a policy scope
//! - [`encode`] - hex, percent, and base64 encoding helpers
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use depot_signing::{policy::PolicyDocument, v1};
//!
//! # fn main() -> Result<(), depot_signing::policy::PolicyError> {
//! let expiration = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
//! let policy = PolicyDocument::new(expiration)
//!     .match_bucket("media")
//!     .match_key("avatars/2024/01HV.png")
//!     .content_length_range(0, 1024 * 1024 * 1024);
//!
//! let encoded = policy.encode()?;
//! let signature = v1::sign_policy("secret-key", &encoded);
//! assert_eq!(signature.to_string().len(), 40);
//! # Ok(())
//! # }
//! ```

pub mod encode;
pub mod hash;
pub mod policy;
pub mod presign;
pub mod sigv4;
pub mod token;
pub mod v1;

pub use policy::{Condition, EncodedPolicy, PolicyDocument, PolicyError};
pub use presign::{PresignError, PresignRequest, presign};
pub use sigv4::{ALGORITHM, Scope, Signature, SigningKey};
pub use token::{TokenError, UploadScope, upload_token};
pub use v1::{SignatureV1, sign_policy};
