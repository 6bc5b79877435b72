//! Short-lived, scoped upload credential issuance.
//!
//! This crate lets a service hand its clients everything they need to upload
//! a file *directly* to an object-storage backend — a presigned URL, a
//! signed POST policy, or an upload token — without the client (or any
//! response payload) ever seeing the backend's long-lived secret key.
//!
//! It builds on [`depot_signing`] for the canonical documents and HMAC
//! chains, and adds the product-level pieces: backend configuration, unique
//! object-key generation, and the polymorphic [`CredentialIssuer`] façade.
//!
//! # Backends
//!
//! Four credential protocols are supported, selected by [`BackendKind`]:
//!
//! - [`BackendKind::PresignedPut`] - SigV4 presigned PUT URL (AWS S3 and
//!   compatible stores)
//! - [`BackendKind::PostPolicy`] - browser form upload with a single-stage
//!   HMAC-SHA1 policy signature
//! - [`BackendKind::PostPolicyV4`] - browser form upload with an AWS4
//!   policy signature (MinIO and compatible stores)
//! - [`BackendKind::Token`] - opaque upload token
//!
//! # Determinism
//!
//! Time and randomness are inputs, not ambient state: the issuer reads a
//! [`Clock`] and an [`Entropy`] source, so tests pin both and assert exact
//! object keys and signatures. Production uses [`SystemClock`] and
//! [`OsEntropy`].
//!
//! # Example
//!
//! ```
//! use depot_upload_credentials::{BackendConfig, BackendKind, CredentialIssuer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BackendConfig::new(
//!     "http://localhost:9000",
//!     "minioadmin",
//!     "minioadmin",
//!     "media",
//! )
//! .with_region("us-east-1")
//! .with_key_prefix("avatars/2024");
//!
//! let issuer = CredentialIssuer::new(BackendKind::PostPolicyV4, config)?;
//! let credential = issuer.issue(Some("png"))?;
//!
//! assert!(credential.object_key().starts_with("avatars/2024/"));
//! assert!(credential.object_key().ends_with(".png"));
//! # Ok(())
//! # }
//! ```

mod backend;
pub mod clock;
pub mod config;
pub mod credential;
pub mod entropy;
pub mod issuer;
pub mod key;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    BackendConfig, ConfigurationError, DEFAULT_CREDENTIAL_TTL_SECS, DEFAULT_MAX_UPLOAD_BYTES,
};
pub use credential::{BackendKind, Credential};
pub use entropy::{Entropy, FixedEntropy, OsEntropy};
pub use issuer::{CredentialIssuanceFailed, CredentialIssuer, IssueCause};
pub use key::{Extension, KeyGenerator, ObjectKey};
