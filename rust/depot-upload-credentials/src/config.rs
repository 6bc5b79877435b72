//! Backend configuration.
//!
//! [`BackendConfig`] is an immutable value the caller constructs (or binds
//! from its configuration source via `Deserialize`) and passes in
//! explicitly — the issuing core reads no ambient state. The secret key is
//! write-only from the core's perspective: the type has no `Serialize` impl
//! and its `Debug` output redacts the secret.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::credential::BackendKind;

/// Default upload size ceiling: 1 GiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1024 * 1024 * 1024;

/// Default credential validity window: 30 minutes.
pub const DEFAULT_CREDENTIAL_TTL_SECS: u64 = 30 * 60;

/// Immutable per-backend settings.
#[derive(Clone, Deserialize)]
pub struct BackendConfig {
    /// Storage endpoint, e.g. `https://s3.us-east-1.amazonaws.com` or
    /// `http://localhost:9000`.
    server_url: String,
    /// Access key identifying the credential pair.
    access_key: String,
    /// Secret key. Never logged, never serialized, never issued.
    secret_key: String,
    /// Bucket uploads are scoped to.
    bucket: String,
    /// Signing region. Required by the SigV4-based kinds.
    #[serde(default)]
    region: String,
    /// Prefix prepended to every generated object key.
    #[serde(default)]
    key_prefix: String,
    /// Public CDN base; when set, `filePath` resolves under it.
    #[serde(default)]
    public_base: Option<String>,
    /// Upper bound of the policy's content-length-range.
    #[serde(default = "default_max_upload_bytes")]
    max_upload_bytes: u64,
    /// Validity window of issued credentials, in seconds.
    #[serde(default = "default_credential_ttl_secs")]
    credential_ttl_secs: u64,
}

fn default_max_upload_bytes() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_credential_ttl_secs() -> u64 {
    DEFAULT_CREDENTIAL_TTL_SECS
}

impl BackendConfig {
    /// Create a config with the required settings and defaults for the rest.
    pub fn new(
        server_url: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            bucket: bucket.into(),
            region: String::new(),
            key_prefix: String::new(),
            public_base: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            credential_ttl_secs: DEFAULT_CREDENTIAL_TTL_SECS,
        }
    }

    /// Set the signing region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set the object-key prefix.
    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    /// Set the public CDN base used for `filePath`.
    pub fn with_public_base(mut self, public_base: impl Into<String>) -> Self {
        self.public_base = Some(public_base.into());
        self
    }

    /// Set the upload size ceiling.
    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// Set the credential validity window, in seconds.
    pub fn with_credential_ttl_secs(mut self, credential_ttl_secs: u64) -> Self {
        self.credential_ttl_secs = credential_ttl_secs;
        self
    }

    /// The storage endpoint.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// The access key.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The secret key. Only the signing paths read this.
    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// The bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The signing region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The object-key prefix.
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    /// The public CDN base, if configured.
    pub fn public_base(&self) -> Option<&str> {
        self.public_base.as_deref()
    }

    /// The upload size ceiling in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// The credential validity window in seconds.
    pub fn credential_ttl_secs(&self) -> u64 {
        self.credential_ttl_secs
    }

    /// The instant credentials issued at `now` stop being accepted.
    pub fn expiration_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + Duration::seconds(self.credential_ttl_secs as i64)
    }

    /// Check that everything the given backend kind signs with is present.
    ///
    /// Configuration problems are startup problems: the issuer runs this
    /// once at construction so that a missing secret fails the service, not
    /// a request.
    pub fn validate(&self, kind: BackendKind) -> Result<(), ConfigurationError> {
        if self.server_url.trim().is_empty() {
            return Err(ConfigurationError::MissingField("server_url"));
        }
        Url::parse(&self.server_url)
            .map_err(|e| ConfigurationError::InvalidServerUrl(e.to_string()))?;
        if self.access_key.trim().is_empty() {
            return Err(ConfigurationError::MissingField("access_key"));
        }
        if self.secret_key.trim().is_empty() {
            return Err(ConfigurationError::MissingField("secret_key"));
        }
        if self.bucket.trim().is_empty() {
            return Err(ConfigurationError::MissingField("bucket"));
        }
        if kind.requires_region() && self.region.trim().is_empty() {
            return Err(ConfigurationError::MissingField("region"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("server_url", &self.server_url)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("key_prefix", &self.key_prefix)
            .field("public_base", &self.public_base)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("credential_ttl_secs", &self.credential_ttl_secs)
            .finish()
    }
}

/// Invalid or incomplete backend settings. Fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// A required setting is missing or blank.
    #[error("missing backend configuration field: {0}")]
    MissingField(&'static str),
    /// The endpoint is not a parseable URL.
    #[error("invalid server url: {0}")]
    InvalidServerUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn test_config() -> BackendConfig {
        BackendConfig::new(
            "https://s3.us-east-1.amazonaws.com",
            "AKIATESTKEY",
            "top secret",
            "media",
        )
        .with_region("us-east-1")
    }

    #[test]
    fn it_validates_a_complete_config() {
        assert!(test_config().validate(BackendKind::PresignedPut).is_ok());
    }

    #[test]
    fn it_rejects_blank_required_fields() {
        let config = BackendConfig::new("https://s3.amazonaws.com", "", "sk", "media");
        assert!(matches!(
            config.validate(BackendKind::PostPolicy),
            Err(ConfigurationError::MissingField("access_key"))
        ));

        let config = BackendConfig::new("https://s3.amazonaws.com", "ak", "  ", "media");
        assert!(matches!(
            config.validate(BackendKind::PostPolicy),
            Err(ConfigurationError::MissingField("secret_key"))
        ));
    }

    #[test]
    fn it_rejects_unparseable_endpoints() {
        let config = BackendConfig::new("not a url", "ak", "sk", "media");
        assert!(matches!(
            config.validate(BackendKind::PostPolicy),
            Err(ConfigurationError::InvalidServerUrl(_))
        ));
    }

    #[test]
    fn it_requires_region_only_for_sigv4_kinds() {
        let config = BackendConfig::new("https://example.com", "ak", "sk", "media");
        assert!(config.validate(BackendKind::PostPolicy).is_ok());
        assert!(config.validate(BackendKind::Token).is_ok());
        assert!(matches!(
            config.validate(BackendKind::PresignedPut),
            Err(ConfigurationError::MissingField("region"))
        ));
        assert!(matches!(
            config.validate(BackendKind::PostPolicyV4),
            Err(ConfigurationError::MissingField("region"))
        ));
    }

    #[test]
    fn it_redacts_the_secret_in_debug_output() {
        let rendered = format!("{:?}", test_config());
        assert!(!rendered.contains("top secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("AKIATESTKEY"));
    }

    #[test]
    fn it_computes_expiration_from_the_ttl() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap();
        assert_eq!(test_config().expiration_at(now), expected);
    }

    #[test]
    fn it_deserializes_with_defaults() {
        let config: BackendConfig = serde_json::from_str(
            r#"{
                "server_url": "http://localhost:9000",
                "access_key": "ak",
                "secret_key": "sk",
                "bucket": "media"
            }"#,
        )
        .unwrap();

        assert_eq!(config.max_upload_bytes(), DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.credential_ttl_secs(), DEFAULT_CREDENTIAL_TTL_SECS);
        assert_eq!(config.key_prefix(), "");
        assert!(config.public_base().is_none());
    }
}
