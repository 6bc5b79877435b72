//! Per-backend credential construction.
//!
//! One module per [`BackendKind`](crate::credential::BackendKind), each a
//! pure function from a [`SigningContext`] and an object key to a finished
//! [`Credential`](crate::credential::Credential). The issuer dispatches
//! here; nothing in these modules touches a clock, a random source, or any
//! state outside the context it is handed.

use chrono::{DateTime, Utc};
use depot_signing::presign::PresignError;
use url::Url;

use crate::config::BackendConfig;
use crate::key::ObjectKey;

pub(crate) mod post_policy;
pub(crate) mod post_policy_v4;
pub(crate) mod presigned_put;
pub(crate) mod token;

/// Everything one issuance signs with: the instant and the backend settings.
///
/// Created fresh per request and dropped with it; derived keys and documents
/// are never reused across requests.
pub(crate) struct SigningContext<'a> {
    /// The instant the credential is issued at. All derived timestamps,
    /// expirations, and date-scoped keys come from this one value.
    pub now: DateTime<Utc>,
    /// The backend settings.
    pub config: &'a BackendConfig,
}

/// Determine if path-style URLs should be used by default for this endpoint.
///
/// Returns true for IP addresses and localhost, since virtual-hosted style
/// URLs require DNS resolution of `{bucket}.{host}`.
fn is_path_style_default(endpoint: &Url) -> bool {
    use url::Host;
    match endpoint.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        Some(Host::Domain(domain)) => domain == "localhost",
        None => false,
    }
}

/// Build the URL of an object in the configured bucket.
///
/// Handles both path-style and virtual-hosted style URLs.
pub(crate) fn object_url(config: &BackendConfig, key: &ObjectKey) -> Result<Url, PresignError> {
    let endpoint = Url::parse(config.server_url())
        .map_err(|e| PresignError::InvalidEndpoint(e.to_string()))?;

    if is_path_style_default(&endpoint) {
        // Path-style: https://endpoint/bucket/key
        let mut url = endpoint;
        url.set_path(&format!("{}/{}", config.bucket(), key));
        Ok(url)
    } else {
        // Virtual-hosted style: https://bucket.endpoint/key
        let host = endpoint
            .host_str()
            .ok_or_else(|| PresignError::InvalidEndpoint("endpoint has no host".into()))?;
        let new_host = format!("{}.{}", config.bucket(), host);

        let mut url = endpoint.clone();
        url.set_host(Some(&new_host))
            .map_err(|e| PresignError::InvalidEndpoint(format!("invalid host: {}", e)))?;
        url.set_path(&format!("/{}", key));
        Ok(url)
    }
}

/// The bucket's base URL as a string, without a trailing slash.
pub(crate) fn bucket_base(config: &BackendConfig) -> Result<String, PresignError> {
    let endpoint = Url::parse(config.server_url())
        .map_err(|e| PresignError::InvalidEndpoint(e.to_string()))?;

    if is_path_style_default(&endpoint) {
        Ok(format!(
            "{}/{}",
            config.server_url().trim_end_matches('/'),
            config.bucket()
        ))
    } else {
        let host = endpoint
            .host_str()
            .ok_or_else(|| PresignError::InvalidEndpoint("endpoint has no host".into()))?;
        let mut url = endpoint.clone();
        url.set_host(Some(&format!("{}.{}", config.bucket(), host)))
            .map_err(|e| PresignError::InvalidEndpoint(format!("invalid host: {}", e)))?;
        Ok(url.to_string().trim_end_matches('/').to_string())
    }
}

/// The public URL the caller persists for the uploaded object.
///
/// The configured CDN base wins; otherwise the object resolves under the
/// backend's own public base.
pub(crate) fn file_path(config: &BackendConfig, base: &str, key: &ObjectKey) -> String {
    match config.public_base() {
        Some(cdn) => format!("{}/{}", cdn.trim_end_matches('/'), key),
        None => format!("{}/{}", base.trim_end_matches('/'), key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(path: &str) -> ObjectKey {
        crate::key::KeyGenerator::new(crate::clock::SystemClock, crate::entropy::OsEntropy)
            .generate_named("", path)
    }

    #[test]
    fn it_builds_virtual_hosted_object_urls() {
        let config = BackendConfig::new("https://s3.amazonaws.com", "ak", "sk", "media");
        let url = object_url(&config, &key("avatars/01HV.png")).unwrap();
        assert_eq!(url.as_str(), "https://media.s3.amazonaws.com/avatars/01HV.png");
    }

    #[test]
    fn it_builds_path_style_object_urls_for_localhost() {
        let config = BackendConfig::new("http://localhost:9000", "ak", "sk", "media");
        let url = object_url(&config, &key("avatars/01HV.png")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/media/avatars/01HV.png");
    }

    #[test]
    fn it_builds_path_style_object_urls_for_ip_endpoints() {
        let config = BackendConfig::new("http://127.0.0.1:9000", "ak", "sk", "media");
        let url = object_url(&config, &key("k")).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/media/k");
    }

    #[test]
    fn it_builds_bucket_bases_without_trailing_slash() {
        let config = BackendConfig::new("https://s3.amazonaws.com", "ak", "sk", "media");
        assert_eq!(bucket_base(&config).unwrap(), "https://media.s3.amazonaws.com");

        let config = BackendConfig::new("http://localhost:9000", "ak", "sk", "media");
        assert_eq!(bucket_base(&config).unwrap(), "http://localhost:9000/media");
    }

    #[test]
    fn it_prefers_the_cdn_base_for_file_paths() {
        let config = BackendConfig::new("https://s3.amazonaws.com", "ak", "sk", "media")
            .with_public_base("https://cdn.example.com/");
        let path = file_path(&config, "https://media.s3.amazonaws.com", &key("a/b.png"));
        assert_eq!(path, "https://cdn.example.com/a/b.png");
    }

    #[test]
    fn it_falls_back_to_the_backend_base_for_file_paths() {
        let config = BackendConfig::new("https://s3.amazonaws.com", "ak", "sk", "media");
        let path = file_path(&config, "https://media.s3.amazonaws.com", &key("a/b.png"));
        assert_eq!(path, "https://media.s3.amazonaws.com/a/b.png");
    }
}
