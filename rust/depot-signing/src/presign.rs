//! SigV4 presigned URL generation.
//!
//! Presigning authorizes a single HTTP operation through [query string
//! authentication]: the signature and its inputs travel as `X-Amz-*` query
//! parameters, so the holder of the URL needs no credentials of their own.
//!
//! [query string authentication]: https://docs.aws.amazon.com/AmazonS3/latest/API/sigv4-query-string-auth.html

use chrono::{DateTime, Utc};
use thiserror::Error;
use url::Url;

use crate::encode::{percent_encode, percent_encode_path};
use crate::hash::sha256_hex;
use crate::sigv4::{ALGORITHM, Scope, SigningKey, format_amz_date, format_date_stamp, string_to_sign};

/// Payload hash placeholder for presigned operations: the body is not known
/// at signing time.
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// A single operation to presign.
#[derive(Debug, Clone)]
pub struct PresignRequest<'a> {
    /// HTTP method (e.g. `PUT`).
    pub method: &'a str,
    /// Fully built object URL. Existing query parameters are preserved and
    /// included in the signature.
    pub url: &'a Url,
    /// Signature validity window in seconds.
    pub expires: u64,
    /// Signing timestamp. Always UTC.
    pub time: DateTime<Utc>,
}

/// Errors that can occur during presigning.
#[derive(Error, Debug)]
pub enum PresignError {
    /// The request URL is unusable for signing (e.g. missing host).
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Produce a presigned URL for the request.
///
/// Builds the canonical request (sorted, percent-encoded query; canonical
/// `host` header; `UNSIGNED-PAYLOAD` placeholder), hashes it into the
/// string-to-sign, signs with the date-scoped derived key, and appends
/// `X-Amz-Signature`.
pub fn presign(
    request: &PresignRequest<'_>,
    access_key: &str,
    secret_key: &str,
    region: &str,
) -> Result<Url, PresignError> {
    let timestamp = format_amz_date(request.time);
    let date_stamp = format_date_stamp(request.time);

    // Derive signing key on demand; the scope ties it to this date.
    let scope = Scope::new(date_stamp.as_str(), region);
    let key = SigningKey::derive(secret_key, &date_stamp, region, "s3");

    let host = extract_host(request.url)?;
    let headers = vec![("host".to_string(), host)];
    let signed_headers: String = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    // Build query parameters
    let mut query_params: Vec<(String, String)> = vec![
        ("X-Amz-Algorithm".into(), ALGORITHM.into()),
        ("X-Amz-Content-Sha256".into(), UNSIGNED_PAYLOAD.into()),
        ("X-Amz-Credential".into(), scope.credential(access_key)),
        ("X-Amz-Date".into(), timestamp.clone()),
        ("X-Amz-Expires".into(), request.expires.to_string()),
        ("X-Amz-SignedHeaders".into(), signed_headers.clone()),
    ];

    // Include existing query parameters from the request URL
    for (key, value) in request.url.query_pairs() {
        query_params.push((key.into_owned(), value.into_owned()));
    }

    // Sort all query parameters alphabetically (required by SigV4)
    query_params.sort_by(|a, b| a.0.cmp(&b.0));

    let canonical = canonical_request(request.method, request.url, &query_params, &headers);
    let payload = string_to_sign(&timestamp, &scope, &sha256_hex(canonical.as_bytes()));
    let signature = key.sign(payload.as_bytes());

    // Build final URL with all query parameters
    let mut url = request.url.clone();
    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        for (k, v) in &query_params {
            query.append_pair(k, v);
        }
        query.append_pair("X-Amz-Signature", &signature.to_string());
    }

    Ok(url)
}

/// The canonical request text whose SHA-256 enters the string-to-sign.
///
/// Query parameters must already be sorted by name.
fn canonical_request(
    method: &str,
    url: &Url,
    query_params: &[(String, String)],
    headers: &[(String, String)],
) -> String {
    let canonical_uri = percent_encode_path(url.path());

    let canonical_query: String = query_params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let canonical_headers: String = headers
        .iter()
        .map(|(k, v)| format!("{}:{}", k, v.trim()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n{}\n{}\n{}\n\n{}\n{}",
        method,
        canonical_uri,
        canonical_query,
        canonical_headers,
        headers
            .iter()
            .map(|(k, _)| k.as_str())
            .collect::<Vec<_>>()
            .join(";"),
        UNSIGNED_PAYLOAD
    )
}

/// Extract host string from URL, including port for non-standard ports.
fn extract_host(url: &Url) -> Result<String, PresignError> {
    let hostname = url
        .host_str()
        .ok_or_else(|| PresignError::InvalidEndpoint("URL missing host".into()))?;

    Ok(match url.port() {
        Some(port) => format!("{}:{}", hostname, port),
        None => hostname.to_string(),
    })
}
