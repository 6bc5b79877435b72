//! POST policy credentials with a single-stage HMAC-SHA1 signature.

use depot_signing::policy::PolicyDocument;
use depot_signing::v1::sign_policy;

use super::{SigningContext, file_path};
use crate::credential::Credential;
use crate::issuer::IssueCause;
use crate::key::ObjectKey;

pub(crate) fn issue(
    ctx: &SigningContext<'_>,
    key: &ObjectKey,
) -> Result<Credential, IssueCause> {
    let config = ctx.config;

    // Condition order is part of the signed bytes: bucket, key, size range.
    let policy = PolicyDocument::new(config.expiration_at(ctx.now))
        .match_bucket(config.bucket())
        .match_key(key.as_str())
        .content_length_range(0, config.max_upload_bytes());
    let encoded = policy.encode()?;
    let signature = sign_policy(config.secret_key(), &encoded);

    let server_url = config.server_url().trim_end_matches('/').to_string();
    Ok(Credential::PostPolicy {
        file_path: file_path(config, &server_url, key),
        access_key: config.access_key().to_string(),
        policy: encoded.to_string(),
        signature: signature.to_string(),
        object_key: key.to_string(),
        server_url,
    })
}
