//! POST policy credentials with an AWS4 signature.

use depot_signing::policy::PolicyDocument;
use depot_signing::sigv4::{
    ALGORITHM, Scope, SigningKey, format_amz_date, format_date_stamp, post_policy_string_to_sign,
};

use super::{SigningContext, file_path};
use crate::credential::Credential;
use crate::issuer::IssueCause;
use crate::key::ObjectKey;

pub(crate) fn issue(
    ctx: &SigningContext<'_>,
    key: &ObjectKey,
) -> Result<Credential, IssueCause> {
    let config = ctx.config;

    let amz_date = format_amz_date(ctx.now);
    let date_stamp = format_date_stamp(ctx.now);
    let scope = Scope::new(date_stamp.as_str(), config.region());
    let credential = scope.credential(config.access_key());

    // The policy pins the form fields the verifier recomputes the signature
    // from; their order is part of the signed bytes.
    let policy = PolicyDocument::new(config.expiration_at(ctx.now))
        .match_bucket(config.bucket())
        .match_key(key.as_str())
        .content_length_range(0, config.max_upload_bytes())
        .match_field("x-amz-algorithm", ALGORITHM)
        .match_field("x-amz-credential", &credential)
        .match_field("x-amz-date", &amz_date);
    let encoded = policy.encode()?;

    let payload = post_policy_string_to_sign(&amz_date, &scope, &encoded);
    // Derived fresh for this request's date; stale keys fail verification.
    let signature = SigningKey::derive(config.secret_key(), &date_stamp, config.region(), "s3")
        .sign(payload.as_bytes());

    let server_url = format!(
        "{}/{}",
        config.server_url().trim_end_matches('/'),
        config.bucket()
    );
    Ok(Credential::PostPolicyV4 {
        file_path: file_path(config, &server_url, key),
        algorithm: ALGORITHM.to_string(),
        amz_date,
        credential,
        policy: encoded.to_string(),
        signature: signature.to_string(),
        object_key: key.to_string(),
        access_key: config.access_key().to_string(),
        region: config.region().to_string(),
        server_url,
    })
}
