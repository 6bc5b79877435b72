//! Presigned PUT credentials for S3-compatible backends.

use depot_signing::presign::{PresignRequest, presign};

use super::{SigningContext, bucket_base, file_path, object_url};
use crate::credential::Credential;
use crate::issuer::IssueCause;
use crate::key::ObjectKey;

pub(crate) fn issue(
    ctx: &SigningContext<'_>,
    key: &ObjectKey,
) -> Result<Credential, IssueCause> {
    let config = ctx.config;

    let url = object_url(config, key)?;
    let request = PresignRequest {
        method: "PUT",
        url: &url,
        expires: config.credential_ttl_secs(),
        time: ctx.now,
    };
    let presigned = presign(
        &request,
        config.access_key(),
        config.secret_key(),
        config.region(),
    )?;

    let base = bucket_base(config)?;
    Ok(Credential::PresignedPut {
        file_path: file_path(config, &base, key),
        server_url: base,
        presigned_url: presigned.to_string(),
        object_key: key.to_string(),
    })
}
