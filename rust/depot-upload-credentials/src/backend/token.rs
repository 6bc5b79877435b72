//! Opaque upload-token credentials.

use depot_signing::token::{UploadScope, upload_token};

use super::{SigningContext, file_path};
use crate::credential::Credential;
use crate::issuer::IssueCause;
use crate::key::ObjectKey;

pub(crate) fn issue(
    ctx: &SigningContext<'_>,
    key: &ObjectKey,
) -> Result<Credential, IssueCause> {
    let config = ctx.config;

    let scope = UploadScope::bucket_and_key(config.bucket(), key.as_str());
    let deadline = config.expiration_at(ctx.now).timestamp();
    let token = upload_token(config.access_key(), config.secret_key(), &scope, deadline)?;

    let server_url = config.server_url().trim_end_matches('/').to_string();
    Ok(Credential::Token {
        file_path: file_path(config, &server_url, key),
        object_key: key.to_string(),
        token,
        server_url,
    })
}
