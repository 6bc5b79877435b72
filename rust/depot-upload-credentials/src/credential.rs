//! Issued credential payloads.
//!
//! A [`Credential`] is the complete set of fields a client needs to upload
//! one object directly to the backing store. It is immutable once issued and
//! has no further lifecycle here — the serving layer forwards it and the
//! remote backend enforces its expiration.
//!
//! Serialized field names are part of the wire contract (`serverUrl`,
//! `x-amz-credential`, ...); the enum is internally tagged with
//! `backendKind` so every payload names its variant.

use serde::{Deserialize, Serialize};

/// Which credential protocol a backend speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendKind {
    /// SigV4 presigned PUT URL.
    #[serde(rename = "presigned-put")]
    PresignedPut,
    /// POST policy with a single-stage HMAC-SHA1 signature.
    #[serde(rename = "post-policy")]
    PostPolicy,
    /// POST policy with an AWS4 signature.
    #[serde(rename = "post-policy-v4")]
    PostPolicyV4,
    /// Opaque upload token.
    #[serde(rename = "token")]
    Token,
}

impl BackendKind {
    /// The wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PresignedPut => "presigned-put",
            Self::PostPolicy => "post-policy",
            Self::PostPolicyV4 => "post-policy-v4",
            Self::Token => "token",
        }
    }

    /// Whether this kind's signing chain consumes the configured region.
    pub(crate) fn requires_region(&self) -> bool {
        matches!(self, Self::PresignedPut | Self::PostPolicyV4)
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A credential authorizing one direct upload.
///
/// Every variant carries the object key the upload must land on and the
/// `filePath` the caller should persist as the object's eventual public URL.
/// No variant ever carries the secret key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "backendKind")]
pub enum Credential {
    /// A presigned PUT URL; the signature lives in its query parameters.
    #[serde(rename = "presigned-put")]
    PresignedPut {
        /// Bucket base URL uploads resolve against.
        #[serde(rename = "serverUrl")]
        server_url: String,
        /// The URL to PUT the object to, valid until the embedded expiry.
        #[serde(rename = "presignedUrl")]
        presigned_url: String,
        /// Key the object will be stored under.
        #[serde(rename = "objectKey")]
        object_key: String,
        /// Public URL of the object once uploaded.
        #[serde(rename = "filePath")]
        file_path: String,
    },
    /// Browser form-upload fields with an HMAC-SHA1 policy signature.
    #[serde(rename = "post-policy")]
    PostPolicy {
        /// Form POST target.
        #[serde(rename = "serverUrl")]
        server_url: String,
        /// Access key the verifier resolves the secret for.
        #[serde(rename = "accessKey")]
        access_key: String,
        /// Base64 policy document.
        policy: String,
        /// Hex HMAC-SHA1 over the base64 policy.
        signature: String,
        /// Key the object will be stored under.
        #[serde(rename = "objectKey")]
        object_key: String,
        /// Public URL of the object once uploaded.
        #[serde(rename = "filePath")]
        file_path: String,
    },
    /// Browser form-upload fields with an AWS4 policy signature.
    #[serde(rename = "post-policy-v4")]
    PostPolicyV4 {
        /// Form POST target (endpoint plus bucket).
        #[serde(rename = "serverUrl")]
        server_url: String,
        /// Always `AWS4-HMAC-SHA256`.
        #[serde(rename = "x-amz-algorithm")]
        algorithm: String,
        /// Compact UTC signing timestamp.
        #[serde(rename = "x-amz-date")]
        amz_date: String,
        /// Access key plus credential scope.
        #[serde(rename = "x-amz-credential")]
        credential: String,
        /// Base64 policy document.
        policy: String,
        /// Hex AWS4 signature over the string-to-sign.
        signature: String,
        /// Key the object will be stored under.
        #[serde(rename = "objectKey")]
        object_key: String,
        /// Access key, surfaced separately for form construction.
        #[serde(rename = "accessKey")]
        access_key: String,
        /// Public URL of the object once uploaded.
        #[serde(rename = "filePath")]
        file_path: String,
        /// Signing region.
        region: String,
    },
    /// An opaque upload token.
    #[serde(rename = "token")]
    Token {
        /// Upload API base URL.
        #[serde(rename = "serverUrl")]
        server_url: String,
        /// Key the object will be stored under.
        #[serde(rename = "objectKey")]
        object_key: String,
        /// The token string the client submits with the upload.
        token: String,
        /// Public URL of the object once uploaded.
        #[serde(rename = "filePath")]
        file_path: String,
    },
}

impl Credential {
    /// The backend kind this credential was issued for.
    pub fn backend_kind(&self) -> BackendKind {
        match self {
            Self::PresignedPut { .. } => BackendKind::PresignedPut,
            Self::PostPolicy { .. } => BackendKind::PostPolicy,
            Self::PostPolicyV4 { .. } => BackendKind::PostPolicyV4,
            Self::Token { .. } => BackendKind::Token,
        }
    }

    /// The object key the upload is scoped to.
    pub fn object_key(&self) -> &str {
        match self {
            Self::PresignedPut { object_key, .. }
            | Self::PostPolicy { object_key, .. }
            | Self::PostPolicyV4 { object_key, .. }
            | Self::Token { object_key, .. } => object_key,
        }
    }

    /// The public URL to persist for the uploaded object.
    pub fn file_path(&self) -> &str {
        match self {
            Self::PresignedPut { file_path, .. }
            | Self::PostPolicy { file_path, .. }
            | Self::PostPolicyV4 { file_path, .. }
            | Self::Token { file_path, .. } => file_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_tags_payloads_with_the_backend_kind() {
        let credential = Credential::Token {
            server_url: "https://up.example.com".into(),
            object_key: "media/01HV.png".into(),
            token: "ak:sig:policy".into(),
            file_path: "https://cdn.example.com/media/01HV.png".into(),
        };

        let json = serde_json::to_value(&credential).unwrap();
        assert_eq!(json["backendKind"], "token");
        assert_eq!(json["objectKey"], "media/01HV.png");
        assert_eq!(json["serverUrl"], "https://up.example.com");
    }

    #[test]
    fn it_uses_wire_names_for_aws4_fields() {
        let credential = Credential::PostPolicyV4 {
            server_url: "https://minio.example.com/media".into(),
            algorithm: "AWS4-HMAC-SHA256".into(),
            amz_date: "20240101T000000Z".into(),
            credential: "ak/20240101/us-east-1/s3/aws4_request".into(),
            policy: "e30=".into(),
            signature: "00".into(),
            object_key: "k".into(),
            access_key: "ak".into(),
            file_path: "https://minio.example.com/media/k".into(),
            region: "us-east-1".into(),
        };

        let json = serde_json::to_value(&credential).unwrap();
        assert_eq!(json["x-amz-algorithm"], "AWS4-HMAC-SHA256");
        assert_eq!(json["x-amz-date"], "20240101T000000Z");
        assert_eq!(json["x-amz-credential"], "ak/20240101/us-east-1/s3/aws4_request");
        assert_eq!(json["backendKind"], "post-policy-v4");
    }

    #[test]
    fn it_exposes_common_accessors() {
        let credential = Credential::PresignedPut {
            server_url: "https://media.s3.amazonaws.com".into(),
            presigned_url: "https://media.s3.amazonaws.com/k?X-Amz-Signature=00".into(),
            object_key: "k".into(),
            file_path: "https://media.s3.amazonaws.com/k".into(),
        };

        assert_eq!(credential.backend_kind(), BackendKind::PresignedPut);
        assert_eq!(credential.object_key(), "k");
        assert_eq!(credential.file_path(), "https://media.s3.amazonaws.com/k");
    }
}
