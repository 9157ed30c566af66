//! Bitbucket Server access tokens.

use super::{
    credential_description, credential_id, decode_field, require_data,
    require_field,
};
use crate::prelude::*;

/// Converts `bitbucketToken` secrets, which carry their token in the `token`
/// field.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitbucketTokenConverter;

impl SecretToCredentialConverter for BitbucketTokenConverter {
    fn type_tag(&self) -> &'static str {
        "bitbucketToken"
    }

    #[instrument(level = "debug", skip_all, fields(secret = %secret.name()))]
    fn convert(&self, secret: &Secret) -> Result<Credential, ConversionError> {
        require_data(secret, "bitbucketToken definition contains no data")?;
        let encoded = require_field(
            secret,
            "token",
            "bitbucketToken credential is missing the token",
        )?;
        let token = decode_field(
            encoded,
            "bitbucketToken credential has an invalid token (must be base64 encoded UTF-8)",
        )?;
        debug!("decoded bitbucketToken credential");

        // Bitbucket tokens are only configurable by administrators, so the
        // scope annotation is ignored.
        Ok(Credential::new(
            CredentialKind::BitbucketToken,
            credential_id(secret),
            credential_description(secret),
            Scope::System,
            token,
        ))
    }
}

#[cfg(test)]
fn convert_fixture(yaml: &str) -> Result<Credential, ConversionError> {
    BitbucketTokenConverter.convert(&super::fixture(yaml))
}

#[test]
fn can_convert() {
    let converter = BitbucketTokenConverter;
    assert!(converter.can_convert("bitbucketToken"));
    assert!(!converter.can_convert("something"));
    assert!(!converter.can_convert("bitbuckettoken"));
    assert!(!converter.can_convert("secretText"));
    assert!(!converter.can_convert(""));
}

#[test]
fn converts_a_valid_secret() {
    let credential =
        convert_fixture(include_str!("fixtures/bitbucket-token-valid.yaml"))
            .expect("conversion failed");
    assert_eq!(credential.id(), "a-test-token");
    assert_eq!(
        credential.description(),
        "bitbucket token credential from Kubernetes"
    );
    assert_eq!(credential.scope(), Scope::System);
    assert_eq!(credential.kind(), CredentialKind::BitbucketToken);
    assert_eq!(credential.secret().plain_text(), "secret-abc");
}

#[test]
fn ignores_the_scope_annotation() {
    let credential =
        convert_fixture(include_str!("fixtures/bitbucket-token-scoped.yaml"))
            .expect("conversion failed");
    assert_eq!(credential.scope(), Scope::System);
}

#[test]
fn converts_a_mapped_secret() {
    let credential =
        convert_fixture(include_str!("fixtures/bitbucket-token-mapped.yaml"))
            .expect("conversion failed");
    assert_eq!(credential.description(), "");
    assert_eq!(credential.secret().plain_text(), "secret-abc");
}

#[test]
fn minimal_secret() {
    let yaml = "metadata: { name: x, annotations: { jenkins.io/credentials-description: d } }\n\
                data: { token: c2VjcmV0LWFiYw== }\n";
    let credential = convert_fixture(yaml).expect("conversion failed");
    assert_eq!(credential.id(), "x");
    assert_eq!(credential.description(), "d");
    assert_eq!(credential.scope(), Scope::System);
    assert_eq!(credential.secret().plain_text(), "secret-abc");
}

#[test]
fn fails_when_token_missing() {
    let err = convert_fixture(include_str!("fixtures/bitbucket-token-missing.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConversionError::MissingField(_)));
    assert!(err.to_string().contains("missing the token"));
}

#[test]
fn fails_when_token_corrupt() {
    let err = convert_fixture(include_str!("fixtures/bitbucket-token-corrupt.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConversionError::InvalidEncoding(_)));
    assert!(err.to_string().contains("invalid token"));
}

#[test]
fn fails_when_data_empty() {
    let err = convert_fixture(include_str!("fixtures/bitbucket-token-void.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConversionError::MissingData(_)));
    assert!(err.to_string().contains("no data"));
}
