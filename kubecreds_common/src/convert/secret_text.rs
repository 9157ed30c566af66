//! Plain secret strings.

use super::{
    credential_description, credential_id, credential_scope, decode_field,
    require_data, require_field,
};
use crate::prelude::*;

/// Converts `secretText` secrets, which carry their value in the `text` field
/// and may choose their own scope.
#[derive(Clone, Copy, Debug, Default)]
pub struct SecretTextConverter;

impl SecretToCredentialConverter for SecretTextConverter {
    fn type_tag(&self) -> &'static str {
        "secretText"
    }

    #[instrument(level = "debug", skip_all, fields(secret = %secret.name()))]
    fn convert(&self, secret: &Secret) -> Result<Credential, ConversionError> {
        require_data(secret, "secretText definition contains no data")?;
        let encoded =
            require_field(secret, "text", "secretText credential is missing the text")?;
        let text = decode_field(
            encoded,
            "secretText credential has an invalid text (must be base64 encoded UTF-8)",
        )?;
        let scope = credential_scope(secret)?;
        debug!(%scope, "decoded secretText credential");
        Ok(Credential::new(
            CredentialKind::SecretText,
            credential_id(secret),
            credential_description(secret),
            scope,
            text,
        ))
    }
}

#[cfg(test)]
fn convert_fixture(yaml: &str) -> Result<Credential, ConversionError> {
    SecretTextConverter.convert(&super::fixture(yaml))
}

#[test]
fn can_convert() {
    let converter = SecretTextConverter;
    assert!(converter.can_convert("secretText"));
    assert!(!converter.can_convert("something"));
    assert!(!converter.can_convert("bitbucketToken"));
}

#[test]
fn converts_a_valid_secret() {
    let credential = convert_fixture(include_str!("fixtures/secret-text-valid.yaml"))
        .expect("conversion failed");
    assert_eq!(credential.id(), "a-test-secret");
    assert_eq!(
        credential.description(),
        "secret text credential from Kubernetes"
    );
    assert_eq!(credential.scope(), Scope::Global);
    assert_eq!(credential.kind(), CredentialKind::SecretText);
    assert_eq!(credential.secret().plain_text(), "mySecret!");
}

#[test]
fn converts_a_valid_scoped_secret() {
    let credential = convert_fixture(include_str!("fixtures/secret-text-scoped.yaml"))
        .expect("conversion failed");
    assert_eq!(credential.scope(), Scope::System);
    assert_eq!(credential.secret().plain_text(), "mySecret!");
}

#[test]
fn fails_when_scope_unknown() {
    let err = convert_fixture(include_str!("fixtures/secret-text-bad-scope.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConversionError::InvalidScope(_)));
    assert!(err.to_string().contains("\"user\""));
}

#[test]
fn fails_when_text_missing() {
    let err = convert_fixture(include_str!("fixtures/secret-text-missing.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConversionError::MissingField(_)));
    assert!(err.to_string().contains("missing the text"));
}

#[test]
fn fails_when_text_corrupt() {
    let err = convert_fixture(include_str!("fixtures/secret-text-corrupt.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConversionError::InvalidEncoding(_)));
    assert!(err.to_string().contains("invalid text"));
}

#[test]
fn fails_when_data_empty() {
    let err = convert_fixture(include_str!("fixtures/secret-text-void.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConversionError::MissingData(_)));
    assert!(err.to_string().contains("contains no data"));
}
