//! Converting Kubernetes secrets into credentials.
//!
//! Each credential type has its own converter, selected by the type tag in
//! the secret's [`TYPE_LABEL`](crate::kubernetes::TYPE_LABEL). A conversion
//! either produces a complete [`Credential`] or fails with a
//! [`ConversionError`] explaining what was wrong with the secret.

use thiserror::Error;

use crate::kubernetes::base64_decode_to_string;
use crate::prelude::*;

mod bitbucket_token;
mod secret_text;

pub use self::bitbucket_token::BitbucketTokenConverter;
pub use self::secret_text::SecretTextConverter;

/// Why a secret could not be turned into a credential.
///
/// Each variant carries a human-readable message naming the credential type
/// and the offending field. None of these are worth retrying.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConversionError {
    /// The secret has no `data` section.
    #[error("{0}")]
    MissingData(String),
    /// A required field is absent from the secret's data.
    #[error("{0}")]
    MissingField(String),
    /// A field is not valid Base64, or does not decode to UTF-8.
    #[error("{0}")]
    InvalidEncoding(String),
    /// The scope annotation names an unknown scope.
    #[error("{0}")]
    InvalidScope(String),
    /// The secret does not declare a credential type.
    #[error("{0}")]
    MissingType(String),
    /// No converter handles the secret's credential type.
    #[error("{0}")]
    UnsupportedType(String),
}

/// Converts secrets with a particular type tag into credentials.
pub trait SecretToCredentialConverter: Send + Sync {
    /// The type tag handled by this converter.
    fn type_tag(&self) -> &'static str;

    /// Can we convert secrets with the type tag `type_tag`? The comparison is
    /// exact.
    fn can_convert(&self, type_tag: &str) -> bool {
        type_tag == self.type_tag()
    }

    /// Convert `secret` into a credential.
    fn convert(&self, secret: &Secret) -> Result<Credential, ConversionError>;
}

/// Fail with [`ConversionError::MissingData`] unless `secret` has a data
/// section.
pub(crate) fn require_data(
    secret: &Secret,
    message: &str,
) -> Result<(), ConversionError> {
    match secret.data {
        Some(_) => Ok(()),
        None => Err(ConversionError::MissingData(message.to_owned())),
    }
}

/// Look up the still-encoded value of `field`, failing with
/// [`ConversionError::MissingField`] if it's absent.
pub(crate) fn require_field<'a>(
    secret: &'a Secret,
    field: &str,
    message: &str,
) -> Result<&'a str, ConversionError> {
    secret
        .encoded_field(field)
        .ok_or_else(|| ConversionError::MissingField(message.to_owned()))
}

/// Decode a Base64-encoded UTF-8 field value, failing with
/// [`ConversionError::InvalidEncoding`].
pub(crate) fn decode_field(
    encoded: &str,
    message: &str,
) -> Result<SecretText, ConversionError> {
    base64_decode_to_string(encoded)
        .map(SecretText::from_plain_text)
        .ok_or_else(|| ConversionError::InvalidEncoding(message.to_owned()))
}

/// The credential ID for `secret`.
pub(crate) fn credential_id(secret: &Secret) -> String {
    secret.name().to_owned()
}

/// The credential description for `secret`, defaulting to `""`.
pub(crate) fn credential_description(secret: &Secret) -> String {
    secret.description().unwrap_or_default().to_owned()
}

/// The credential scope requested by `secret`, defaulting to
/// [`Scope::Global`].
pub(crate) fn credential_scope(secret: &Secret) -> Result<Scope, ConversionError> {
    match secret.scope_annotation() {
        Some(scope) => scope.parse(),
        None => Ok(Scope::default()),
    }
}

/// Load a secret fixture for use in tests.
#[cfg(test)]
pub(crate) fn fixture(yaml: &str) -> Secret {
    serde_yaml::from_str(yaml).expect("could not parse fixture")
}

#[test]
fn errors_display_their_message() {
    let err = ConversionError::MissingField("x credential is missing the y".to_owned());
    assert_eq!(err.to_string(), "x credential is missing the y");
}

#[test]
fn scope_defaults_to_global() {
    let secret = fixture("metadata: { name: plain }\n");
    assert_eq!(credential_scope(&secret), Ok(Scope::Global));
    assert_eq!(credential_description(&secret), "");
    assert_eq!(credential_id(&secret), "plain");
}
