//! A table of the converters we know about.

use crate::convert::{BitbucketTokenConverter, SecretTextConverter};
use crate::kubernetes::TYPE_LABEL;
use crate::prelude::*;

/// Converters, looked up by the credential type tag of a secret.
///
/// Registration happens once at startup; afterwards the registry is
/// read-only and may be shared freely between threads.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: Vec<Box<dyn SecretToCredentialConverter>>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry containing every converter in this crate.
    pub fn with_default_converters() -> Self {
        let mut registry = Self::new();
        registry.register(SecretTextConverter);
        registry.register(BitbucketTokenConverter);
        registry
    }

    /// Add a converter. If two converters accept the same type tag, the one
    /// registered first wins.
    pub fn register<C>(&mut self, converter: C)
    where
        C: SecretToCredentialConverter + 'static,
    {
        trace!(type_tag = converter.type_tag(), "registering converter");
        self.converters.push(Box::new(converter));
    }

    /// The type tags of all registered converters, in registration order.
    pub fn type_tags(&self) -> Vec<&'static str> {
        self.converters.iter().map(|c| c.type_tag()).collect()
    }

    /// Find the converter for `type_tag`.
    pub fn find(&self, type_tag: &str) -> Option<&dyn SecretToCredentialConverter> {
        self.converters
            .iter()
            .find(|c| c.can_convert(type_tag))
            .map(|c| &**c)
    }

    /// Convert `secret` using the converter named by its type label.
    pub fn convert(&self, secret: &Secret) -> Result<Credential, ConversionError> {
        let type_tag = secret.type_tag().ok_or_else(|| {
            ConversionError::MissingType(format!(
                "secret {:?} has no {} label",
                secret.name(),
                TYPE_LABEL
            ))
        })?;
        let converter = self.find(type_tag).ok_or_else(|| {
            ConversionError::UnsupportedType(format!(
                "secret {:?} has unsupported credentials type {:?}",
                secret.name(),
                type_tag
            ))
        })?;
        converter.convert(secret)
    }

    /// Convert every secret we can. Secrets which can't be converted are
    /// logged and skipped.
    pub fn convert_all<'a, I>(&self, secrets: I) -> Vec<Credential>
    where
        I: IntoIterator<Item = &'a Secret>,
    {
        let mut credentials = vec![];
        for secret in secrets {
            match self.convert(secret) {
                Ok(credential) => credentials.push(credential),
                Err(err) => warn!(
                    secret = %secret.name(),
                    "skipping secret which could not be converted: {}",
                    err
                ),
            }
        }
        debug!(count = credentials.len(), "converted secrets");
        credentials
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("type_tags", &self.type_tags())
            .finish()
    }
}

#[cfg(test)]
fn secret_typed(name: &str, type_tag: &str, data: &[(&str, &str)]) -> Secret {
    let mut secret = Secret::default();
    secret.metadata.name = Some(name.to_owned());
    secret
        .metadata
        .labels
        .insert(TYPE_LABEL.to_owned(), type_tag.to_owned());
    secret.data = Some(
        data.iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect(),
    );
    secret
}

#[test]
fn default_converters_are_registered() {
    let registry = ConverterRegistry::with_default_converters();
    assert_eq!(registry.type_tags(), vec!["secretText", "bitbucketToken"]);
    assert!(registry.find("secretText").is_some());
    assert!(registry.find("bitbucketToken").is_some());
    assert!(registry.find("usernamePassword").is_none());
    assert!(ConverterRegistry::new().find("secretText").is_none());
}

#[test]
fn dispatches_on_type_label() {
    let registry = ConverterRegistry::with_default_converters();

    let token = secret_typed("t", "bitbucketToken", &[("token", "c2VjcmV0LWFiYw==")]);
    let credential = registry.convert(&token).expect("conversion failed");
    assert_eq!(credential.kind(), CredentialKind::BitbucketToken);
    assert_eq!(credential.secret().plain_text(), "secret-abc");

    let text = secret_typed("s", "secretText", &[("text", "bXlTZWNyZXQh")]);
    let credential = registry.convert(&text).expect("conversion failed");
    assert_eq!(credential.kind(), CredentialKind::SecretText);
    assert_eq!(credential.scope(), Scope::Global);
}

#[test]
fn rejects_missing_and_unknown_types() {
    let registry = ConverterRegistry::with_default_converters();

    let untyped = Secret::default();
    assert!(matches!(
        registry.convert(&untyped),
        Err(ConversionError::MissingType(_))
    ));

    let unknown = secret_typed("u", "usernamePassword", &[]);
    let err = registry.convert(&unknown).unwrap_err();
    assert!(matches!(err, ConversionError::UnsupportedType(_)));
    assert!(err.to_string().contains("usernamePassword"));
}

#[test]
fn convert_all_skips_bad_secrets() {
    let registry = ConverterRegistry::with_default_converters();
    let secrets = vec![
        secret_typed("good", "secretText", &[("text", "bXlTZWNyZXQh")]),
        secret_typed("corrupt", "bitbucketToken", &[("token", "!!!")]),
        secret_typed("unknown", "sshKey", &[]),
        Secret::default(),
        secret_typed("also-good", "bitbucketToken", &[("token", "c2VjcmV0LWFiYw==")]),
    ];
    let credentials = registry.convert_all(&secrets);
    let ids = credentials.iter().map(|c| c.id()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["good", "also-good"]);
}

#[test]
fn registry_can_be_shared_between_threads() {
    use std::{sync::Arc, thread};

    let registry = Arc::new(ConverterRegistry::with_default_converters());
    let handles = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let secret = secret_typed(
                    &format!("secret-{}", i),
                    "bitbucketToken",
                    &[("token", "c2VjcmV0LWFiYw==")],
                );
                registry.convert(&secret).map(|c| c.id().to_owned())
            })
        })
        .collect::<Vec<_>>();
    for (i, handle) in handles.into_iter().enumerate() {
        let id = handle.join().expect("thread panicked").expect("conversion failed");
        assert_eq!(id, format!("secret-{}", i));
    }
}
