//! Sensitive values decoded from Kubernetes secrets.

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};
use std::fmt;

/// What we print or serialize in place of a secret.
pub const REDACTED: &str = "****";

/// A decoded secret value, such as a token or password.
///
/// The plaintext is zeroized on drop and never appears in `Debug`, `Display`
/// or serialized output. Use [`SecretText::plain_text`] to hand it to the code
/// that actually needs it.
pub struct SecretText(SecretString);

impl SecretText {
    /// Wrap a plaintext value.
    pub fn from_plain_text(plain_text: impl Into<String>) -> Self {
        Self(SecretString::from(plain_text.into()))
    }

    /// Get the plaintext value.
    pub fn plain_text(&self) -> &str {
        self.0.expose_secret()
    }

    /// Is the secret empty?
    pub fn is_empty(&self) -> bool {
        self.plain_text().is_empty()
    }
}

impl Clone for SecretText {
    fn clone(&self) -> Self {
        Self::from_plain_text(self.plain_text())
    }
}

impl fmt::Debug for SecretText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretText({})", REDACTED)
    }
}

impl fmt::Display for SecretText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for SecretText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

#[test]
fn formatting_never_shows_plain_text() {
    let secret = SecretText::from_plain_text("mySecret!");
    assert_eq!(format!("{}", secret), "****");
    assert_eq!(format!("{:?}", secret), "SecretText(****)");
    assert_eq!(serde_json::to_string(&secret).unwrap(), "\"****\"");
    assert_eq!(secret.plain_text(), "mySecret!");
}

#[test]
fn clone_keeps_plain_text() {
    let secret = SecretText::from_plain_text("s3cr3t");
    let copy = secret.clone();
    drop(secret);
    assert_eq!(copy.plain_text(), "s3cr3t");
    assert!(!copy.is_empty());
}
