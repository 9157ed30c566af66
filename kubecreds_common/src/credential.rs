//! Credentials handed to the CI host.

use std::str::FromStr;

use crate::prelude::*;

/// Who may use a credential.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scope {
    /// Available to jobs and to the host itself.
    Global,
    /// Only available to the host itself, and only configurable by
    /// administrators.
    System,
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Global
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Scope::Global => "global",
            Scope::System => "system",
        };
        f.write_str(s)
    }
}

impl FromStr for Scope {
    type Err = ConversionError;

    /// Parse a scope annotation. Matching ignores case and surrounding
    /// whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("global") {
            Ok(Scope::Global)
        } else if trimmed.eq_ignore_ascii_case("system") {
            Ok(Scope::System)
        } else {
            Err(ConversionError::InvalidScope(format!(
                "invalid credentials scope {:?} (must be \"global\" or \"system\")",
                s
            )))
        }
    }
}

/// The kind of credential the host should register.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialKind {
    /// A plain secret string.
    SecretText,
    /// An access token for a Bitbucket Server instance.
    BitbucketToken,
}

/// A credential decoded from a Kubernetes secret.
///
/// Only converters build these, and only after every required field has been
/// found and decoded.
#[derive(Clone, Debug, Serialize)]
pub struct Credential {
    id: String,
    description: String,
    scope: Scope,
    kind: CredentialKind,
    secret: SecretText,
}

impl Credential {
    pub(crate) fn new(
        kind: CredentialKind,
        id: String,
        description: String,
        scope: Scope,
        secret: SecretText,
    ) -> Self {
        Self {
            id,
            description,
            scope,
            kind,
            secret,
        }
    }

    /// The credential's ID, which is the name of the secret it came from.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// A human-readable description. May be empty.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Who may use this credential.
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// What kind of credential this is.
    pub fn kind(&self) -> CredentialKind {
        self.kind
    }

    /// The decoded secret.
    pub fn secret(&self) -> &SecretText {
        &self.secret
    }
}

#[test]
fn scope_parsing() {
    assert_eq!("global".parse::<Scope>().unwrap(), Scope::Global);
    assert_eq!("SYSTEM".parse::<Scope>().unwrap(), Scope::System);
    assert_eq!(" System ".parse::<Scope>().unwrap(), Scope::System);
    let err = "user".parse::<Scope>().unwrap_err();
    assert!(err.to_string().contains("invalid credentials scope"));
}

#[test]
fn serialized_credentials_are_redacted() {
    let credential = Credential::new(
        CredentialKind::BitbucketToken,
        "x".to_owned(),
        "d".to_owned(),
        Scope::System,
        SecretText::from_plain_text("secret-abc"),
    );
    let json = serde_json::to_value(&credential).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "x",
            "description": "d",
            "scope": "SYSTEM",
            "kind": "bitbucketToken",
            "secret": "****",
        })
    );
}
