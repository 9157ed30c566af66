//! Tools for talking to Kubernetes, and the subset of the `Secret` object
//! that we understand.

use serde::de::DeserializeOwned;
use std::process::{Command, Stdio};

use crate::prelude::*;

/// Label holding the credential type tag of a secret.
pub const TYPE_LABEL: &str = "jenkins.io/credentials-type";

/// Annotation holding an optional credential description.
pub const DESCRIPTION_ANNOTATION: &str = "jenkins.io/credentials-description";

/// Annotation holding an optional credential scope.
pub const SCOPE_ANNOTATION: &str = "jenkins.io/credentials-scope";

/// Prefix of annotations that map a credential field onto a differently-named
/// data key. `jenkins.io/credentials-keybinding-token: pat` means "read the
/// `token` field from the `pat` key".
pub const KEYBINDING_ANNOTATION_PREFIX: &str = "jenkins.io/credentials-keybinding-";

/// A Kubernetes secret (missing lots of fields).
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Secret {
    /// Standard Kubernetes metadata.
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// Our secret data, as Base64-encoded strings. Kubernetes omits this
    /// entirely when the secret has no keys.
    #[serde(default)]
    pub data: Option<BTreeMap<String, String>>,
}

/// Kubernetes object metadata (missing lots of fields).
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ObjectMeta {
    /// The name of the object.
    pub name: Option<String>,
    /// The namespace containing the object.
    pub namespace: Option<String>,
    /// Identifying labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// Non-identifying annotations.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// A list of Kubernetes objects, as returned by `kubectl get -o json`.
#[derive(Debug, Deserialize)]
struct List<T> {
    #[serde(bound(deserialize = "T: Deserialize<'de>"))]
    items: Vec<T>,
}

impl Secret {
    /// Parse one or more `---`-separated YAML documents, each containing a
    /// secret. Empty documents are skipped.
    pub fn from_yaml_documents(yaml: &str) -> Result<Vec<Secret>> {
        let mut secrets = vec![];
        for document in serde_yaml::Deserializer::from_str(yaml) {
            let value = serde_yaml::Value::deserialize(document)
                .context("could not parse YAML document")?;
            if value.is_null() {
                continue;
            }
            let secret = serde_yaml::from_value(value)
                .context("YAML document is not a Kubernetes secret")?;
            secrets.push(secret);
        }
        Ok(secrets)
    }

    /// The name of this secret, or `""` if it has none.
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or("")
    }

    /// The credential type tag declared by this secret's labels.
    pub fn type_tag(&self) -> Option<&str> {
        self.metadata.labels.get(TYPE_LABEL).map(|s| s.as_str())
    }

    /// The credential description declared in our annotations, if any.
    pub fn description(&self) -> Option<&str> {
        self.annotation(DESCRIPTION_ANNOTATION)
    }

    /// The raw scope annotation, if any.
    pub fn scope_annotation(&self) -> Option<&str> {
        self.annotation(SCOPE_ANNOTATION)
    }

    /// Look up an annotation by key.
    pub fn annotation(&self, key: &str) -> Option<&str> {
        self.metadata.annotations.get(key).map(|s| s.as_str())
    }

    /// The data key holding the credential field `field`, taking any
    /// keybinding annotation into account.
    pub fn data_key_for<'a>(&'a self, field: &'a str) -> &'a str {
        let binding = format!("{}{}", KEYBINDING_ANNOTATION_PREFIX, field);
        self.annotation(&binding).unwrap_or(field)
    }

    /// The still-encoded value of the credential field `field`, if present.
    /// Returns `None` if the secret has no data at all.
    pub fn encoded_field(&self, field: &str) -> Option<&str> {
        let key = self.data_key_for(field);
        self.data.as_ref()?.get(key).map(|s| s.as_str())
    }
}

/// Decode a secret represented as a Base64-encoded UTF-8 string. Returns
/// `None` if either decoding step fails.
pub fn base64_decode_to_string(encoded: &str) -> Option<String> {
    let bytes = base64::decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

/// Run `kubectl`, capture output as JSON, and parse it using the
/// specified type.
pub fn kubectl_parse_json<T: DeserializeOwned>(args: &[&str]) -> Result<T> {
    debug!("running kubectl {:?}", args);
    let output = Command::new("kubectl")
        .args(args)
        // Pass `stderr` through on console instead of capturing.
        .stderr(Stdio::inherit())
        .output()
        .with_context(|| format!("error starting kubectl with {:?}", args))?;
    if !output.status.success() {
        return Err(format_err!("error running kubectl with {:?}", args));
    }
    serde_json::from_slice(&output.stdout)
        .with_context(|| format!("error parsing output of kubectl {:?}", args))
}

/// Fetch every secret carrying a credential type label, either from
/// `namespace` or from the current context's namespace.
pub fn kubectl_credential_secrets(namespace: Option<&str>) -> Result<Vec<Secret>> {
    let mut args = vec!["get", "secrets", "-l", TYPE_LABEL, "-o", "json"];
    if let Some(namespace) = namespace {
        args.extend_from_slice(&["--namespace", namespace]);
    }
    let list: List<Secret> = kubectl_parse_json(&args)?;
    Ok(list.items)
}

#[test]
fn parse_kubectl_secret_list() {
    let json = r#"
{
  "apiVersion": "v1",
  "kind": "List",
  "items": [
    {
      "apiVersion": "v1",
      "kind": "Secret",
      "type": "Opaque",
      "metadata": {
        "name": "bitbucket-token",
        "namespace": "ci",
        "labels": { "jenkins.io/credentials-type": "bitbucketToken" },
        "annotations": {
          "jenkins.io/credentials-description": "token for the build bot"
        }
      },
      "data": { "token": "c2VjcmV0LWFiYw==" }
    },
    {
      "apiVersion": "v1",
      "kind": "Secret",
      "metadata": { "name": "empty" }
    }
  ]
}"#;
    let list: List<Secret> = serde_json::from_str(json).expect("parse error");
    assert_eq!(list.items.len(), 2);

    let token = &list.items[0];
    assert_eq!(token.name(), "bitbucket-token");
    assert_eq!(token.metadata.namespace.as_deref(), Some("ci"));
    assert_eq!(token.type_tag(), Some("bitbucketToken"));
    assert_eq!(token.description(), Some("token for the build bot"));
    assert_eq!(token.encoded_field("token"), Some("c2VjcmV0LWFiYw=="));

    let empty = &list.items[1];
    assert_eq!(empty.type_tag(), None);
    assert_eq!(empty.data, None);
    assert_eq!(empty.encoded_field("token"), None);
}

#[test]
fn parse_multiple_yaml_documents() {
    let yaml = r#"
---
apiVersion: v1
kind: Secret
metadata:
  name: first
data:
  text: bXlTZWNyZXQh
---
---
apiVersion: v1
kind: Secret
metadata:
  name: second
"#;
    let secrets = Secret::from_yaml_documents(yaml).expect("parse error");
    let names = secrets.iter().map(|s| s.name()).collect::<Vec<_>>();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn keybindings_remap_data_keys() {
    let yaml = r#"
metadata:
  name: mapped
  annotations:
    jenkins.io/credentials-keybinding-token: pat
data:
  pat: dG9rZW4=
  token: d3Jvbmc=
"#;
    let secret: Secret = serde_yaml::from_str(yaml).expect("parse error");
    assert_eq!(secret.data_key_for("token"), "pat");
    assert_eq!(secret.data_key_for("text"), "text");
    assert_eq!(secret.encoded_field("token"), Some("dG9rZW4="));
}

#[test]
fn base64_decoding() {
    assert_eq!(
        base64_decode_to_string("bXlTZWNyZXQh").as_deref(),
        Some("mySecret!")
    );
    assert_eq!(base64_decode_to_string("").as_deref(), Some(""));
    // Not Base64.
    assert_eq!(base64_decode_to_string("this is not base64!"), None);
    // Valid Base64 for the bytes 0xff 0xfe, which aren't UTF-8.
    assert_eq!(base64_decode_to_string("//4="), None);
}
