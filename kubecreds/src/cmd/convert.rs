//! The `convert` subcommand.

use std::fs;

use kubecreds_common::prelude::*;

use super::print_credentials;

/// Load secrets from each YAML file in `paths`.
pub fn load_secrets(paths: &[PathBuf]) -> Result<Vec<Secret>> {
    let mut secrets = vec![];
    for path in paths {
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("could not read {}", path.display()))?;
        let loaded = Secret::from_yaml_documents(&yaml)
            .with_context(|| format!("could not parse {}", path.display()))?;
        debug!("loaded {} secrets from {}", loaded.len(), path.display());
        secrets.extend(loaded);
    }
    Ok(secrets)
}

/// The `convert` subcommand.
pub fn run(registry: &ConverterRegistry, paths: &[PathBuf]) -> Result<()> {
    let secrets = load_secrets(paths)?;
    let credentials = registry.convert_all(&secrets);
    info!(
        "converted {} of {} secrets",
        credentials.len(),
        secrets.len()
    );
    print_credentials(&credentials)
}

#[test]
fn load_and_convert_secrets_from_files() {
    use std::env;

    let dir = env::temp_dir().join(format!("kubecreds-test-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("secrets.yaml");
    fs::write(
        &path,
        r#"
apiVersion: v1
kind: Secret
metadata:
  name: token
  labels:
    jenkins.io/credentials-type: bitbucketToken
data:
  token: c2VjcmV0LWFiYw==
---
apiVersion: v1
kind: Secret
metadata:
  name: broken
  labels:
    jenkins.io/credentials-type: secretText
"#,
    )
    .unwrap();

    let secrets = load_secrets(&[path]).expect("could not load secrets");
    assert_eq!(secrets.len(), 2);
    let registry = ConverterRegistry::with_default_converters();
    let credentials = registry.convert_all(&secrets);
    assert_eq!(credentials.len(), 1);
    assert_eq!(credentials[0].id(), "token");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_files_are_reported() {
    let err = load_secrets(&[PathBuf::from("/nonexistent/secrets.yaml")]).unwrap_err();
    assert!(err.to_string().contains("could not read /nonexistent/secrets.yaml"));
}
