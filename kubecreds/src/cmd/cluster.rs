//! The `cluster` subcommand.

use kubecreds_common::{kubernetes::kubectl_credential_secrets, prelude::*};

use super::print_credentials;

/// The `cluster` subcommand.
pub fn run(registry: &ConverterRegistry, namespace: Option<&str>) -> Result<()> {
    let secrets = kubectl_credential_secrets(namespace)
        .context("could not fetch secrets from the cluster")?;
    let credentials = registry.convert_all(&secrets);
    info!(
        "converted {} of {} secrets",
        credentials.len(),
        secrets.len()
    );
    print_credentials(&credentials)
}
