//! The `types` subcommand.

use kubecreds_common::prelude::*;

/// The `types` subcommand.
pub fn run(registry: &ConverterRegistry) -> Result<()> {
    for type_tag in registry.type_tags() {
        println!("{}", type_tag);
    }
    Ok(())
}
