//! Code shared between the `kubecreds` tools: turning Kubernetes secrets into
//! typed CI credentials.

#![warn(missing_docs)]

pub use anyhow;
pub use serde_json;
pub use serde_yaml;

pub mod convert;
pub mod credential;
pub mod errors;
pub mod kubernetes;
pub mod registry;
pub mod secret;
pub mod tracing_support;

/// Common imports used by many modules.
pub mod prelude {
    pub use anyhow::{format_err, Context};
    pub use serde::{Deserialize, Serialize};
    pub use std::{
        collections::BTreeMap,
        fmt,
        fs::File,
        io::Write,
        path::{Path, PathBuf},
    };
    pub use tracing::{debug, error, info, instrument, trace, warn};

    pub use super::convert::{ConversionError, SecretToCredentialConverter};
    pub use super::credential::{Credential, CredentialKind, Scope};
    pub use super::kubernetes::Secret;
    pub use super::registry::ConverterRegistry;
    pub use super::secret::SecretText;
    pub use super::{Error, Result};
}

/// Error type for this crate's functions.
pub use anyhow::Error;

/// Result type for this crate's functions.
pub type Result<T, E = Error> = std::result::Result<T, E>;
