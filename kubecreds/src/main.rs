//! Convert Kubernetes secrets into CI credentials.

use kubecreds_common::{prelude::*, quick_main, tracing_support::initialize_tracing};
use structopt::StructOpt;

mod cmd;

/// Command-line options, parsed using `structopt`.
#[derive(Debug, StructOpt)]
#[structopt(about = "Convert Kubernetes secrets into CI credentials.")]
enum Opt {
    /// Convert secrets stored in local YAML files.
    #[structopt(name = "convert")]
    Convert {
        /// YAML files containing one or more secrets each.
        #[structopt(parse(from_os_str), required = true)]
        paths: Vec<PathBuf>,
    },

    /// Convert labeled secrets fetched from the cluster using `kubectl`.
    #[structopt(name = "cluster")]
    Cluster {
        /// Namespace to search. Defaults to the current context's namespace.
        #[structopt(long = "namespace", short = "n")]
        namespace: Option<String>,
    },

    /// List the credential types we know how to convert.
    #[structopt(name = "types")]
    Types,
}

quick_main!(run);

fn run() -> Result<()> {
    initialize_tracing();
    let opt = Opt::from_args();
    debug!("Args: {:?}", opt);

    let registry = ConverterRegistry::with_default_converters();
    match opt {
        Opt::Convert { ref paths } => cmd::convert::run(&registry, paths),
        Opt::Cluster { ref namespace } => {
            cmd::cluster::run(&registry, namespace.as_deref())
        }
        Opt::Types => cmd::types::run(&registry),
    }
}
