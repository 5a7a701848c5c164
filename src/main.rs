//! kube-lineage - show what depends on a Kubernetes object and what owns it
//!
//! Walks owner references in both directions from a target object and prints
//! the result as an indented lineage tree.

use anyhow::{Context, Result};
use clap::Parser;

use kube_lineage::cli::{self, Args};
use kube_lineage::config::ConfigLoader;

/// Exit status for a traversal cancelled before completion
const EXIT_PARTIAL: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging if debug flag is set
    let log_file = cli::init_logging(args.debug);
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    let config = ConfigLoader::load().context("Failed to load configuration")?;
    tracing::debug!(
        "Configuration loaded: defaultNamespace={}, output={:?}",
        config.default_namespace,
        config.output
    );

    if args.list_kinds {
        cli::list_kinds(&config);
        return Ok(());
    }

    let lineage = cli::run_lineage(&args, &config).await?;
    if !lineage.is_complete() {
        eprintln!("Traversal cancelled before completion; the lineage above is partial");
        std::process::exit(EXIT_PARTIAL);
    }

    Ok(())
}
