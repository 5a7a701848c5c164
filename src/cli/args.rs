//! Command line arguments

use clap::Parser;
use std::path::PathBuf;

use crate::render::OutputFormat;

/// Show the ownership lineage of a Kubernetes object: everything that depends
/// on it, then everything that owns it
#[derive(Parser, Debug)]
#[command(name = "kube-lineage")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Kind of the target object (e.g. Deployment, rs, po)
    #[arg(required_unless_present = "list_kinds")]
    pub kind: Option<String>,

    /// Name of the target object
    #[arg(required_unless_present = "list_kinds")]
    pub name: Option<String>,

    /// Namespace to trace in (defaults to the configured defaultNamespace)
    #[arg(long, short = 'n')]
    pub namespace: Option<String>,

    /// Output format
    #[arg(long, short = 'o', value_enum)]
    pub output: Option<OutputFormat>,

    /// Kubeconfig context to use
    #[arg(long)]
    pub context: Option<String>,

    /// Read objects from a manifest file instead of a cluster
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Cancel the traversal after this many seconds (0 disables)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// List the kinds that are scanned and exit
    #[arg(long)]
    pub list_kinds: bool,

    /// Enable debug logging
    #[arg(long, short = 'd')]
    pub debug: bool,
}
