//! kube-lineage library
//!
//! Resolves the ownership lineage of a Kubernetes object: every object that
//! transitively depends on it and every object that transitively owns it.
//! It can be used both as a binary and as a library for testing.

pub mod accessor;
pub mod cli;
pub mod cluster;
pub mod config;
pub mod error;
pub mod lineage;
pub mod models;
pub mod registry;
pub mod render;

// Re-export commonly used types for convenience
pub use accessor::{ManifestAccessor, ResourceAccessor};
pub use error::{LineageError, Result};
pub use lineage::{
    Direction, Lineage, LineageEntry, LineageNode, TraceOptions, TraceOutcome, trace_lineage,
};
pub use models::{ObjectIdentity, ObjectKey, ObjectRecord, OwnerReference};
pub use registry::{KindLister, KindRegistry, KindSpec};
pub use render::{OutputFormat, render, render_tree};
