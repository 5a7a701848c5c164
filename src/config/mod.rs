//! Configuration for kube-lineage
//!
//! A single optional YAML file, overridable through environment variables and
//! then command line flags.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::Config;
