//! Ownership lineage resolution
//!
//! Resolves the objects that depend on a target (by reverse-scanning the owner
//! references of every registered kind) and the objects that own it (by
//! following its owner references upward).
//!
//! The result is a flat stream of entries in render order: dependents in
//! post-order, then the target and its owners in pre-order, with the depth
//! counter carried over from the downward walk into the upward one.

mod ancestors;
mod dependents;
mod models;
mod tracer;

pub use models::{
    Direction, Lineage, LineageEntry, LineageNode, TraceOutcome, UnresolvedBranch,
};
pub use tracer::{DEFAULT_MAX_CONCURRENT_LISTINGS, LineageTracer, TraceOptions, trace_lineage};
