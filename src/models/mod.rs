//! Object model
//!
//! Snapshots of listed objects and their owner references. Nothing here is
//! mutated after it is read from an accessor.

mod object;

pub use object::{ObjectIdentity, ObjectKey, ObjectRecord, OwnerReference};
