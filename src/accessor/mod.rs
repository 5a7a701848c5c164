//! Resource accessors
//!
//! An accessor lists the objects of one kind in a namespace. The live
//! implementation talks to the API server (`crate::cluster::KubeAccessor`);
//! `ManifestAccessor` serves a snapshot loaded from a file.

mod manifest;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ObjectRecord;
use crate::registry::KindSpec;

pub use manifest::ManifestAccessor;

/// Source of object listings
///
/// Implementations fail with `AccessDenied`, `Unavailable` or `Timeout`.
#[async_trait]
pub trait ResourceAccessor: Send + Sync {
    /// List objects of `kind` in `scope`, optionally only those named `name`
    async fn list_objects(
        &self,
        kind: &KindSpec,
        scope: &str,
        name: Option<&str>,
    ) -> Result<Vec<ObjectRecord>>;
}
