//! Shared fixtures for lineage tests
//!
//! Builds clusters in memory through `ManifestAccessor` so the traversal can be
//! exercised without a Kubernetes API server.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use kube_lineage::registry::kind_specs;
use kube_lineage::{
    KindLister, KindRegistry, Lineage, LineageError, ManifestAccessor, ObjectIdentity,
    ObjectRecord, OwnerReference, TraceOptions, render_tree,
};
use tokio_util::sync::CancellationToken;

pub const NAMESPACE: &str = "default";

pub fn object(kind: &str, name: &str) -> ObjectRecord {
    ObjectRecord::new(ObjectIdentity::new(kind, name))
}

pub fn owned(kind: &str, name: &str, owners: &[(&str, &str)]) -> ObjectRecord {
    owners.iter().fold(object(kind, name), |record, (k, n)| {
        record.owned_by(OwnerReference::new(*k, *n).controller(true))
    })
}

/// Accessor holding `records` in the default namespace
pub fn cluster(records: Vec<ObjectRecord>) -> ManifestAccessor {
    records
        .into_iter()
        .fold(ManifestAccessor::new(), |accessor, record| {
            accessor.with_object(NAMESPACE, record)
        })
}

/// Registry of the built-in kinds backed by `accessor`
pub fn registry(accessor: ManifestAccessor) -> KindRegistry {
    KindRegistry::from_specs(&kind_specs(&[]), Arc::new(accessor))
}

pub async fn trace(
    registry: &KindRegistry,
    kind: &str,
    name: &str,
) -> Result<Lineage, LineageError> {
    kube_lineage::trace_lineage(
        registry,
        kind,
        name,
        TraceOptions::new(NAMESPACE),
        CancellationToken::new(),
    )
    .await
}

/// Rendered tree without the trailing newline
pub fn tree(lineage: &Lineage) -> String {
    render_tree(lineage).trim_end().to_string()
}

/// (depth, "Kind/name") pairs of resolved objects, in render order
pub fn placed(lineage: &Lineage) -> Vec<(usize, String)> {
    lineage
        .entries
        .iter()
        .filter_map(|entry| match entry {
            kube_lineage::LineageEntry::Object(node) => {
                Some((node.depth, node.identity.to_string()))
            }
            kube_lineage::LineageEntry::Unresolved(_) => None,
        })
        .collect()
}

/// Lister that always fails and counts how often it was called
pub struct FailingLister {
    error: LineageError,
    calls: AtomicUsize,
}

impl FailingLister {
    pub fn new(error: LineageError) -> Arc<Self> {
        Arc::new(Self {
            error,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KindLister for FailingLister {
    async fn list(
        &self,
        _scope: &str,
        _name: Option<&str>,
    ) -> kube_lineage::Result<Vec<ObjectRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

/// Lister that never answers, for cancellation tests
pub struct HangingLister;

#[async_trait]
impl KindLister for HangingLister {
    async fn list(
        &self,
        _scope: &str,
        _name: Option<&str>,
    ) -> kube_lineage::Result<Vec<ObjectRecord>> {
        std::future::pending().await
    }
}

/// Lister whose full listings fail and whose named lookups never answer
pub struct BrokenThenHangingLister {
    pub error: LineageError,
}

#[async_trait]
impl KindLister for BrokenThenHangingLister {
    async fn list(
        &self,
        _scope: &str,
        name: Option<&str>,
    ) -> kube_lineage::Result<Vec<ObjectRecord>> {
        match name {
            None => Err(self.error.clone()),
            Some(_) => std::future::pending().await,
        }
    }
}
