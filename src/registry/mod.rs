//! Kind registry
//!
//! Maps a kind name to the lister for that kind. The registry is the only
//! place that knows which kinds exist: resolvers iterate it for dependent
//! scans and resolve through it for owner hops, so supporting a new kind is a
//! single `register` call.

mod builtin;

use std::sync::Arc;

use async_trait::async_trait;

use crate::accessor::ResourceAccessor;
use crate::error::{LineageError, Result};
use crate::models::ObjectRecord;

pub use builtin::{BUILTIN_KINDS, BuiltinKind, KindSpec, kind_specs};

/// Lists the objects of one kind within a namespace
#[async_trait]
pub trait KindLister: Send + Sync {
    /// List objects in `scope`, optionally only the one named `name`
    async fn list(&self, scope: &str, name: Option<&str>) -> Result<Vec<ObjectRecord>>;
}

/// Lister backed by a [`ResourceAccessor`]
pub struct AccessorLister {
    accessor: Arc<dyn ResourceAccessor>,
    spec: KindSpec,
}

impl AccessorLister {
    pub fn new(accessor: Arc<dyn ResourceAccessor>, spec: KindSpec) -> Self {
        Self { accessor, spec }
    }
}

#[async_trait]
impl KindLister for AccessorLister {
    async fn list(&self, scope: &str, name: Option<&str>) -> Result<Vec<ObjectRecord>> {
        self.accessor.list_objects(&self.spec, scope, name).await
    }
}

/// A registered kind
pub struct KindEntry {
    kind: String,
    aliases: Vec<String>,
    lister: Arc<dyn KindLister>,
}

impl KindEntry {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn lister(&self) -> &Arc<dyn KindLister> {
        &self.lister
    }

    fn matches(&self, name: &str) -> bool {
        self.kind.eq_ignore_ascii_case(name)
            || self
                .aliases
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

/// Registry of listable kinds, in scan order
#[derive(Default)]
pub struct KindRegistry {
    entries: Vec<KindEntry>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every spec, each listed through `accessor`
    pub fn from_specs(specs: &[KindSpec], accessor: Arc<dyn ResourceAccessor>) -> Self {
        let mut registry = Self::new();
        for spec in specs {
            let lister = Arc::new(AccessorLister::new(accessor.clone(), spec.clone()));
            registry.register_with_aliases(&spec.kind, spec.aliases.clone(), lister);
        }
        registry
    }

    /// Add or replace the lister for `kind`
    pub fn register(&mut self, kind: &str, lister: Arc<dyn KindLister>) {
        self.register_with_aliases(kind, Vec::new(), lister);
    }

    /// Add or replace the lister for `kind`, reachable also through `aliases`
    ///
    /// Replacing keeps the kind's original scan position.
    pub fn register_with_aliases(
        &mut self,
        kind: &str,
        aliases: Vec<String>,
        lister: Arc<dyn KindLister>,
    ) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.kind == kind) {
            tracing::debug!("Replacing lister for kind {}", kind);
            entry.lister = lister;
            if !aliases.is_empty() {
                entry.aliases = aliases;
            }
            return;
        }

        self.entries.push(KindEntry {
            kind: kind.to_string(),
            aliases,
            lister,
        });
    }

    /// Find the entry for a kind name or alias
    ///
    /// An exact kind match wins over case-insensitive and alias matches.
    pub fn resolve(&self, kind: &str) -> Result<&KindEntry> {
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .or_else(|| self.entries.iter().find(|e| e.matches(kind)))
            .ok_or_else(|| LineageError::UnknownKind(kind.to_string()))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.resolve(kind).is_ok()
    }

    /// Entries in scan order
    pub fn entries(&self) -> &[KindEntry] {
        &self.entries
    }

    pub fn kinds(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.kind.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}
