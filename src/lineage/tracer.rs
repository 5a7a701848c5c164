//! Traversal context shared by the dependent and ancestor walks

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

use crate::error::{LineageError, Result};
use crate::lineage::models::{Direction, Lineage, LineageEntry, TraceOutcome};
use crate::models::{ObjectKey, ObjectRecord};
use crate::registry::{KindEntry, KindRegistry};

/// Default bound on concurrent kind listings
pub const DEFAULT_MAX_CONCURRENT_LISTINGS: usize = 8;

/// Per-invocation traversal settings
#[derive(Debug, Clone)]
pub struct TraceOptions {
    /// Namespace every listing is performed in
    pub scope: String,
    pub max_concurrent_listings: usize,
}

impl TraceOptions {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            max_concurrent_listings: DEFAULT_MAX_CONCURRENT_LISTINGS,
        }
    }
}

type Listing = Result<Arc<Vec<ObjectRecord>>>;

/// One lineage traversal
///
/// Holds the listings made so far, so each kind is listed at most once per
/// traversal. Nothing outlives the traversal.
pub struct LineageTracer<'r> {
    pub(super) registry: &'r KindRegistry,
    pub(super) options: TraceOptions,
    cancel: CancellationToken,
    snapshot: Mutex<HashMap<String, Listing>>,
    reported_failures: Mutex<HashSet<String>>,
    truncated: AtomicBool,
}

impl<'r> LineageTracer<'r> {
    pub fn new(
        registry: &'r KindRegistry,
        options: TraceOptions,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            registry,
            options,
            cancel,
            snapshot: Mutex::new(HashMap::new()),
            reported_failures: Mutex::new(HashSet::new()),
            truncated: AtomicBool::new(false),
        }
    }

    /// Resolve the lineage of `kind`/`name`
    ///
    /// Fails only when the root object cannot be resolved. Dependents are
    /// walked first; the ancestor walk continues from the depth they reached.
    /// Cancellation is never an error: whatever was gathered is returned as
    /// a partial lineage.
    pub async fn trace(&self, kind: &str, name: &str) -> Result<Lineage> {
        let entry = self.registry.resolve(kind)?;
        let root = match self.lookup(entry, name).await {
            Ok(Some(root)) => root,
            Ok(None) => {
                return Err(LineageError::NotFound {
                    kind: entry.kind().to_string(),
                    name: name.to_string(),
                    scope: self.options.scope.clone(),
                });
            }
            Err(LineageError::Cancelled) => return Ok(self.finish(Vec::new())),
            Err(e) => return Err(e),
        };

        tracing::debug!(
            "Tracing {} in namespace {}",
            root.identity,
            self.options.scope
        );

        let mut entries = Vec::new();
        let path = HashSet::from([root.identity.key()]);
        let walked = self
            .find_dependents(&root.identity, 0, &path, &mut entries)
            .await;
        let depth = match walked {
            Ok(depth) => depth,
            Err(LineageError::Cancelled) => {
                // The root still closes the partial tree, above every dependent found
                let depth = entries.iter().map(|e| e.depth() + 1).max().unwrap_or(0);
                entries.push(LineageEntry::object(root.identity, depth, Direction::Target));
                return Ok(self.finish(entries));
            }
            Err(e) => return Err(e),
        };

        entries.extend(self.find_ancestors(root, depth).await);
        Ok(self.finish(entries))
    }

    fn finish(&self, entries: Vec<LineageEntry>) -> Lineage {
        let outcome = if self.truncated.load(Ordering::SeqCst) {
            TraceOutcome::Partial
        } else {
            TraceOutcome::Complete
        };
        Lineage { entries, outcome }
    }

    /// Stop point between kind scans and owner hops
    pub(super) fn checkpoint(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            self.truncated.store(true, Ordering::SeqCst);
            return Err(LineageError::Cancelled);
        }
        Ok(())
    }

    /// Run a listing, abandoning it if the traversal is cancelled
    async fn guarded<F>(&self, listing: F) -> Result<Vec<ObjectRecord>>
    where
        F: Future<Output = Result<Vec<ObjectRecord>>>,
    {
        tokio::select! {
            _ = self.cancel.cancelled() => {
                self.truncated.store(true, Ordering::SeqCst);
                Err(LineageError::Cancelled)
            }
            result = listing => result,
        }
    }

    /// Full listing of one kind, from the snapshot when already listed
    pub(super) async fn list_kind(&self, entry: &KindEntry) -> Listing {
        if let Some(listing) = self.cached(entry.kind()) {
            return listing;
        }

        tracing::debug!(
            "Listing {} in namespace {}",
            entry.kind(),
            self.options.scope
        );
        let listing = self
            .guarded(entry.lister().list(&self.options.scope, None))
            .await
            .map(Arc::new);

        if !matches!(listing, Err(LineageError::Cancelled)) {
            self.snapshot
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(entry.kind().to_string(), listing.clone());
        }
        listing
    }

    /// Look up one object by name
    pub(super) async fn lookup(
        &self,
        entry: &KindEntry,
        name: &str,
    ) -> Result<Option<ObjectRecord>> {
        if let Some(Ok(records)) = self.cached(entry.kind()) {
            return Ok(records.iter().find(|r| r.identity.name == name).cloned());
        }

        let records = self
            .guarded(entry.lister().list(&self.options.scope, Some(name)))
            .await?;
        // Listers may ignore the name filter
        Ok(records.into_iter().find(|r| r.identity.name == name))
    }

    fn cached(&self, kind: &str) -> Option<Listing> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(kind)
            .cloned()
    }

    /// True the first time a failed listing of `kind` is reported
    pub(super) fn first_failure(&self, kind: &str) -> bool {
        self.reported_failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind.to_string())
    }
}

/// Keys already on the current walk path
pub(super) type PathSet = HashSet<ObjectKey>;

/// Resolve the lineage of `kind`/`name` in `options.scope`
pub async fn trace_lineage(
    registry: &KindRegistry,
    kind: &str,
    name: &str,
    options: TraceOptions,
    cancel: CancellationToken,
) -> Result<Lineage> {
    LineageTracer::new(registry, options, cancel)
        .trace(kind, name)
        .await
}
