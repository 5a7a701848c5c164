//! Upward walk: follow owner references from the target to its roots

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};

use super::tracer::{LineageTracer, PathSet};
use crate::error::LineageError;
use crate::lineage::models::{Direction, LineageEntry};
use crate::models::{ObjectRecord, OwnerReference};

impl LineageTracer<'_> {
    /// Entries for `root` and everything it transitively belongs to
    ///
    /// Pre-order: the root at `depth`, then each owner subtree one level
    /// deeper, in reference declaration order.
    pub(super) async fn find_ancestors(
        &self,
        root: ObjectRecord,
        depth: usize,
    ) -> Vec<LineageEntry> {
        let path = PathSet::from([root.identity.key()]);
        self.walk_owners(root, depth, Direction::Target, path).await
    }

    fn walk_owners(
        &self,
        record: ObjectRecord,
        depth: usize,
        direction: Direction,
        path: PathSet,
    ) -> BoxFuture<'_, Vec<LineageEntry>> {
        async move {
            let mut entries = vec![LineageEntry::object(
                record.identity.clone(),
                depth,
                direction,
            )];

            // Co-owners are independent reads; each branch gets its own path copy
            let branches = record
                .owner_references
                .iter()
                .map(|owner| self.follow_owner(owner, depth + 1, path.clone()));
            for branch in join_all(branches).await {
                entries.extend(branch);
            }

            entries
        }
        .boxed()
    }

    fn follow_owner<'a>(
        &'a self,
        owner: &'a OwnerReference,
        depth: usize,
        mut path: PathSet,
    ) -> BoxFuture<'a, Vec<LineageEntry>> {
        async move {
            if self.checkpoint().is_err() {
                return Vec::new();
            }

            let unresolved = |error: LineageError| {
                vec![LineageEntry::unresolved(
                    owner.kind.clone(),
                    Some(owner.name.clone()),
                    depth,
                    Direction::Ancestor,
                    error,
                )]
            };

            if path.contains(&owner.key()) {
                tracing::warn!("Ownership cycle through {}/{}", owner.kind, owner.name);
                return unresolved(LineageError::CyclicOwnership {
                    kind: owner.kind.clone(),
                    name: owner.name.clone(),
                });
            }

            let entry = match self.registry.resolve(&owner.kind) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Cannot follow owner {}/{}: {}", owner.kind, owner.name, e);
                    return unresolved(e);
                }
            };

            let not_found = || LineageError::NotFound {
                kind: entry.kind().to_string(),
                name: owner.name.clone(),
                scope: self.options.scope.clone(),
            };

            let record = match self.lookup(entry, &owner.name).await {
                Ok(Some(record)) => record,
                Ok(None) => return unresolved(not_found()),
                Err(LineageError::Cancelled) => return Vec::new(),
                Err(e) => {
                    tracing::warn!("Failed to fetch owner {}/{}: {}", owner.kind, owner.name, e);
                    return unresolved(e);
                }
            };

            // Verify UID matches if provided
            if let (Some(expected), Some(actual)) =
                (owner.uid.as_deref(), record.identity.uid.as_deref())
            {
                if expected != actual {
                    tracing::warn!(
                        "Owner UID mismatch for {}/{}: expected {}, got {}",
                        owner.kind,
                        owner.name,
                        expected,
                        actual
                    );
                    return unresolved(not_found());
                }
            }

            path.insert(record.identity.key());
            path.insert(owner.key());
            self.walk_owners(record, depth, Direction::Ancestor, path)
                .await
        }
        .boxed()
    }
}
