//! Downward walk: objects whose owner references resolve back to the target

use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, stream};

use super::tracer::{LineageTracer, PathSet};
use crate::error::{LineageError, Result};
use crate::lineage::models::{Direction, LineageEntry};
use crate::models::{ObjectIdentity, ObjectRecord};

impl LineageTracer<'_> {
    /// Append the dependents of `target` to `out` and return the new depth
    ///
    /// Post-order: an object's own dependents are emitted before it. Depth
    /// advances by one after each kind that contributed at least one line,
    /// never per object. Only cancellation is returned as an error; listing
    /// failures become unresolved lines.
    pub(super) fn find_dependents<'a>(
        &'a self,
        target: &'a ObjectIdentity,
        depth: usize,
        path: &'a PathSet,
        out: &'a mut Vec<LineageEntry>,
    ) -> BoxFuture<'a, Result<usize>> {
        async move {
            let mut depth = depth;

            for (kind, listing) in self.scan_all_kinds().await? {
                self.checkpoint()?;

                let records = match listing {
                    Ok(records) => records,
                    Err(LineageError::Cancelled) => return Err(LineageError::Cancelled),
                    Err(error) => {
                        tracing::warn!("Skipping {} dependents of {}: {}", kind, target, error);
                        if self.first_failure(&kind) {
                            out.push(LineageEntry::unresolved(
                                kind,
                                None,
                                depth,
                                Direction::Dependent,
                                error,
                            ));
                        }
                        continue;
                    }
                };

                let dependents: Vec<&ObjectRecord> =
                    records.iter().filter(|r| r.is_owned_by(target)).collect();
                if dependents.is_empty() {
                    continue;
                }

                for record in dependents {
                    let key = record.identity.key();
                    if path.contains(&key) {
                        tracing::warn!("{} owns itself through {}", record.identity, target);
                        out.push(LineageEntry::unresolved(
                            key.kind.clone(),
                            Some(key.name.clone()),
                            depth,
                            Direction::Dependent,
                            LineageError::CyclicOwnership {
                                kind: key.kind,
                                name: key.name,
                            },
                        ));
                        continue;
                    }

                    let mut branch = path.clone();
                    branch.insert(key);
                    depth = self
                        .find_dependents(&record.identity, depth, &branch, out)
                        .await?;
                    out.push(LineageEntry::object(
                        record.identity.clone(),
                        depth,
                        Direction::Dependent,
                    ));
                }

                depth += 1;
            }

            Ok(depth)
        }
        .boxed()
    }

    /// List every registered kind, concurrently, in registration order
    async fn scan_all_kinds(
        &self,
    ) -> Result<Vec<(String, Result<std::sync::Arc<Vec<ObjectRecord>>>)>> {
        self.checkpoint()?;

        let limit = self.options.max_concurrent_listings.max(1);
        let pending: Vec<_> = self
            .registry
            .entries()
            .iter()
            .map(|entry| async move { (entry.kind().to_string(), self.list_kind(entry).await) })
            .collect();
        let listings = stream::iter(pending)
            .buffered(limit)
            .collect::<Vec<_>>()
            .await;

        Ok(listings)
    }
}
