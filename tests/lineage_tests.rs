//! End-to-end lineage tests
//!
//! Run whole traversals against in-memory clusters and check the rendered
//! trees, the fatal root errors and cancellation.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use kube_lineage::render::PARTIAL_MARKER;
use kube_lineage::{
    Direction, LineageError, ManifestAccessor, OutputFormat, TraceOptions, TraceOutcome, render,
    render_tree, trace_lineage,
};
use tokio_util::sync::CancellationToken;

fn workloads() -> ManifestAccessor {
    cluster(vec![
        object("Deployment", "web"),
        owned("ReplicaSet", "web-abc123", &[("Deployment", "web")]),
        owned("Pod", "web-abc123-xyz", &[("ReplicaSet", "web-abc123")]),
        owned("Pod", "web-abc123-qrs", &[("ReplicaSet", "web-abc123")]),
        object("CronJob", "backup"),
        owned("Job", "backup-2891", &[("CronJob", "backup")]),
        owned("Pod", "backup-2891-k2", &[("Job", "backup-2891")]),
        object("Pod", "orphan"),
    ])
}

#[tokio::test]
async fn test_deployment_lineage_tree() {
    let registry = registry(workloads());

    let lineage = trace(&registry, "Deployment", "web").await.unwrap();

    insta::assert_snapshot!(tree(&lineage), @r"
- Pod/web-abc123-xyz
- Pod/web-abc123-qrs
  - ReplicaSet/web-abc123
    - Deployment/web
");
}

#[tokio::test]
async fn test_replicaset_lineage_has_both_directions() {
    let registry = registry(workloads());

    let lineage = trace(&registry, "ReplicaSet", "web-abc123").await.unwrap();

    insta::assert_snapshot!(tree(&lineage), @r"
- Pod/web-abc123-xyz
- Pod/web-abc123-qrs
  - ReplicaSet/web-abc123
    - Deployment/web
");
    assert_eq!(lineage.nodes(Direction::Dependent).count(), 2);
    assert_eq!(lineage.nodes(Direction::Ancestor).count(), 1);
}

#[tokio::test]
async fn test_orphan_renders_single_line() {
    let registry = registry(workloads());

    let lineage = trace(&registry, "Pod", "orphan").await.unwrap();

    assert_eq!(render(&lineage, OutputFormat::Tree).unwrap(), "- Pod/orphan\n");
}

#[tokio::test]
async fn test_ownership_is_symmetric() {
    let records = vec![
        object("CronJob", "backup"),
        owned("Job", "backup-2891", &[("CronJob", "backup")]),
        owned("Pod", "backup-2891-k2", &[("Job", "backup-2891")]),
        object("DaemonSet", "agent"),
        owned("Pod", "agent-x", &[("DaemonSet", "agent")]),
    ];
    let registry = registry(cluster(records.clone()));

    for record in &records {
        for owner in &record.owner_references {
            let down = trace(&registry, &owner.kind, &owner.name).await.unwrap();
            assert!(
                down.nodes(Direction::Dependent)
                    .any(|n| n.identity == record.identity),
                "{} should be a dependent of {}/{}",
                record.identity,
                owner.kind,
                owner.name
            );

            let up = trace(&registry, &record.identity.kind, &record.identity.name)
                .await
                .unwrap();
            assert!(
                up.nodes(Direction::Ancestor)
                    .any(|n| n.identity.kind == owner.kind && n.identity.name == owner.name),
                "{}/{} should be an ancestor of {}",
                owner.kind,
                owner.name,
                record.identity
            );
        }
    }
}

#[tokio::test]
async fn test_kind_aliases_resolve_to_canonical_kind() {
    let registry = registry(workloads());

    let lineage = trace(&registry, "deploy", "web").await.unwrap();

    let target: Vec<_> = lineage.nodes(Direction::Target).collect();
    assert_eq!(target[0].identity.kind, "Deployment");
}

#[tokio::test]
async fn test_unknown_root_kind_is_fatal() {
    let registry = registry(workloads());

    let err = trace(&registry, "Widget", "w").await.unwrap_err();

    assert_eq!(err, LineageError::UnknownKind("Widget".to_string()));
}

#[tokio::test]
async fn test_missing_root_is_fatal() {
    let registry = registry(workloads());

    let err = trace(&registry, "Deployment", "api").await.unwrap_err();

    assert_eq!(
        err,
        LineageError::NotFound {
            kind: "Deployment".to_string(),
            name: "api".to_string(),
            scope: NAMESPACE.to_string(),
        }
    );
}

#[tokio::test]
async fn test_other_namespaces_are_invisible() {
    let accessor = ManifestAccessor::new()
        .with_object("default", object("ReplicaSet", "web"))
        .with_object("staging", owned("Pod", "web-1", &[("ReplicaSet", "web")]));
    let registry = registry(accessor);

    let lineage = trace(&registry, "ReplicaSet", "web").await.unwrap();

    assert_eq!(placed(&lineage), vec![(0, "ReplicaSet/web".to_string())]);
}

/// Token cancelled shortly after the traversal starts
fn cancel_soon() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });
    cancel
}

#[tokio::test]
async fn test_cancelled_dependent_scan_keeps_the_root() {
    let mut registry = registry(workloads());
    registry.register("CronJob", Arc::new(HangingLister));

    let lineage = trace_lineage(
        &registry,
        "Deployment",
        "web",
        TraceOptions::new(NAMESPACE),
        cancel_soon(),
    )
    .await
    .unwrap();

    assert_eq!(lineage.outcome, TraceOutcome::Partial);
    insta::assert_snapshot!(tree(&lineage), @r"
- Deployment/web
# partial result: traversal cancelled
");
}

#[tokio::test]
async fn test_cancelled_owner_hop_keeps_gathered_entries() {
    let mut registry = registry(cluster(vec![
        object("ReplicaSet", "a"),
        object("ReplicaSet", "b"),
        owned("Pod", "p", &[("ReplicaSet", "a"), ("ReplicaSet", "b")]),
        owned("Pod", "child", &[("Pod", "p")]),
    ]));
    registry.register(
        "ReplicaSet",
        Arc::new(BrokenThenHangingLister {
            error: LineageError::Unavailable {
                kind: "ReplicaSet".to_string(),
                message: "connection reset".to_string(),
            },
        }),
    );

    let lineage = trace_lineage(
        &registry,
        "Pod",
        "p",
        TraceOptions::new(NAMESPACE),
        cancel_soon(),
    )
    .await
    .unwrap();

    assert_eq!(lineage.outcome, TraceOutcome::Partial);
    assert_eq!(lineage.nodes(Direction::Ancestor).count(), 0);
    let rendered = render(&lineage, OutputFormat::Tree).unwrap();
    assert!(rendered.trim_end().ends_with(PARTIAL_MARKER));
    insta::assert_snapshot!(tree(&lineage), @r"
- ReplicaSet/* [unresolved: Listing ReplicaSet unavailable: connection reset]
- Pod/child
  - Pod/p
# partial result: traversal cancelled
");
}

#[tokio::test]
async fn test_cancelled_root_lookup_is_partial_not_fatal() {
    let mut registry = registry(workloads());
    registry.register("Deployment", Arc::new(HangingLister));

    let lineage = trace_lineage(
        &registry,
        "Deployment",
        "web",
        TraceOptions::new(NAMESPACE),
        cancel_soon(),
    )
    .await
    .unwrap();

    assert_eq!(lineage.outcome, TraceOutcome::Partial);
    assert!(lineage.entries.is_empty());
    assert_eq!(render_tree(&lineage), format!("{}\n", PARTIAL_MARKER));
}

#[tokio::test]
async fn test_sequential_listing_gives_same_result() {
    let registry = registry(workloads());
    let options = TraceOptions {
        scope: NAMESPACE.to_string(),
        max_concurrent_listings: 1,
    };

    let sequential =
        trace_lineage(&registry, "CronJob", "backup", options, CancellationToken::new())
            .await
            .unwrap();
    let concurrent = trace(&registry, "CronJob", "backup").await.unwrap();

    assert_eq!(sequential, concurrent);
    insta::assert_snapshot!(tree(&concurrent), @r"
- Pod/backup-2891-k2
  - Job/backup-2891
    - CronJob/backup
");
}
