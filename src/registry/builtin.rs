//! Built-in kind table
//!
//! The workload kinds that carry owner references in a stock cluster. To add
//! another kind permanently, add an entry to `BUILTIN_KINDS`; for a one-off
//! custom resource, list it under `kinds` in the config file instead.
//!
//! The table order is the dependent scan order.

use serde::{Deserialize, Serialize};

/// Static registry entry for a built-in kind
pub struct BuiltinKind {
    pub kind: &'static str,
    pub group: &'static str,
    pub version: &'static str,
    pub plural: &'static str,
    pub aliases: &'static [&'static str],
}

pub const BUILTIN_KINDS: &[BuiltinKind] = &[
    // Core
    BuiltinKind {
        kind: "Pod",
        group: "",
        version: "v1",
        plural: "pods",
        aliases: &["pod", "pods", "po"],
    },
    // Apps
    BuiltinKind {
        kind: "ReplicaSet",
        group: "apps",
        version: "v1",
        plural: "replicasets",
        aliases: &["replicaset", "replicasets", "rs"],
    },
    BuiltinKind {
        kind: "Deployment",
        group: "apps",
        version: "v1",
        plural: "deployments",
        aliases: &["deployment", "deployments", "deploy"],
    },
    BuiltinKind {
        kind: "StatefulSet",
        group: "apps",
        version: "v1",
        plural: "statefulsets",
        aliases: &["statefulset", "statefulsets", "sts"],
    },
    BuiltinKind {
        kind: "DaemonSet",
        group: "apps",
        version: "v1",
        plural: "daemonsets",
        aliases: &["daemonset", "daemonsets", "ds"],
    },
    BuiltinKind {
        kind: "ControllerRevision",
        group: "apps",
        version: "v1",
        plural: "controllerrevisions",
        aliases: &["controllerrevision", "controllerrevisions"],
    },
    // Batch
    BuiltinKind {
        kind: "Job",
        group: "batch",
        version: "v1",
        plural: "jobs",
        aliases: &["job", "jobs"],
    },
    BuiltinKind {
        kind: "CronJob",
        group: "batch",
        version: "v1",
        plural: "cronjobs",
        aliases: &["cronjob", "cronjobs", "cj"],
    },
];

/// Everything needed to list one kind through the API server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindSpec {
    pub kind: String,
    /// API group, empty for the core group
    #[serde(default)]
    pub group: String,
    pub version: String,
    pub plural: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// False for cluster-scoped kinds such as `Node`, which are listed
    /// across the whole cluster whatever the traversal namespace
    #[serde(default = "default_namespaced")]
    pub namespaced: bool,
}

fn default_namespaced() -> bool {
    true
}

impl KindSpec {
    /// `apiVersion` string as it appears on objects of this kind
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl From<&BuiltinKind> for KindSpec {
    fn from(builtin: &BuiltinKind) -> Self {
        Self {
            kind: builtin.kind.to_string(),
            group: builtin.group.to_string(),
            version: builtin.version.to_string(),
            plural: builtin.plural.to_string(),
            aliases: builtin.aliases.iter().map(|a| a.to_string()).collect(),
            namespaced: true,
        }
    }
}

/// Built-in kinds followed by `extra`
///
/// An extra that redefines a built-in replaces it in its scan position.
pub fn kind_specs(extra: &[KindSpec]) -> Vec<KindSpec> {
    let mut specs: Vec<KindSpec> = BUILTIN_KINDS.iter().map(KindSpec::from).collect();
    for spec in extra {
        if let Some(existing) = specs.iter_mut().find(|s| s.kind == spec.kind) {
            tracing::debug!("Config overrides built-in kind {}", spec.kind);
            *existing = spec.clone();
        } else {
            specs.push(spec.clone());
        }
    }
    specs
}
