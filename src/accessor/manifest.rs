//! Offline accessor over a manifest snapshot
//!
//! Accepts what `kubectl get -o yaml` produces: a `List` document, a
//! multi-document YAML stream, or the JSON equivalents. Objects without a
//! namespace, and every object of a cluster-scoped kind, are visible from
//! every namespace.

use std::path::Path;

use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Deserialize;

use super::ResourceAccessor;
use crate::error::{LineageError, Result};
use crate::models::ObjectRecord;
use crate::registry::KindSpec;

#[derive(Debug, Deserialize)]
struct ManifestObject {
    kind: Option<String>,
    #[serde(default)]
    metadata: ObjectMeta,
}

#[derive(Debug, Clone)]
struct StoredObject {
    namespace: Option<String>,
    record: ObjectRecord,
}

/// In-memory accessor serving a fixed set of objects
#[derive(Debug, Clone, Default)]
pub struct ManifestAccessor {
    objects: Vec<StoredObject>,
}

impl ManifestAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LineageError::InvalidManifest(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse a YAML or JSON manifest
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let mut accessor = Self::new();

        for document in serde_yaml::Deserializer::from_str(contents) {
            let value = serde_yaml::Value::deserialize(document)
                .map_err(|e| LineageError::InvalidManifest(e.to_string()))?;
            if value.is_null() {
                continue;
            }

            for item in expand_list(value) {
                let object: ManifestObject = serde_yaml::from_value(item)
                    .map_err(|e| LineageError::InvalidManifest(e.to_string()))?;
                accessor.add_manifest_object(object);
            }
        }

        tracing::debug!("Loaded {} objects from manifest", accessor.len());
        Ok(accessor)
    }

    /// Add an object to the snapshot
    pub fn insert(&mut self, namespace: Option<&str>, record: ObjectRecord) {
        self.objects.push(StoredObject {
            namespace: namespace.map(str::to_string),
            record,
        });
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_object(mut self, namespace: &str, record: ObjectRecord) -> Self {
        self.insert(Some(namespace), record);
        self
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn add_manifest_object(&mut self, object: ManifestObject) {
        let Some(kind) = object.kind.filter(|k| !k.is_empty()) else {
            tracing::warn!(
                "Skipping manifest object {:?} without kind",
                object.metadata.name
            );
            return;
        };
        match ObjectRecord::from_meta(&kind, &object.metadata) {
            Some(record) => self.insert(object.metadata.namespace.as_deref(), record),
            None => tracing::warn!("Skipping manifest {} without metadata.name", kind),
        }
    }
}

/// Flatten `kind: List` documents into their items
fn expand_list(value: serde_yaml::Value) -> Vec<serde_yaml::Value> {
    let is_list = value
        .get("kind")
        .and_then(|k| k.as_str())
        .is_some_and(|k| k.ends_with("List"));

    if is_list {
        if let Some(items) = value.get("items").and_then(|i| i.as_sequence()) {
            return items.clone();
        }
    }
    vec![value]
}

#[async_trait]
impl ResourceAccessor for ManifestAccessor {
    async fn list_objects(
        &self,
        kind: &KindSpec,
        scope: &str,
        name: Option<&str>,
    ) -> Result<Vec<ObjectRecord>> {
        Ok(self
            .objects
            .iter()
            .filter(|o| o.record.identity.kind == kind.kind)
            .filter(|o| {
                !kind.namespaced || o.namespace.as_deref().is_none_or(|ns| ns == scope)
            })
            .filter(|o| name.is_none_or(|n| o.record.identity.name == n))
            .map(|o| o.record.clone())
            .collect())
    }
}
