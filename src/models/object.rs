//! Object identity and owner reference snapshots
//!
//! These are read-only views of what a resource listing returned. They are
//! built from Kubernetes `ObjectMeta` so the live client and the offline
//! manifest loader produce identical records.

use std::fmt;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;

/// Traversal key: the (kind, name) pair of an object within one namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub kind: String,
    pub name: String,
}

impl ObjectKey {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// Identity of a listed object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectIdentity {
    pub kind: String,
    pub name: String,
    /// May be absent on degraded listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl ObjectIdentity {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            uid: None,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(self.kind.clone(), self.name.clone())
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// A declared owner of an object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerReference {
    pub kind: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// Informational only; all references are followed the same way
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
}

impl OwnerReference {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            uid: None,
            controller: None,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn controller(mut self, controller: bool) -> Self {
        self.controller = Some(controller);
        self
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey::new(self.kind.clone(), self.name.clone())
    }

    /// Whether this reference points at `target`
    ///
    /// Uid equality decides when both sides carry a uid; otherwise the full
    /// (kind, name) pair must match.
    pub fn refers_to(&self, target: &ObjectIdentity) -> bool {
        match (self.uid.as_deref(), target.uid.as_deref()) {
            (Some(owner_uid), Some(target_uid)) => owner_uid == target_uid,
            _ => self.kind == target.kind && self.name == target.name,
        }
    }
}

impl From<&k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference> for OwnerReference {
    fn from(owner: &k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference) -> Self {
        Self {
            kind: owner.kind.clone(),
            name: owner.name.clone(),
            uid: Some(owner.uid.clone()).filter(|uid| !uid.is_empty()),
            controller: owner.controller,
        }
    }
}

/// One object returned by a listing, with its owner references
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectRecord {
    pub identity: ObjectIdentity,
    pub owner_references: Vec<OwnerReference>,
}

impl ObjectRecord {
    pub fn new(identity: ObjectIdentity) -> Self {
        Self {
            identity,
            owner_references: Vec::new(),
        }
    }

    pub fn owned_by(mut self, owner: OwnerReference) -> Self {
        self.owner_references.push(owner);
        self
    }

    /// Build a record from object metadata
    ///
    /// `kind` comes from the listing rather than the object because list
    /// responses frequently omit `kind` on their items. Returns `None` for
    /// metadata without a name.
    pub fn from_meta(kind: &str, meta: &ObjectMeta) -> Option<Self> {
        let name = meta.name.as_deref().filter(|n| !n.is_empty())?;
        let mut identity = ObjectIdentity::new(kind, name);
        identity.uid = meta.uid.clone().filter(|uid| !uid.is_empty());

        let owner_references = meta
            .owner_references
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(OwnerReference::from)
            .collect();

        Some(Self {
            identity,
            owner_references,
        })
    }

    pub fn is_owned_by(&self, target: &ObjectIdentity) -> bool {
        self.owner_references
            .iter()
            .any(|owner| owner.refers_to(target))
    }
}
