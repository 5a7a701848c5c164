//! Live accessor listing objects through the dynamic API

use std::time::Duration;

use async_trait::async_trait;
use kube::Api;
use kube::api::ListParams;
use kube::core::{ApiResource, DynamicObject};

use crate::accessor::ResourceAccessor;
use crate::error::{LineageError, Result};
use crate::models::ObjectRecord;
use crate::registry::KindSpec;

/// Default per-request timeout for listings
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Accessor backed by a Kubernetes client
#[derive(Clone)]
pub struct KubeAccessor {
    client: kube::Client,
    request_timeout: Duration,
}

impl KubeAccessor {
    pub fn new(client: kube::Client) -> Self {
        Self {
            client,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Build the dynamic `ApiResource` for a kind
pub fn api_resource(spec: &KindSpec) -> ApiResource {
    ApiResource {
        group: spec.group.clone(),
        version: spec.version.clone(),
        api_version: spec.api_version(),
        kind: spec.kind.clone(),
        plural: spec.plural.clone(),
    }
}

#[async_trait]
impl ResourceAccessor for KubeAccessor {
    async fn list_objects(
        &self,
        kind: &KindSpec,
        scope: &str,
        name: Option<&str>,
    ) -> Result<Vec<ObjectRecord>> {
        let resource = api_resource(kind);
        let api: Api<DynamicObject> = match listing_namespace(kind, scope) {
            Some(namespace) => Api::namespaced_with(self.client.clone(), namespace, &resource),
            None => Api::all_with(self.client.clone(), &resource),
        };

        let mut params = ListParams::default();
        if let Some(name) = name {
            params = params.fields(&format!("metadata.name={}", name));
        }

        let list = tokio::time::timeout(self.request_timeout, api.list(&params))
            .await
            .map_err(|_| LineageError::Timeout {
                kind: kind.kind.clone(),
                seconds: self.request_timeout.as_secs(),
            })?
            .map_err(|e| classify_error(&kind.kind, &e))?;

        Ok(list
            .items
            .iter()
            .filter_map(|obj| ObjectRecord::from_meta(&kind.kind, &obj.metadata))
            .collect())
    }
}

/// Namespace to list `kind` in, or `None` to list across the cluster
fn listing_namespace<'a>(kind: &KindSpec, scope: &'a str) -> Option<&'a str> {
    kind.namespaced.then_some(scope)
}

/// Map a client error onto the accessor error taxonomy
fn classify_error(kind: &str, error: &kube::Error) -> LineageError {
    classify_message(kind, &format!("{:?}", error), &error.to_string())
}

fn classify_message(kind: &str, detail: &str, message: &str) -> LineageError {
    let denied = ["401", "403", "Forbidden", "Unauthorized", "forbidden"]
        .iter()
        .any(|marker| detail.contains(marker));

    if denied {
        LineageError::AccessDenied {
            kind: kind.to_string(),
            message: message.to_string(),
        }
    } else {
        LineageError::Unavailable {
            kind: kind.to_string(),
            message: message.to_string(),
        }
    }
}
