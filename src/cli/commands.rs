//! CLI command handlers

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use super::args::Args;
use crate::accessor::{ManifestAccessor, ResourceAccessor};
use crate::cluster::{KubeAccessor, create_client};
use crate::config::Config;
use crate::lineage::{Lineage, TraceOptions, trace_lineage};
use crate::registry::{KindRegistry, KindSpec, kind_specs};
use crate::render::render;

/// Print the kinds that are scanned, in scan order
pub fn list_kinds(config: &Config) {
    for spec in kind_specs(&config.kinds) {
        if spec.aliases.is_empty() {
            println!("{} ({})", spec.kind, spec.api_version());
        } else {
            println!(
                "{} ({}) aliases: {}",
                spec.kind,
                spec.api_version(),
                spec.aliases.join(", ")
            );
        }
    }
}

/// Trace the target named in `args` and print its lineage
///
/// Returns the lineage so the caller can pick the exit status.
pub async fn run_lineage(args: &Args, config: &Config) -> Result<Lineage> {
    let (Some(kind), Some(name)) = (args.kind.as_deref(), args.name.as_deref()) else {
        return Err(anyhow::anyhow!("Both KIND and NAME are required"));
    };

    let namespace = args
        .namespace
        .clone()
        .unwrap_or_else(|| config.default_namespace.clone());
    let specs = kind_specs(&config.kinds);
    let registry = build_registry(args, config, &specs).await?;

    let cancel = CancellationToken::new();
    spawn_cancel_triggers(&cancel, args.timeout.unwrap_or(config.timeout_seconds));

    let options = TraceOptions {
        scope: namespace.clone(),
        max_concurrent_listings: config.max_concurrent_listings,
    };
    let lineage = trace_lineage(&registry, kind, name, options, cancel.clone())
        .await
        .with_context(|| format!("Failed to trace {}/{} in namespace {}", kind, name, namespace))?;
    // Stop the trigger tasks
    cancel.cancel();

    let output = render(&lineage, args.output.unwrap_or(config.output))?;
    print!("{}", output);

    Ok(lineage)
}

async fn build_registry(args: &Args, config: &Config, specs: &[KindSpec]) -> Result<KindRegistry> {
    let accessor: Arc<dyn ResourceAccessor> = match &args.from_file {
        Some(path) => Arc::new(
            ManifestAccessor::load(path)
                .with_context(|| format!("Failed to load manifest {}", path.display()))?,
        ),
        None => {
            let client = create_client(args.context.as_deref()).await?;
            Arc::new(
                KubeAccessor::new(client)
                    .with_request_timeout(Duration::from_secs(config.request_timeout_seconds)),
            )
        }
    };

    let registry = KindRegistry::from_specs(specs, accessor);
    tracing::debug!("Scanning kinds: {:?}", registry.kinds());
    Ok(registry)
}

/// Cancel on Ctrl-C, and after `timeout_seconds` unless it is zero
fn spawn_cancel_triggers(cancel: &CancellationToken, timeout_seconds: u64) {
    let token = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    tracing::debug!("Interrupted, cancelling traversal");
                    token.cancel();
                }
            }
        }
    });

    if timeout_seconds > 0 {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(Duration::from_secs(timeout_seconds)) => {
                    tracing::debug!("Timed out after {}s, cancelling traversal", timeout_seconds);
                    token.cancel();
                }
            }
        });
    }
}
