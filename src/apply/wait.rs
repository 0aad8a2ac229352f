// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0

//! Bounded readiness polling for applied objects.

use std::time::Duration;

use kube::api::{Api, DynamicObject};
use kube::Client;
use tokio::time::{sleep, Instant};
use tracing::{debug, instrument};

use crate::error::{ConvoyError, Result};
use crate::manifest::{is_cluster_definition, ObjectRef};
use crate::scheme::TypeRegistry;

/// Poll the live state of every reference until all are ready or the
/// deadline elapses. The deadline is checked before each sleep, so a read
/// returning just past the deadline is still reported as a timeout.
#[instrument(skip(client, registry, refs), fields(count = refs.len()))]
pub async fn wait_for_set(
    client: &Client,
    registry: &TypeRegistry,
    refs: &[ObjectRef],
    interval: Duration,
    timeout: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    let mut pending: Vec<&ObjectRef> = refs.iter().collect();

    loop {
        let mut still_pending = Vec::new();
        for oref in pending {
            if is_object_ready(client, registry, oref).await? {
                debug!("{} is ready", oref);
            } else {
                still_pending.push(oref);
            }
        }

        if still_pending.is_empty() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(ConvoyError::WaitTimeout(timeout));
        }

        pending = still_pending;
        sleep(interval).await;
    }
}

/// Re-read one reference and evaluate its readiness. A reference that has
/// disappeared fails the wait immediately.
async fn is_object_ready(
    client: &Client,
    registry: &TypeRegistry,
    oref: &ObjectRef,
) -> Result<bool> {
    let gvk = oref.gvk();
    let api: Api<DynamicObject> =
        registry.dynamic_api(client.clone(), &gvk, oref.namespace.as_deref());

    let object = api
        .get_opt(&oref.name)
        .await?
        .ok_or_else(|| ConvoyError::ResourceVanished(oref.to_string()))?;

    // Definitions and namespaces are data objects: existence is readiness.
    if is_cluster_definition(&gvk) {
        return Ok(true);
    }

    Ok(status_indicates_ready(&object))
}

/// Readiness from status fields: the observed generation must have caught up
/// with the desired one, and a Ready or Available condition, when present,
/// must be True. Objects without a status are pure data and count as ready.
fn status_indicates_ready(object: &DynamicObject) -> bool {
    let Some(status) = object.data.get("status") else {
        return true;
    };

    if let (Some(observed), Some(generation)) = (
        status.get("observedGeneration").and_then(|v| v.as_i64()),
        object.metadata.generation,
    ) {
        if observed < generation {
            return false;
        }
    }

    if let Some(conditions) = status.get("conditions").and_then(|v| v.as_array()) {
        let gate = conditions.iter().find(|c| {
            matches!(
                c.get("type").and_then(|t| t.as_str()),
                Some("Ready") | Some("Available")
            )
        });
        if let Some(condition) = gate {
            return condition.get("status").and_then(|s| s.as_str()) == Some("True");
        }
    }

    true
}
