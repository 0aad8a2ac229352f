// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0

//! Server-side apply of manifest batches with per-object outcome tracking.

use kube::api::{Api, DynamicObject, Patch, PatchParams};
use kube::{Client, ResourceExt};
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::apply::changeset::{Action, ChangeSet};
use crate::error::{ConvoyError, Result};
use crate::manifest::ManifestObject;
use crate::scheme::TypeRegistry;

/// Apply a batch of objects in input order, appending one entry per object
/// to `changeset`. The first unrecoverable error records a failed entry and
/// aborts the batch; entries produced so far stay in the change-set so the
/// caller can report what did succeed.
///
/// The deadline is checked between objects, never mid-call: an issued
/// patch is allowed to complete before the batch stops.
pub async fn apply_set(
    client: &Client,
    registry: &TypeRegistry,
    objects: &[ManifestObject],
    field_manager: &str,
    deadline: Instant,
    changeset: &mut ChangeSet,
) -> Result<()> {
    for object in objects {
        if Instant::now() >= deadline {
            return Err(ConvoyError::DeadlineExceeded);
        }
        let subject = object.object_ref();
        match apply_one(client, registry, object, field_manager).await {
            Ok(action) => {
                debug!("{} {}", subject, action);
                changeset.push(subject, action, None);
            }
            Err(e) => {
                changeset.push(subject, Action::Failed, Some(e.to_string()));
                return Err(e);
            }
        }
    }
    Ok(())
}

/// Field-owner-scoped merge of one object: create if absent, patch if the
/// owned field-set diverges, no-op if identical. Divergence is detected by
/// the server moving the resourceVersion in response to the apply.
#[instrument(skip(client, registry, object), fields(subject = %object.object_ref()))]
async fn apply_one(
    client: &Client,
    registry: &TypeRegistry,
    object: &ManifestObject,
    field_manager: &str,
) -> Result<Action> {
    let api: Api<DynamicObject> =
        registry.dynamic_api(client.clone(), &object.gvk, object.namespace());
    let name = object.name();

    let existing = api.get_opt(name).await?;

    let params = PatchParams::apply(field_manager).force();
    let applied = api
        .patch(name, &params, &Patch::Apply(&object.object))
        .await
        .map_err(|e| ConvoyError::ApplyError {
            subject: object.object_ref().to_string(),
            source: e,
        })?;

    match existing {
        None => Ok(Action::Created),
        Some(before) if before.resource_version() == applied.resource_version() => {
            Ok(Action::Unchanged)
        }
        Some(_) => Ok(Action::Configured),
    }
}
