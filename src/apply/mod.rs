// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0

//! Staged apply-and-converge engine.
//!
//! A convergence run applies cluster definitions (Namespaces and type
//! definitions) first, waits for them when anything changed, then applies
//! the remaining objects and waits again. Failures stop the run and carry
//! the partial change-set so callers can report how far convergence got.

pub mod changeset;
pub mod executor;
pub mod wait;

use std::fmt;

use kube::Client;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info};

pub use changeset::{Action, ChangeSet, ChangeSetEntry};

use crate::config::Options;
use crate::constants::FIELD_MANAGER;
use crate::error::ConvoyError;
use crate::manifest::{parse_objects, split_definitions};
use crate::scheme::TypeRegistry;

/// Phases of one convergence run. Failure is terminal from any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Classify,
    ApplyDefinitions,
    WaitDefinitions,
    ApplyDependents,
    WaitDependents,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Classify => "classify",
            Phase::ApplyDefinitions => "apply definitions",
            Phase::WaitDefinitions => "wait for definitions",
            Phase::ApplyDependents => "apply dependents",
            Phase::WaitDependents => "wait for dependents",
            Phase::Done => "done",
        };
        f.write_str(s)
    }
}

/// A failed run: the phase that failed, the cause, and everything that did
/// succeed before the failure.
#[derive(Debug, Error)]
#[error("{phase} failed: {source}")]
pub struct ConvergeError {
    pub phase: Phase,
    pub changeset: ChangeSet,
    #[source]
    pub source: ConvoyError,
}

/// One-shot convergence engine bound to a single target cluster client.
/// Not shared across runs; federated callers build one per target.
pub struct Converger {
    client: Client,
    registry: TypeRegistry,
    options: Options,
}

impl Converger {
    pub fn new(client: Client, options: Options) -> Self {
        Converger {
            client,
            registry: TypeRegistry::default(),
            options,
        }
    }

    /// Run one convergence over raw manifest bytes and render the report.
    pub async fn apply(&self, manifests: &[u8]) -> Result<String, ConvergeError> {
        self.converge(manifests).await.map(|cs| cs.to_string())
    }

    /// Run the phase machine over raw manifest bytes. The command deadline
    /// is enforced inside the run, between objects and around waits, so a
    /// deadline failure still carries the partial change-set and an issued
    /// patch is allowed to complete.
    pub async fn converge(&self, manifests: &[u8]) -> Result<ChangeSet, ConvergeError> {
        let deadline = Instant::now() + self.options.timeout;
        let mut changeset = ChangeSet::new();
        let mut phase = Phase::Classify;

        let fail = |phase: Phase, changeset: &ChangeSet, source: ConvoyError| ConvergeError {
            phase,
            changeset: changeset.clone(),
            source,
        };

        let objects =
            parse_objects(manifests).map_err(|e| fail(phase, &changeset, e))?;
        if objects.is_empty() {
            return Err(fail(phase, &changeset, ConvoyError::EmptyManifest));
        }

        let (definitions, dependents) = split_definitions(objects);
        debug!(
            "classified {} definitions and {} dependents",
            definitions.len(),
            dependents.len()
        );

        phase = Phase::ApplyDefinitions;
        if !definitions.is_empty() {
            executor::apply_set(
                &self.client,
                &self.registry,
                &definitions,
                FIELD_MANAGER,
                deadline,
                &mut changeset,
            )
            .await
            .map_err(|e| fail(phase, &changeset, e))?;
        }

        // Polling is skipped when the stage changed nothing.
        if changeset.any_changed_since(0) {
            phase = Phase::WaitDefinitions;
            self.wait(&changeset, deadline)
                .await
                .map_err(|e| fail(phase, &changeset, e))?;
        }

        phase = Phase::ApplyDependents;
        let applied_before = changeset.len();
        if !dependents.is_empty() {
            executor::apply_set(
                &self.client,
                &self.registry,
                &dependents,
                FIELD_MANAGER,
                deadline,
                &mut changeset,
            )
            .await
            .map_err(|e| fail(phase, &changeset, e))?;
        }

        if changeset.any_changed_since(applied_before) {
            phase = Phase::WaitDependents;
            self.wait(&changeset, deadline)
                .await
                .map_err(|e| fail(phase, &changeset, e))?;
        }

        phase = Phase::Done;
        info!("{}: {} objects converged", phase, changeset.len());
        Ok(changeset)
    }

    async fn wait(&self, changeset: &ChangeSet, deadline: Instant) -> crate::error::Result<()> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(ConvoyError::DeadlineExceeded);
        }
        wait::wait_for_set(
            &self.client,
            &self.registry,
            &changeset.refs(),
            self.options.poll_interval,
            self.options.wait_timeout.min(remaining),
        )
        .await
    }
}
