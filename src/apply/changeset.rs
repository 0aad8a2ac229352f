// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0

//! Per-object outcome records for one convergence run.

use std::fmt;

use crate::manifest::ObjectRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Unchanged,
    Created,
    Configured,
    Deleted,
    Failed,
}

impl Action {
    /// True for actions that mutated the cluster.
    pub fn changed(&self) -> bool {
        matches!(self, Action::Created | Action::Configured | Action::Deleted)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Unchanged => "unchanged",
            Action::Created => "created",
            Action::Configured => "configured",
            Action::Deleted => "deleted",
            Action::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct ChangeSetEntry {
    pub subject: ObjectRef,
    pub action: Action,
    pub error: Option<String>,
}

impl fmt::Display for ChangeSetEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(err) => write!(f, "{} {}: {}", self.subject, self.action, err),
            None => write!(f, "{} {}", self.subject, self.action),
        }
    }
}

/// Ordered, append-only record of outcomes for one convergence run. Holds no
/// live connections; safe to render as a report at any point.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub entries: Vec<ChangeSetEntry>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subject: ObjectRef, action: Action, error: Option<String>) {
        self.entries.push(ChangeSetEntry {
            subject,
            action,
            error,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any entry past `from` mutated the cluster.
    pub fn any_changed_since(&self, from: usize) -> bool {
        self.entries[from..].iter().any(|e| e.action.changed())
    }

    /// References of all successfully applied entries.
    pub fn refs(&self) -> Vec<ObjectRef> {
        self.entries
            .iter()
            .filter(|e| e.action != Action::Failed)
            .map(|e| e.subject.clone())
            .collect()
    }
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
