// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

use crate::constants::DEFAULT_CREDENTIAL_NAMESPACE;

/// Runtime options threaded explicitly through the resolver and the
/// convergence engine. There is no ambient global state; every constructor
/// that needs a knob takes a reference to this struct.
#[derive(Debug, Clone)]
pub struct Options {
    /// Namespace on the management cluster holding cluster credential secrets
    pub namespace: String,
    /// Sustained request rate applied to every built client
    pub qps: f32,
    /// Burst ceiling applied to every built client
    pub burst: u32,
    /// Interval between readiness polls
    pub poll_interval: Duration,
    /// Ceiling for a single readiness wait
    pub wait_timeout: Duration,
    /// Overall deadline for one command invocation
    pub timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            namespace: DEFAULT_CREDENTIAL_NAMESPACE.to_string(),
            qps: 50.0,
            burst: 100,
            poll_interval: Duration::from_secs(2),
            wait_timeout: Duration::from_secs(5 * 60),
            timeout: Duration::from_secs(10 * 60),
        }
    }
}
