// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes labels and annotations used on cluster credential secrets
pub mod annotations {
    /// Label marking a secret as a registered cluster credential
    pub const CLUSTER_LABEL: &str = "convoy/cluster";
    /// Address reachable from outside the management cluster
    pub const EXTERNAL_ADDRESS: &str = "convoy/external-address";
    /// Address reachable from workloads inside the management cluster
    pub const INTERNAL_ADDRESS: &str = "convoy/internal-address";
}

/// The field manager name claimed during server-side apply
pub const FIELD_MANAGER: &str = "convoy";

/// Reserved cluster name selecting the management cluster itself
pub const IN_CLUSTER: &str = "in-cluster";

/// Well-known API address inside a cluster
pub const IN_CLUSTER_ADDRESS: &str = "https://kubernetes.default.svc";

/// Suffix appended to a cluster name to form its credential secret name
pub const CLUSTER_SECRET_SUFFIX: &str = "-cluster";

/// Default namespace holding cluster credential secrets
pub const DEFAULT_CREDENTIAL_NAMESPACE: &str = "convoy-system";
