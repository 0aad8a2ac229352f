// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0

//! Fixed registry of resource kinds the engine understands.
//!
//! Known kinds carry their canonical plural and scope. Anything else is
//! treated as an opaque document and still applies through generic
//! server-side apply, with a naive plural guess and scope inferred from the
//! presence of a namespace in the manifest.

use std::collections::HashMap;

use kube::api::{Api, DynamicObject};
use kube::core::{ApiResource, GroupVersionKind};
use kube::Client;

#[derive(Debug, Clone, Copy)]
struct KindInfo {
    plural: &'static str,
    cluster_scoped: bool,
}

/// Closed mapping from (group, kind) to plural and scope.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    kinds: HashMap<(&'static str, &'static str), KindInfo>,
}

macro_rules! register {
    ($map:expr, $group:literal, $kind:literal, $plural:literal, $cluster_scoped:literal) => {
        $map.insert(
            ($group, $kind),
            KindInfo {
                plural: $plural,
                cluster_scoped: $cluster_scoped,
            },
        );
    };
}

impl Default for TypeRegistry {
    fn default() -> Self {
        let mut kinds = HashMap::new();

        // core
        register!(kinds, "", "Namespace", "namespaces", true);
        register!(kinds, "", "ConfigMap", "configmaps", false);
        register!(kinds, "", "Secret", "secrets", false);
        register!(kinds, "", "Service", "services", false);
        register!(kinds, "", "ServiceAccount", "serviceaccounts", false);

        // apps
        register!(kinds, "apps", "Deployment", "deployments", false);
        register!(kinds, "apps", "StatefulSet", "statefulsets", false);
        register!(kinds, "apps", "DaemonSet", "daemonsets", false);
        register!(kinds, "apps", "ReplicaSet", "replicasets", false);

        // rbac
        register!(kinds, "rbac.authorization.k8s.io", "Role", "roles", false);
        register!(kinds, "rbac.authorization.k8s.io", "RoleBinding", "rolebindings", false);
        register!(kinds, "rbac.authorization.k8s.io", "ClusterRole", "clusterroles", true);
        register!(
            kinds,
            "rbac.authorization.k8s.io",
            "ClusterRoleBinding",
            "clusterrolebindings",
            true
        );

        // networking
        register!(kinds, "networking.k8s.io", "Ingress", "ingresses", false);
        register!(kinds, "networking.k8s.io", "IngressClass", "ingressclasses", true);
        register!(kinds, "networking.k8s.io", "NetworkPolicy", "networkpolicies", false);

        // type definitions
        register!(
            kinds,
            "apiextensions.k8s.io",
            "CustomResourceDefinition",
            "customresourcedefinitions",
            true
        );

        // GitOps custom kinds
        register!(kinds, "source.toolkit.fluxcd.io", "GitRepository", "gitrepositories", false);
        register!(kinds, "source.toolkit.fluxcd.io", "HelmRepository", "helmrepositories", false);
        register!(kinds, "source.toolkit.fluxcd.io", "OCIRepository", "ocirepositories", false);
        register!(
            kinds,
            "kustomize.toolkit.fluxcd.io",
            "Kustomization",
            "kustomizations",
            false
        );
        register!(kinds, "helm.toolkit.fluxcd.io", "HelmRelease", "helmreleases", false);
        register!(kinds, "argoproj.io", "Application", "applications", false);
        register!(kinds, "argoproj.io", "AppProject", "appprojects", false);

        TypeRegistry { kinds }
    }
}

impl TypeRegistry {
    fn lookup(&self, gvk: &GroupVersionKind) -> Option<KindInfo> {
        self.kinds
            .get(&(gvk.group.as_str(), gvk.kind.as_str()))
            .copied()
    }

    pub fn is_known(&self, gvk: &GroupVersionKind) -> bool {
        self.lookup(gvk).is_some()
    }

    /// Resolve the API resource for a kind, guessing the plural for kinds
    /// outside the registry.
    pub fn api_resource(&self, gvk: &GroupVersionKind) -> ApiResource {
        let plural = match self.lookup(gvk) {
            Some(info) => info.plural.to_string(),
            None => format!("{}s", gvk.kind.to_lowercase()),
        };

        let api_version = if gvk.group.is_empty() {
            gvk.version.clone()
        } else {
            format!("{}/{}", gvk.group, gvk.version)
        };

        ApiResource {
            group: gvk.group.clone(),
            version: gvk.version.clone(),
            api_version,
            kind: gvk.kind.clone(),
            plural,
        }
    }

    /// Build a dynamic API handle for one object. Known cluster-scoped kinds
    /// ignore any namespace; unknown kinds are namespaced iff the manifest
    /// carried a namespace.
    pub fn dynamic_api(
        &self,
        client: Client,
        gvk: &GroupVersionKind,
        namespace: Option<&str>,
    ) -> Api<DynamicObject> {
        let ar = self.api_resource(gvk);
        let cluster_scoped = match self.lookup(gvk) {
            Some(info) => info.cluster_scoped,
            None => namespace.is_none(),
        };

        if cluster_scoped {
            Api::all_with(client, &ar)
        } else {
            Api::namespaced_with(client, namespace.unwrap_or("default"), &ar)
        }
    }
}
