// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0

//! Manifest decoding and staging classification.

use std::fmt;

use kube::core::{DynamicObject, GroupVersionKind};
use serde::Deserialize;

use crate::error::{ConvoyError, Result};

/// A decoded, self-describing manifest document. Immutable once parsed; the
/// convergence engine consumes it but never mutates it.
#[derive(Debug, Clone)]
pub struct ManifestObject {
    pub object: DynamicObject,
    pub gvk: GroupVersionKind,
}

impl ManifestObject {
    pub fn name(&self) -> &str {
        self.object.metadata.name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.object.metadata.namespace.as_deref()
    }

    /// Minimal identity tuple used to track this object through the apply
    /// and readiness phases without retaining its full body.
    pub fn object_ref(&self) -> ObjectRef {
        ObjectRef {
            group: self.gvk.group.clone(),
            version: self.gvk.version.clone(),
            kind: self.gvk.kind.clone(),
            namespace: self.namespace().map(str::to_string),
            name: self.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub namespace: Option<String>,
    pub name: String,
}

impl ObjectRef {
    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::gvk(&self.group, &self.version, &self.kind)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}/{}/{}", self.kind, ns, self.name),
            None => write!(f, "{}/{}", self.kind, self.name),
        }
    }
}

/// Decode a stream of concatenated YAML documents into manifest objects.
/// Empty documents are skipped; every object must carry apiVersion, kind
/// and a name.
pub fn parse_objects(bytes: &[u8]) -> Result<Vec<ManifestObject>> {
    let mut objects = Vec::new();

    for doc in serde_yaml::Deserializer::from_slice(bytes) {
        let value = serde_yaml::Value::deserialize(doc)
            .map_err(|e| ConvoyError::ManifestError(e.to_string()))?;
        if matches!(value, serde_yaml::Value::Null) {
            continue;
        }

        let object: DynamicObject = serde_yaml::from_value(value)
            .map_err(|e| ConvoyError::ManifestError(e.to_string()))?;

        let types = object.types.as_ref().ok_or_else(|| {
            ConvoyError::ManifestError("document is missing apiVersion or kind".to_string())
        })?;
        if types.kind.is_empty() {
            return Err(ConvoyError::ManifestError(
                "document is missing kind".to_string(),
            ));
        }

        let (group, version) = match types.api_version.split_once('/') {
            Some((g, v)) => (g.to_string(), v.to_string()),
            None => (String::new(), types.api_version.clone()),
        };
        if version.is_empty() {
            return Err(ConvoyError::ManifestError(format!(
                "document {:?} is missing apiVersion",
                types.kind
            )));
        }

        let gvk = GroupVersionKind::gvk(&group, &version, &types.kind);

        if object.metadata.name.as_deref().unwrap_or_default().is_empty() {
            return Err(ConvoyError::ManifestError(format!(
                "{} document is missing metadata.name",
                gvk.kind
            )));
        }

        objects.push(ManifestObject { object, gvk });
    }

    Ok(objects)
}

/// A cluster definition is an object whose existence other objects depend
/// on: a Namespace, or a type definition.
pub fn is_cluster_definition(gvk: &GroupVersionKind) -> bool {
    (gvk.group.is_empty() && gvk.kind == "Namespace")
        || (gvk.group == "apiextensions.k8s.io" && gvk.kind == "CustomResourceDefinition")
}

/// Partition objects into definitions and dependents, preserving the
/// relative input order within each stage.
pub fn split_definitions(
    objects: Vec<ManifestObject>,
) -> (Vec<ManifestObject>, Vec<ManifestObject>) {
    objects
        .into_iter()
        .partition(|o| is_cluster_definition(&o.gvk))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMESPACE_AND_DEPLOYMENT: &str = r#"
apiVersion: v1
kind: Namespace
metadata:
  name: ns-a
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: app
  namespace: ns-a
spec:
  replicas: 1
"#;

    #[test]
    fn test_parse_multiple_documents() {
        let objects = parse_objects(NAMESPACE_AND_DEPLOYMENT.as_bytes()).unwrap();

        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].gvk.kind, "Namespace");
        assert_eq!(objects[0].name(), "ns-a");
        assert_eq!(objects[1].gvk.group, "apps");
        assert_eq!(objects[1].gvk.version, "v1");
        assert_eq!(objects[1].namespace(), Some("ns-a"));
    }

    #[test]
    fn test_parse_skips_empty_documents() {
        let input = "---\n\n---\napiVersion: v1\nkind: Namespace\nmetadata:\n  name: ns-a\n";
        let objects = parse_objects(input.as_bytes()).unwrap();
        assert_eq!(objects.len(), 1);
    }

    #[test]
    fn test_parse_empty_input() {
        let objects = parse_objects(b"").unwrap();
        assert!(objects.is_empty());
    }

    #[test]
    fn test_parse_missing_kind_fails() {
        let input = "apiVersion: v1\nmetadata:\n  name: ns-a\n";
        let err = parse_objects(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ConvoyError::ManifestError(_)));
    }

    #[test]
    fn test_parse_missing_name_fails() {
        let input = "apiVersion: v1\nkind: Namespace\nmetadata: {}\n";
        let err = parse_objects(input.as_bytes()).unwrap_err();
        assert!(matches!(err, ConvoyError::ManifestError(_)));
    }

    #[test]
    fn test_is_cluster_definition() {
        let ns = GroupVersionKind::gvk("", "v1", "Namespace");
        let crd = GroupVersionKind::gvk(
            "apiextensions.k8s.io",
            "v1",
            "CustomResourceDefinition",
        );
        let deploy = GroupVersionKind::gvk("apps", "v1", "Deployment");
        let cm = GroupVersionKind::gvk("", "v1", "ConfigMap");

        assert!(is_cluster_definition(&ns));
        assert!(is_cluster_definition(&crd));
        assert!(!is_cluster_definition(&deploy));
        assert!(!is_cluster_definition(&cm));
    }

    #[test]
    fn test_split_definitions_preserves_order() {
        let input = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: app
  namespace: ns-a
---
apiVersion: v1
kind: Namespace
metadata:
  name: ns-a
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: settings
  namespace: ns-a
"#;
        let objects = parse_objects(input.as_bytes()).unwrap();
        let (definitions, dependents) = split_definitions(objects);

        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].gvk.kind, "Namespace");
        assert_eq!(dependents.len(), 2);
        assert_eq!(dependents[0].gvk.kind, "Deployment");
        assert_eq!(dependents[1].gvk.kind, "ConfigMap");
    }

    #[test]
    fn test_split_empty_input() {
        let (definitions, dependents) = split_definitions(Vec::new());
        assert!(definitions.is_empty());
        assert!(dependents.is_empty());
    }

    #[test]
    fn test_object_ref_display() {
        let objects = parse_objects(NAMESPACE_AND_DEPLOYMENT.as_bytes()).unwrap();
        assert_eq!(objects[0].object_ref().to_string(), "Namespace/ns-a");
        assert_eq!(objects[1].object_ref().to_string(), "Deployment/ns-a/app");
    }
}
