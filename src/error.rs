// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvoyError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("no credential secret registered for cluster {0:?}")]
    CredentialNotFound(String),

    #[error("malformed cluster credential: {0}")]
    MalformedCredential(String),

    #[error("malformed client certificate: {0}")]
    MalformedCertificate(String),

    #[error("cluster API unreachable: {0}")]
    ConnectionError(String),

    #[error("manifest parse failed: {0}")]
    ManifestError(String),

    #[error("apply of {subject} rejected: {source}")]
    ApplyError {
        subject: String,
        #[source]
        source: kube::Error,
    },

    #[error("resources not ready after {0:?}")]
    WaitTimeout(Duration),

    #[error("{0} disappeared while waiting for readiness")]
    ResourceVanished(String),

    #[error("command deadline exceeded")]
    DeadlineExceeded,

    #[error("no objects found in the manifests")]
    EmptyManifest,
}

pub type Result<T> = std::result::Result<T, ConvoyError>;
