// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0

//! Cluster credential resolution and client construction.

pub mod client;
pub mod credentials;

pub use client::{ambient_client, client_for_cluster, resolve_cluster_client};
pub use credentials::{decode_credential_secret, fetch_cluster_credentials, ClusterConfig};
