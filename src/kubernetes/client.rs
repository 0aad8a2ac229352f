// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0

//! Building rate-limited clients for the management cluster and for
//! federated clusters resolved from credential secrets.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use kube::client::ClientBuilder;
use kube::{Client, Config};
use tower::buffer::BufferLayer;
use tower::limit::RateLimitLayer;
use tracing::{debug, info, instrument};

use crate::config::Options;
use crate::constants::IN_CLUSTER;
use crate::error::{ConvoyError, Result};
use crate::kubernetes::credentials::{fetch_cluster_credentials, ClusterConfig};

/// Client with ambient credentials (kubeconfig or in-cluster service
/// account), used to reach the management cluster.
pub async fn ambient_client(options: &Options) -> Result<Client> {
    let config = Config::infer()
        .await
        .map_err(|e| ConvoyError::ConnectionError(e.to_string()))?;
    rate_limited_client(config, options)
}

/// Build a client for a federated cluster from its connection profile. The
/// configuration is constructed by hand from the decoded credential record.
pub fn client_for_cluster(cluster: &ClusterConfig, options: &Options) -> Result<Client> {
    rate_limited_client(config_for_cluster(cluster)?, options)
}

fn config_for_cluster(cluster: &ClusterConfig) -> Result<Config> {
    let uri: http::Uri = cluster
        .external_address
        .parse()
        .map_err(|e| ConvoyError::ConnectionError(format!("invalid server address: {e}")))?;

    let mut config = Config::new(uri);
    config.accept_invalid_certs = cluster.insecure;
    config.tls_server_name = cluster.server_name.clone();
    // kube expects kubeconfig-style base64 fields here; a cert-less profile
    // carries no identity at all rather than an empty one
    if !cluster.cert.is_empty() {
        config.auth_info.client_certificate_data = Some(BASE64.encode(&cluster.cert));
    }
    if !cluster.key.is_empty() {
        config.auth_info.client_key_data = Some(BASE64.encode(&cluster.key).into());
    }

    Ok(config)
}

/// Wrap the client service in rate-limit and buffer layers. A client talking
/// to a remote whose schema is still being provisioned must not flood it
/// with retries, so the throttle applies to every built client uniformly.
fn rate_limited_client(config: Config, options: &Options) -> Result<Client> {
    // burst requests per (burst / qps) seconds gives the sustained rate with
    // room for spikes
    let period = Duration::from_secs_f32(options.burst as f32 / options.qps.max(0.1));

    let client = ClientBuilder::try_from(config)
        .map_err(|e| ConvoyError::ConnectionError(e.to_string()))?
        .with_layer(&RateLimitLayer::new(options.burst as u64, period))
        .with_layer(&BufferLayer::new(1024))
        .build();

    Ok(client)
}

/// Resolve the client and connection profile for a named cluster. The
/// reserved name selects the management cluster itself without any secret
/// lookup; any other name is resolved through its credential secret, and
/// reachability is verified before the client is handed out.
#[instrument(skip(mgmt, options))]
pub async fn resolve_cluster_client(
    mgmt: &Client,
    cluster_name: &str,
    options: &Options,
) -> Result<(Client, ClusterConfig)> {
    if cluster_name == IN_CLUSTER {
        debug!("Using the management cluster directly");
        return Ok((mgmt.clone(), ClusterConfig::in_cluster()));
    }

    let cluster = fetch_cluster_credentials(mgmt, cluster_name, options).await?;
    let client = client_for_cluster(&cluster, options)?;

    let version = client.apiserver_version().await.map_err(|e| {
        ConvoyError::ConnectionError(format!(
            "version discovery for cluster {:?} failed: {e}",
            cluster.name
        ))
    })?;
    info!(
        "Connected to cluster {:?} ({}.{})",
        cluster.name, version.major, version.minor
    );

    Ok((client, cluster))
}
