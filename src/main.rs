// Copyright 2026, Convoy Authors
// SPDX-License-Identifier: Apache-2.0
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use k8s_openapi::api::core::v1::Secret;
use kube::api::ListParams;
use kube::Api;
use tracing::info;

use convoy::apply::Converger;
use convoy::config::Options;
use convoy::constants::{annotations, IN_CLUSTER, IN_CLUSTER_ADDRESS};
use convoy::kubernetes::{ambient_client, decode_credential_secret, resolve_cluster_client};

#[derive(Parser)]
#[command(name = "convoy", version, about = "Converge declarative manifests across federated clusters")]
struct Cli {
    /// Namespace holding cluster credential secrets
    #[arg(long, default_value = "convoy-system", global = true)]
    namespace: String,

    /// Overall deadline for this operation, in seconds
    #[arg(long, default_value_t = 600, global = true)]
    timeout_secs: u64,

    /// Interval between readiness polls, in seconds
    #[arg(long, default_value_t = 2, global = true)]
    poll_interval_secs: u64,

    /// Sustained request rate for built clients
    #[arg(long, default_value_t = 50.0, global = true)]
    qps: f32,

    /// Burst ceiling for built clients
    #[arg(long, default_value_t = 100, global = true)]
    burst: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a manifest file against a cluster and wait for readiness
    Apply {
        /// Manifest file to apply, or '-' for stdin
        #[arg(short, long)]
        filename: PathBuf,

        /// Target cluster name, or the reserved in-cluster name
        #[arg(long, default_value = IN_CLUSTER)]
        cluster: String,
    },
    /// List registered clusters
    ListClusters,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "convoy=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = Options {
        namespace: cli.namespace.clone(),
        qps: cli.qps,
        burst: cli.burst,
        poll_interval: Duration::from_secs(cli.poll_interval_secs),
        timeout: Duration::from_secs(cli.timeout_secs),
        ..Options::default()
    };

    match cli.command {
        Commands::Apply { filename, cluster } => apply_cmd(&options, &filename, &cluster).await,
        Commands::ListClusters => list_clusters_cmd(&options).await,
    }
}

async fn apply_cmd(options: &Options, filename: &PathBuf, cluster: &str) -> Result<()> {
    let manifests = read_manifests(filename)?;

    let mgmt = ambient_client(options)
        .await
        .context("failed to connect to the management cluster")?;
    let (client, cluster_config) = resolve_cluster_client(&mgmt, cluster, options).await?;
    info!("Applying manifests to cluster {:?}", cluster_config.name);

    let converger = Converger::new(client, options.clone());

    // The converger enforces the command deadline itself, so a timed-out
    // run still reports what did converge before failing.
    match converger.apply(&manifests).await {
        Ok(report) => {
            print!("{report}");
            Ok(())
        }
        Err(e) => {
            if !e.changeset.is_empty() {
                eprint!("{}", e.changeset);
            }
            bail!(e)
        }
    }
}

fn read_manifests(filename: &PathBuf) -> Result<Vec<u8>> {
    if filename.to_str() == Some("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read manifests from stdin")?;
        Ok(buf)
    } else {
        std::fs::read(filename)
            .with_context(|| format!("failed to read manifest file {}", filename.display()))
    }
}

async fn list_clusters_cmd(options: &Options) -> Result<()> {
    let mgmt = ambient_client(options)
        .await
        .context("failed to connect to the management cluster")?;

    let secrets: Api<Secret> = Api::namespaced(mgmt, &options.namespace);
    let params = ListParams::default().labels(&format!("{}=true", annotations::CLUSTER_LABEL));
    let list = secrets.list(&params).await?;

    println!("{:<20} {:<40} {:<40}", "NAME", "EXTERNAL ADDRESS", "INTERNAL ADDRESS");
    println!("{:<20} {:<40} {:<40}", IN_CLUSTER, "-", IN_CLUSTER_ADDRESS);
    for secret in list.items {
        match decode_credential_secret(&secret) {
            Ok(c) => println!(
                "{:<20} {:<40} {:<40}",
                c.name, c.external_address, c.internal_address
            ),
            Err(e) => tracing::warn!(
                "Skipping malformed credential secret {:?}: {}",
                secret.metadata.name.as_deref().unwrap_or_default(),
                e
            ),
        }
    }

    Ok(())
}
