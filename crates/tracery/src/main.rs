mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::{bail, WrapErr};

use tracery_core::render::Layout;
use tracery_core::source::{resolve_api_token, HttpLedgerClient};
use tracery_core::{
    graph, query, FetchOutcome, NetworkRenderer, RenderConfig, ResilientFetcher, RetryPolicy,
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let center = query::parse_center_timestamp(&args.timestamp)
        .wrap_err("parse --timestamp")?;
    let api_token = resolve_api_token(args.api_token.as_deref(), args.token_file.as_deref())
        .wrap_err("resolve query service credentials")?;

    let source = Arc::new(
        HttpLedgerClient::new(&args.endpoint, api_token, &args.project)
            .wrap_err("construct ledger query client")?,
    );
    let fetcher = ResilientFetcher::new(
        source,
        RetryPolicy {
            max_attempts: args.max_attempts,
            attempt_timeout: Duration::from_secs(args.attempt_timeout),
        },
    );

    // The temporal window drives the run; everything downstream depends on it.
    let outcome = fetcher
        .fetch(&query::temporal_window(center))
        .await
        .wrap_err("fetch temporal transaction window")?;
    let table = match outcome {
        FetchOutcome::Data(table) => table,
        FetchOutcome::Empty => {
            tracing::info!(center = %args.timestamp, "no transactions in the queried window");
            return Ok(());
        }
        FetchOutcome::Exhausted {
            attempts,
            last_error,
        } => {
            bail!("query results unavailable after {attempts} attempts (last error: {last_error})");
        }
    };

    tracing::info!(rows = table.len(), "fetched temporal window");
    for line in table.preview(5) {
        tracing::info!("{line}");
    }

    // Auxiliary context: overall activity of the suspect address. A failure
    // here degrades to a warning rather than aborting the run.
    match fetcher.fetch(&query::address_activity(&args.address)).await {
        Ok(FetchOutcome::Data(activity)) => {
            tracing::info!(
                rows = activity.len(),
                address = %args.address,
                "fetched address activity"
            );
        }
        Ok(FetchOutcome::Empty) => {
            tracing::info!(address = %args.address, "no recorded activity for address");
        }
        Ok(FetchOutcome::Exhausted { attempts, .. }) => {
            tracing::warn!(attempts, "address activity fetch exhausted its retry budget");
        }
        Err(err) => {
            tracing::warn!(error = %err, "address activity fetch failed");
        }
    }

    let network = graph::build_network(&table).wrap_err("assemble transaction network")?;
    tracing::info!(
        nodes = network.node_count(),
        edges = network.edge_count(),
        "assembled transaction network"
    );

    let renderer = NetworkRenderer::new(RenderConfig {
        layout: Layout::from_selector(&args.layout),
        output_path: args.output,
        ..Default::default()
    });
    let artifact = renderer
        .render(&network, &args.address)
        .wrap_err("render network image")?;

    println!("{}", artifact.display());
    Ok(())
}
