//! netconn-rate
//!
//! High average netconn/second alert. Searches the server for processes
//! with many network connections, divides each count by the process
//! runtime and prints the processes above the alert rate.
//!
//! ```text
//!  search (paged) ──▶ RateFilter ──▶ report line ──▶ stdout
//!                        │
//!                        └─ optional events lookup ──▶ debug log
//! ```

mod cli;
mod client;
mod config;
mod constants;
mod error;
mod logic;
mod models;
mod report;
#[cfg(test)]
mod testing;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client::CbClient;
use logic::RateHit;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "netconn_rate=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();
    let config = config::Config::from_env().apply_cli(&cli);

    if let Err(e) = run(config).await {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(config: config::Config) -> Result<()> {
    let client_config = config.client_config().context("invalid configuration")?;
    let client = CbClient::new(client_config)?;

    let stdout = std::io::stdout();
    let summary = report(&config, &client, &mut stdout.lock()).await?;

    tracing::info!(
        "Scanned {} processes, {} above {} conn/s",
        summary.scanned,
        summary.hits,
        config.conn_rate
    );
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    scanned: usize,
    hits: usize,
    events_fetched: usize,
}

/// Page through the search, writing one line per hit as soon as its page arrives
async fn report<W: Write>(config: &config::Config, client: &CbClient, out: &mut W) -> Result<Summary> {
    let filter = config.rate_filter();
    let query = config.query();

    tracing::info!(
        "Searching {} for \"{}\" (alert above {} conn/s{})",
        client.server_url(),
        query,
        filter.conn_rate(),
        if filter.skip_unknown() { ", skipping unknown runtimes" } else { "" }
    );

    let mut search = client.search(query, config.rows);
    if !config.all_pages {
        search = search.first_page_only();
    }

    let mut summary = Summary::default();

    while let Some(page) = search.next_page().await.context("process search failed")? {
        summary.scanned += page.len();

        for hit in filter.filter(page) {
            summary.hits += 1;
            let line = report::format_hit(config.format, client.server_url(), &hit)?;
            writeln!(out, "{}", line)?;

            if config.with_events && log_events(client, &hit).await {
                summary.events_fetched += 1;
            }
        }
        out.flush()?;
    }

    Ok(summary)
}

/// Events are informational only; a failed lookup does not stop the report
async fn log_events(client: &CbClient, hit: &RateHit) -> bool {
    match client.events(&hit.id, &hit.segment_id).await {
        Ok(events) => {
            let counts = events.counts();
            let process = &events.process;
            tracing::debug!(
                "{}/{} {}: netconns={} filemods={} regmods={} modloads={} childprocs={} ({:?}s)",
                process.id,
                process.segment_id,
                process.process_name,
                counts.netconns,
                counts.filemods,
                counts.regmods,
                counts.modloads,
                counts.childprocs,
                events.elapsed
            );
            true
        }
        Err(e) => {
            tracing::warn!("Events lookup failed for {}/{}: {}", hit.id, hit.segment_id, e);
            false
        }
    }
}
