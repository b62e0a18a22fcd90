//! Random transaction generator.

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use futures::future::join_all;
use rand::Rng;
use tracing::{error, info, warn};
use txgraph_core::AppConfig;

use crate::api::ApiClient;

pub const DEFAULT_MAX_AMOUNT: u64 = 10_000;

#[derive(Args)]
pub struct SimulateArgs {
    /// Transactions per batch
    pub count: usize,

    /// Amounts are drawn uniformly from [0, max-amount)
    #[arg(long, default_value_t = DEFAULT_MAX_AMOUNT)]
    pub max_amount: u64,

    /// Seconds between batches; 0 sends a single batch
    #[arg(long, default_value_t = 0)]
    pub interval: u64,
}

/// Pick two distinct indices below `len`, or `None` when that is impossible.
pub fn pick_pair<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    let from = rng.gen_range(0..len);
    let mut to = rng.gen_range(0..len - 1);
    if to >= from {
        to += 1;
    }
    Some((from, to))
}

/// Whole-dollar amount below `max`.
pub fn random_amount<R: Rng + ?Sized>(rng: &mut R, max: u64) -> f64 {
    if max == 0 {
        return 0.0;
    }
    rng.gen_range(0..max) as f64
}

pub async fn execute(args: SimulateArgs, config: &AppConfig) -> Result<()> {
    let api = ApiClient::new(&config.api_url);

    println!(
        "{} {} transactions per batch against {}",
        "Simulating".bold(),
        args.count.to_string().cyan(),
        api.base_url().cyan()
    );

    if args.interval == 0 {
        run_batch(api, args.count, args.max_amount).await;
        return Ok(());
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval));
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Batches overlap when the server is slower than the interval.
                tokio::spawn(run_batch(api.clone(), args.count, args.max_amount));
            }
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Stopped.".dimmed());
                return Ok(());
            }
        }
    }
}

async fn run_batch(api: ApiClient, count: usize, max_amount: u64) {
    let ids: Vec<String> = match api.list_businesses().await {
        Ok(businesses) => businesses.into_iter().map(|b| b.business_id).collect(),
        Err(e) => {
            error!(error = %e, "Error during /businesses call");
            return;
        }
    };
    if ids.len() < 2 {
        warn!(businesses = ids.len(), "Need at least two businesses to simulate transactions");
        return;
    }

    let timestamp = chrono::Utc::now().timestamp_millis();
    let mut requests = Vec::with_capacity(count);
    {
        let mut rng = rand::thread_rng();
        for _ in 0..count {
            if let Some((from, to)) = pick_pair(&mut rng, ids.len()) {
                requests.push((from, to, random_amount(&mut rng, max_amount)));
            }
        }
    }

    let results = join_all(
        requests
            .iter()
            .map(|&(from, to, amount)| api.post_transaction(&ids[from], &ids[to], amount, timestamp)),
    )
    .await;

    let failed: Vec<_> = results.into_iter().filter_map(Result::err).collect();
    match failed.first() {
        None => info!(count, "Created transactions"),
        Some(first) => error!(count, failed = failed.len(), error = %first, "Failed while creating transactions"),
    }
}
