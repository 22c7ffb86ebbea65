// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
use clap::Parser;
use log::error;
use std::time::Duration;

use showdown_equity::EngineConfig;
use showdown_server::server;

#[derive(Debug, Parser)]
struct Cli {
    /// The server listening address.
    #[clap(long, short, default_value = "127.0.0.1")]
    address: String,
    /// The server listening port.
    #[clap(long, short, default_value_t = 9871)]
    port: u16,
    /// Monte Carlo trials per sampled computation.
    #[clap(long, default_value_t = 100_000)]
    trials: u32,
    /// Enumerate exhaustively up to this many deals.
    #[clap(long, default_value_t = 2_000_000)]
    exact_threshold: u64,
    /// Worker tasks per computation, defaults to the available cores.
    #[clap(long)]
    tasks: Option<usize>,
    /// Time budget per computation in milliseconds.
    #[clap(long, default_value_t = 5_000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mut engine = EngineConfig {
        exact_threshold: cli.exact_threshold,
        trials: cli.trials,
        timeout: Some(Duration::from_millis(cli.timeout_ms)),
        ..EngineConfig::default()
    };
    if let Some(tasks) = cli.tasks {
        engine.tasks = tasks;
    }

    let config = showdown_server::Config {
        address: cli.address,
        port: cli.port,
        engine,
    };

    if let Err(e) = server::run(config).await {
        error!("{e}");
    }
}
