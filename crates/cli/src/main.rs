// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown odds calculator CLI.
//!
//! Computes the hero equity directly with the engine:
//!
//! ```bash
//! $ showdown-cli --hero As,Ah --board 7c,8c,9c --opponents 2
//! Hand: One Pair
//! Win:  66.41%  Tie: 0.62%  Loss: 32.97%
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
use anyhow::Result;
use clap::Parser;
use std::time::Duration;

use showdown_equity::{CancelToken, EngineConfig, EquityRequest, compute_equity};
use showdown_server::protocol::OddsResponse;

#[derive(Debug, Parser)]
struct Cli {
    /// The hero hole cards as two comma separated codes, e.g. As,Ah.
    #[clap(long, value_delimiter = ',', num_args = 2)]
    hero: Vec<String>,
    /// The board cards as comma separated codes, e.g. 7c,8c,9c.
    #[clap(long, value_delimiter = ',', num_args = 0..=5, default_value = "")]
    board: Vec<String>,
    /// The number of opponents.
    #[clap(long, short, default_value_t = 1)]
    opponents: usize,
    /// Monte Carlo trials per sampled computation.
    #[clap(long, default_value_t = 100_000)]
    trials: u32,
    /// Fixed seed for reproducible sampling.
    #[clap(long)]
    seed: Option<u64>,
    /// Time budget in milliseconds.
    #[clap(long, default_value_t = 10_000)]
    timeout_ms: u64,
    /// Print the reply as the service JSON document.
    #[clap(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let hero = [cli.hero[0].clone(), cli.hero[1].clone()];
    let board = cli
        .board
        .iter()
        .filter(|code| !code.is_empty())
        .cloned()
        .collect::<Vec<_>>();

    let request = EquityRequest::from_codes(&hero, &board, cli.opponents)?;
    let config = EngineConfig {
        trials: cli.trials,
        seed: cli.seed,
        timeout: Some(Duration::from_millis(cli.timeout_ms)),
        ..EngineConfig::default()
    };

    let result = compute_equity(&request, &config, &CancelToken::new())?;

    if cli.json {
        println!("{}", serde_json::to_string(&OddsResponse::from(result))?);
    } else {
        println!("Hand: {}", result.hand_rank);
        println!(
            "Win:  {:.2}%  Tie: {:.2}%  Loss: {:.2}%",
            result.win * 100.0,
            result.tie * 100.0,
            result.loss * 100.0
        );
    }

    Ok(())
}
