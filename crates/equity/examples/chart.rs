// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0
//
// Prints the pre-flop win probability chart for all 169 starting hands.
//
// ```bash
// $ cargo r --release --example chart -- --num-players 2
// ```
use clap::{Parser, value_parser};
use std::time::Instant;

use showdown_equity::*;

fn run_sim(c1: Card, c2: Card, opponents: usize, config: &EngineConfig) -> f64 {
    let request = EquityRequest::new([c1, c2], Vec::new(), opponents);
    let result = compute_equity(&request, config, &CancelToken::new())
        .expect("valid pre-flop request");
    result.win * 100.0
}

fn separator() {
    print!("|");
    for _ in 0..13 {
        print!("-----|");
    }
    println!();
}

#[derive(Debug, Parser)]
struct Cli {
    /// The number of opposing players.
    #[clap(long, short, default_value_t = 1, value_parser = value_parser!(u8).range(1..=6))]
    num_players: u8,
}

fn main() {
    let cli = Cli::parse();
    let opponents = cli.num_players as usize;
    let config = EngineConfig {
        trials: 25_000,
        timeout: None,
        ..EngineConfig::default()
    };

    separator();

    let now = Instant::now();

    for r1 in Rank::ranks().rev() {
        let mut labels = Vec::with_capacity(13);
        let mut probs = Vec::with_capacity(13);

        for r2 in Rank::ranks().rev() {
            let (c1, c2) = if r1 <= r2 {
                // Offsuit or pair
                (Card::new(r2, Suit::Hearts), Card::new(r1, Suit::Spades))
            } else {
                // Suited cards
                (Card::new(r1, Suit::Hearts), Card::new(r2, Suit::Hearts))
            };

            if c1.rank() == c2.rank() {
                labels.push(format!("{}{} ", c1.rank(), c2.rank()));
            } else if c1.suit() == c2.suit() {
                labels.push(format!("{}{}s", c1.rank(), c2.rank()));
            } else {
                labels.push(format!("{}{}o", c1.rank(), c2.rank()));
            }

            probs.push(run_sim(c1, c2, opponents, &config).round());
        }

        print!("|");
        for label in labels {
            print!(" {label} |");
        }

        println!();

        print!("|");
        for prob in &probs {
            print!(" {:2.0}% |", prob.ceil());
        }
        println!();

        separator();
    }

    println!("Elapsed: {:.3}s", now.elapsed().as_secs_f64());
}
