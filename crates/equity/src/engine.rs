// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Equity computation engine.
//!
//! The engine compares the hero hand against every opponent over all the
//! completions of the unknown cards. When the number of distinct deals is
//! within [EngineConfig::exact_threshold] it enumerates them exhaustively,
//! board completions first then each opponent two cards combination, above
//! the threshold it draws [EngineConfig::trials] uniform samples of the
//! unknown cards instead.
//!
//! Both paths fan out over scoped worker threads with independent counters
//! summed at the end, and check the cancellation token and the deadline
//! every batch of evaluations.
use log::debug;
use rand::prelude::*;
use std::{
    thread,
    time::{Duration, Instant},
};

use showdown_cards::{Card, Deck, combos};
use showdown_eval::HandValue;

use crate::{
    cancel::CancelToken,
    error::EquityError,
    request::{EquityRequest, EquityResult},
};

/// Evaluations between cancellation and deadline checks.
const CHECK_BATCH: u32 = 4096;

/// Tuning knobs for the equity engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Enumerate exhaustively up to this many deals.
    pub exact_threshold: u64,
    /// Monte Carlo trials above the exact threshold.
    pub trials: u32,
    /// Worker tasks for the enumeration and sampling loops.
    pub tasks: usize,
    /// Wall clock budget for one computation.
    pub timeout: Option<Duration>,
    /// Fixed seed for reproducible sampling, a fresh seed per run when None.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exact_threshold: 2_000_000,
            trials: 100_000,
            tasks: thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .min(8),
            timeout: Some(Duration::from_secs(5)),
            seed: None,
        }
    }
}

/// Outcome counters for one worker task.
#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    wins: u64,
    ties: u64,
    losses: u64,
}

impl Tally {
    fn total(&self) -> u64 {
        self.wins + self.ties + self.losses
    }

    fn merge(&mut self, other: Tally) {
        self.wins += other.wins;
        self.ties += other.ties;
        self.losses += other.losses;
    }
}

/// An abandoned computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    Cancelled,
    TimedOut,
}

/// Loop controls shared by all worker tasks.
#[derive(Clone, Copy)]
struct Controls<'a> {
    cancel: &'a CancelToken,
    deadline: Option<Instant>,
}

impl Controls<'_> {
    /// Counts one evaluation, checks the token and the deadline every
    /// [CHECK_BATCH] evaluations.
    #[inline]
    fn batch_check(&self, evals: &mut u32) -> Result<(), Interrupt> {
        *evals += 1;
        if *evals % CHECK_BATCH == 0 {
            if self.cancel.is_cancelled() {
                return Err(Interrupt::Cancelled);
            }

            if self.deadline.is_some_and(|d| Instant::now() >= d) {
                return Err(Interrupt::TimedOut);
            }
        }

        Ok(())
    }
}

/// Computes the win, tie, and loss probabilities for a request.
///
/// Validates the request before any work starts, then enumerates or samples
/// the unknown cards. Returns [EquityError::Cancelled] when the token fires
/// while computing, and [EquityError::Timeout] when the computation exceeds
/// the configured budget, in both cases no partial result leaks out.
pub fn compute_equity(
    request: &EquityRequest,
    config: &EngineConfig,
    cancel: &CancelToken,
) -> Result<EquityResult, EquityError> {
    let deck = request.validate()?;
    let hand_rank = request.current_hand_rank();

    if cancel.is_cancelled() {
        return Err(EquityError::Cancelled);
    }

    let controls = Controls {
        cancel,
        deadline: config.timeout.map(|t| Instant::now() + t),
    };

    let board_missing = 5 - request.board.len();
    let deals = deal_count(deck.len(), board_missing, request.opponents);

    let now = Instant::now();
    let outcome = if deals <= config.exact_threshold as u128 {
        debug!("{request}: enumerating {deals} deals");
        exact_tally(&deck, request, config, controls)
    } else {
        debug!("{request}: {deals} deals, sampling {} trials", config.trials);
        sample_tally(&deck, request, config, controls)
    };

    let tally = match outcome {
        Ok(tally) => tally,
        Err(Interrupt::Cancelled) => return Err(EquityError::Cancelled),
        Err(Interrupt::TimedOut) => {
            return Err(EquityError::Timeout(config.timeout.unwrap_or_default()));
        }
    };

    let result = EquityResult::from_counts(tally.wins, tally.ties, tally.total(), hand_rank);
    debug!(
        "{request}: win {:.4} tie {:.4} loss {:.4} in {:.3}s",
        result.win,
        result.tie,
        result.loss,
        now.elapsed().as_secs_f64()
    );

    Ok(result)
}

/// The number of distinct deals of the unknown cards, the board completions
/// times one two cards combination per opponent.
fn deal_count(deck: usize, board_missing: usize, opponents: usize) -> u128 {
    let mut total = combos::nck(deck, board_missing) as u128;
    let mut left = deck - board_missing;

    for _ in 0..opponents {
        total = total.saturating_mul(combos::nck(left, 2) as u128);
        left -= 2;
    }

    total
}

/// The deals left for the remaining opponents, used to count the outcomes
/// pruned by a short circuit in one step.
fn deals_for(mut left: usize, opponents: usize) -> u64 {
    let mut total = 1u64;
    for _ in 0..opponents {
        total *= combos::nck(left, 2);
        left -= 2;
    }

    total
}

/// Enumerates every deal of the unknown cards.
///
/// The first level of the enumeration, the board completions, or the first
/// opponent cards when the board is full, is split across the worker tasks
/// by nth subset offsets.
fn exact_tally(
    deck: &Deck,
    request: &EquityRequest,
    config: &EngineConfig,
    controls: Controls<'_>,
) -> Result<Tally, Interrupt> {
    let cards = deck.cards();
    let n = cards.len();
    let board_len = request.board.len();
    let board_missing = 5 - board_len;
    let opponents = request.opponents;

    // Hand layout shared by every evaluation, hole cards then the board.
    let mut hand = [request.hero[0]; 7];
    hand[1] = request.hero[1];
    hand[2..2 + board_len].copy_from_slice(&request.board);

    // On a full board the hero value is the same for every deal.
    let hero_full = (board_missing == 0).then(|| HandValue::eval(&hand));

    let split_k = if board_missing > 0 { board_missing } else { 2 };
    let level_total = combos::nck(n, split_k);
    let tasks = (config.tasks.max(1) as u64).min(level_total) as usize;
    let per_task = level_total.div_ceil(tasks as u64);

    let mut task_results = vec![Ok(Tally::default()); tasks];

    thread::scope(|s| {
        for (task, slot) in task_results.iter_mut().enumerate() {
            let hero = request.hero;
            let mut hand = hand;

            s.spawn(move || {
                let mut tally = Tally::default();
                let mut evals = 0u32;
                let mut interrupted = Ok(());

                combos::for_each_ksubset(
                    n,
                    split_k,
                    task as u64 * per_task,
                    per_task,
                    |positions| {
                        if interrupted.is_err() {
                            return;
                        }

                        let mut used = 0u64;
                        for &pos in positions {
                            used |= 1 << pos;
                        }

                        let res = match hero_full {
                            None => {
                                // Complete the board, evaluate the hero once
                                // per completion, then deal the opponents.
                                hand[0] = hero[0];
                                hand[1] = hero[1];
                                for (idx, &pos) in positions.iter().enumerate() {
                                    hand[2 + board_len + idx] = cards[pos];
                                }

                                let hero_value = HandValue::eval(&hand);
                                controls.batch_check(&mut evals).and_then(|_| {
                                    enum_opponents(
                                        cards, used, opponents, false, hero_value, &mut hand,
                                        &mut tally, &mut evals, controls,
                                    )
                                })
                            }
                            Some(hero_value) => {
                                // Full board, the split level holds the first
                                // opponent cards.
                                hand[0] = cards[positions[0]];
                                hand[1] = cards[positions[1]];
                                let value = HandValue::eval(&hand);
                                controls.batch_check(&mut evals).and_then(|_| {
                                    if value > hero_value {
                                        tally.losses += deals_for(n - 2, opponents - 1);
                                        Ok(())
                                    } else {
                                        enum_opponents(
                                            cards,
                                            used,
                                            opponents - 1,
                                            value == hero_value,
                                            hero_value,
                                            &mut hand,
                                            &mut tally,
                                            &mut evals,
                                            controls,
                                        )
                                    }
                                })
                            }
                        };

                        if res.is_err() {
                            interrupted = res;
                        }
                    },
                );

                *slot = interrupted.map(|_| tally);
            });
        }
    });

    let mut tally = Tally::default();
    for task_tally in task_results {
        tally.merge(task_tally?);
    }

    debug_assert_eq!(
        tally.total() as u128,
        deal_count(n, board_missing, opponents),
        "exact enumeration missed deals"
    );

    Ok(tally)
}

/// Walks every two cards combination for each remaining opponent, tallying
/// the hero outcome at the leaves.
///
/// Once an opponent beats the hero every completion below is a loss and is
/// counted without dealing the remaining opponents.
#[allow(clippy::too_many_arguments)]
fn enum_opponents(
    cards: &[Card],
    used: u64,
    remaining: usize,
    tied: bool,
    hero_value: HandValue,
    hand: &mut [Card; 7],
    tally: &mut Tally,
    evals: &mut u32,
    controls: Controls<'_>,
) -> Result<(), Interrupt> {
    if remaining == 0 {
        if tied {
            tally.ties += 1;
        } else {
            tally.wins += 1;
        }

        return Ok(());
    }

    let n = cards.len();
    let left = n - used.count_ones() as usize;

    for i in 0..n {
        if used & (1 << i) != 0 {
            continue;
        }

        for j in (i + 1)..n {
            if used & (1 << j) != 0 {
                continue;
            }

            hand[0] = cards[i];
            hand[1] = cards[j];
            let value = HandValue::eval(hand);
            controls.batch_check(evals)?;

            if value > hero_value {
                tally.losses += deals_for(left - 2, remaining - 1);
                continue;
            }

            enum_opponents(
                cards,
                used | (1 << i) | (1 << j),
                remaining - 1,
                tied || value == hero_value,
                hero_value,
                hand,
                tally,
                evals,
                controls,
            )?;
        }
    }

    Ok(())
}

/// Samples deals of the unknown cards with a partial Fisher-Yates shuffle.
///
/// Each sample draws the missing board cards and every opponent hole cards
/// in one uniform without replacement pass, trials are split across the
/// worker tasks each with its own generator.
fn sample_tally(
    deck: &Deck,
    request: &EquityRequest,
    config: &EngineConfig,
    controls: Controls<'_>,
) -> Result<Tally, Interrupt> {
    let n = deck.len();
    let board_len = request.board.len();
    let board_missing = 5 - board_len;
    let opponents = request.opponents;
    let draws = board_missing + 2 * opponents;

    let tasks = config.tasks.max(1);
    let trials = config.trials.max(1) as u64;

    let mut hand = [request.hero[0]; 7];
    hand[1] = request.hero[1];
    hand[2..2 + board_len].copy_from_slice(&request.board);

    let mut task_results = vec![Ok(Tally::default()); tasks];

    thread::scope(|s| {
        for (task, slot) in task_results.iter_mut().enumerate() {
            let hero = request.hero;
            let mut hand = hand;
            let seed = config.seed;

            s.spawn(move || {
                let task_trials = trials / tasks as u64 + u64::from((task as u64) < trials % tasks as u64);
                let mut rng = match seed {
                    Some(seed) => SmallRng::seed_from_u64(
                        seed.wrapping_add((task as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)),
                    ),
                    None => SmallRng::from_os_rng(),
                };

                let mut scratch = deck.cards().to_vec();
                let mut tally = Tally::default();
                let mut evals = 0u32;

                let outcome = (|| -> Result<(), Interrupt> {
                    for _ in 0..task_trials {
                        // Uniform without replacement draw of the unknown
                        // cards, the first cards complete the board and the
                        // next pairs go to the opponents in order.
                        for i in 0..draws {
                            let j = rng.random_range(i..n);
                            scratch.swap(i, j);
                        }

                        hand[0] = hero[0];
                        hand[1] = hero[1];
                        for idx in 0..board_missing {
                            hand[2 + board_len + idx] = scratch[idx];
                        }

                        let hero_value = HandValue::eval(&hand);
                        controls.batch_check(&mut evals)?;

                        let mut tied = false;
                        let mut lost = false;
                        for p in 0..opponents {
                            hand[0] = scratch[board_missing + 2 * p];
                            hand[1] = scratch[board_missing + 2 * p + 1];
                            let value = HandValue::eval(&hand);
                            controls.batch_check(&mut evals)?;

                            if value > hero_value {
                                lost = true;
                                break;
                            }

                            tied |= value == hero_value;
                        }

                        if lost {
                            tally.losses += 1;
                        } else if tied {
                            tally.ties += 1;
                        } else {
                            tally.wins += 1;
                        }
                    }

                    Ok(())
                })();

                *slot = outcome.map(|_| tally);
            });
        }
    });

    let mut tally = Tally::default();
    for task_tally in task_results {
        tally.merge(task_tally?);
    }

    Ok(tally)
}
