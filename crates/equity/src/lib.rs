// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker equity engine.
//!
//! Given the hero hole cards, the revealed board, and a number of opponents
//! holding random cards, [compute_equity] returns the probabilities that the
//! hero wins, ties, or loses at showdown, with the rank of the hero hand as
//! currently visible:
//!
//! ```
//! # use showdown_equity::*;
//! let request = EquityRequest::from_codes(&["As", "Ah"], &["Ad", "Kd", "2c"], 1).unwrap();
//! let config = EngineConfig::default();
//! let result = compute_equity(&request, &config, &CancelToken::new()).unwrap();
//!
//! assert_eq!(result.hand_rank, HandRank::ThreeOfAKind);
//! assert!((result.win + result.tie + result.loss - 1.0).abs() < 1e-6);
//! ```
//!
//! The engine enumerates every deal of the unknown cards when the deal space
//! is small enough, and falls back to Monte Carlo sampling otherwise. Long
//! computations check a [CancelToken] and a wall clock budget cooperatively
//! so a superseded request stops early instead of running to completion.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod cancel;
mod engine;
mod error;
mod request;

pub use cancel::CancelToken;
pub use engine::{EngineConfig, compute_equity};
pub use error::EquityError;
pub use request::{EquityRequest, EquityResult, Street};

// Reexport cards and evaluator types.
pub use showdown_cards::{Card, Deck, Rank, Suit};
pub use showdown_eval::{HandRank, HandValue};
