// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker cards types.
//!
//! This crate defines the card model shared by the evaluator and the equity
//! engine. Cards parse from and format to the two-character codes used at the
//! service boundary:
//!
//! ```
//! # use showdown_cards::{Card, Rank, Suit};
//! let ah: Card = "Ah".parse().unwrap();
//! assert_eq!(ah, Card::new(Rank::Ace, Suit::Hearts));
//! assert_eq!(ah.to_string(), "Ah");
//! ```
//!
//! and a [Deck] holds the cards still unseen after removing the known ones:
//!
//! ```
//! # use showdown_cards::{Card, Deck};
//! let known = ["As".parse().unwrap(), "Ah".parse().unwrap()];
//! let deck = Deck::without(&known).unwrap();
//! assert_eq!(deck.len(), 50);
//! ```
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
mod cards;
pub use cards::{Card, Deck, DuplicateCard, InvalidCardCode, Rank, Suit};

pub mod combos;
