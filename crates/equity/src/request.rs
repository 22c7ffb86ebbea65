// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Equity request and result types.
use serde::{Deserialize, Serialize};
use std::fmt;

use showdown_cards::{Card, Deck};
use showdown_eval::{HandRank, HandValue};

use crate::error::EquityError;

/// A board revelation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Street {
    /// No board cards revealed.
    Preflop,
    /// The first three board cards.
    Flop,
    /// The fourth board card.
    Turn,
    /// The fifth board card.
    River,
}

impl Street {
    /// The street showing a board with the given number of cards.
    pub fn of_board(len: usize) -> Option<Street> {
        match len {
            0 => Some(Street::Preflop),
            3 => Some(Street::Flop),
            4 => Some(Street::Turn),
            5 => Some(Street::River),
            _ => None,
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let street = match self {
            Street::Preflop => "pre-flop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        };

        f.write_str(street)
    }
}

/// An equity computation request.
///
/// A request is an immutable value built per recalculation trigger and
/// consumed by exactly one engine invocation, the engine keeps no state
/// across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityRequest {
    /// The hero hole cards.
    pub hero: [Card; 2],
    /// The revealed board cards, 0, 3, 4, or 5 of them.
    pub board: Vec<Card>,
    /// The number of opponents holding random cards, at least 1.
    pub opponents: usize,
}

impl EquityRequest {
    /// Creates a request from the given cards.
    pub fn new(hero: [Card; 2], board: Vec<Card>, opponents: usize) -> Self {
        Self {
            hero,
            board,
            opponents,
        }
    }

    /// Creates a request by parsing card codes.
    ///
    /// Fails with [EquityError::InvalidCardCode] on a malformed code.
    pub fn from_codes<S>(hero: &[S; 2], board: &[S], opponents: usize) -> Result<Self, EquityError>
    where
        S: AsRef<str>,
    {
        let hero = [hero[0].as_ref().parse()?, hero[1].as_ref().parse()?];
        let board = board
            .iter()
            .map(|code| code.as_ref().parse())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(hero, board, opponents))
    }

    /// Validates the request and builds the deck of unseen cards.
    ///
    /// Checks the board length, the opponents count, duplicate cards across
    /// the hero cards and the board, and that enough cards remain to complete
    /// the board and deal every opponent.
    pub fn validate(&self) -> Result<Deck, EquityError> {
        let street = Street::of_board(self.board.len()).ok_or_else(|| {
            EquityError::InvalidRequest(format!(
                "board must have 0, 3, 4, or 5 cards, got {}",
                self.board.len()
            ))
        })?;

        if self.opponents == 0 {
            return Err(EquityError::InvalidRequest(
                "at least one opponent is required".to_string(),
            ));
        }

        let known = self
            .hero
            .iter()
            .chain(self.board.iter())
            .copied()
            .collect::<Vec<_>>();
        let deck = Deck::without(&known)?;

        let unknown = self.unknown_cards();
        if unknown > deck.len() {
            return Err(EquityError::InvalidRequest(format!(
                "not enough cards for {} opponents on the {street}",
                self.opponents
            )));
        }

        Ok(deck)
    }

    /// The number of cards to draw to reach a full showdown, the missing
    /// board cards plus two hole cards per opponent.
    pub fn unknown_cards(&self) -> usize {
        5 - self.board.len() + 2 * self.opponents
    }

    /// The rank of the hero hand as currently visible.
    ///
    /// Uses only the hero cards and the revealed board, before the flop the
    /// two hole cards alone make a pair or a high card.
    pub fn current_hand_rank(&self) -> HandRank {
        if self.board.is_empty() {
            if self.hero[0].rank() == self.hero[1].rank() {
                HandRank::OnePair
            } else {
                HandRank::HighCard
            }
        } else {
            let mut cards = [self.hero[0]; 7];
            cards[1] = self.hero[1];
            cards[2..2 + self.board.len()].copy_from_slice(&self.board);
            HandValue::eval(&cards[..2 + self.board.len()]).rank()
        }
    }
}

impl fmt::Display for EquityRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} [", self.hero[0], self.hero[1])?;
        for card in &self.board {
            write!(f, "{card}")?;
        }
        write!(f, "] vs {}", self.opponents)
    }
}

/// The outcome distribution of an equity request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityResult {
    /// Probability the hero beats every opponent.
    pub win: f64,
    /// Probability the hero ties the best opponent.
    pub tie: f64,
    /// Probability some opponent beats the hero.
    pub loss: f64,
    /// The rank of the hero hand as currently visible, not a simulated
    /// outcome.
    pub hand_rank: HandRank,
}

impl EquityResult {
    /// Builds a normalized result from outcome counts.
    pub(crate) fn from_counts(wins: u64, ties: u64, total: u64, hand_rank: HandRank) -> Self {
        let total = total as f64;
        let win = wins as f64 / total;
        let tie = ties as f64 / total;
        // The rounding residual goes to the loss bucket.
        let loss = (1.0 - win - tie).max(0.0);

        let result = Self {
            win,
            tie,
            loss,
            hand_rank,
        };
        debug_assert!(
            (result.win + result.tie + result.loss - 1.0).abs() < 1e-3,
            "unnormalized equity result {result:?}"
        );

        result
    }

    /// The conventional single number equity, wins plus half the ties.
    pub fn equity(&self) -> f64 {
        self.win + self.tie / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_parsing() {
        let request = EquityRequest::from_codes(&["As", "Ah"], &["7c", "8d", "Qs"], 2).unwrap();
        assert_eq!(request.hero[0].to_string(), "As");
        assert_eq!(request.board.len(), 3);
        assert_eq!(request.opponents, 2);
        assert_eq!(request.to_string(), "AsAh [7c8dQs] vs 2");

        let err = EquityRequest::from_codes(&["As", "Xx"], &[], 1).unwrap_err();
        assert_eq!(err.kind(), "InvalidCardCode");
    }

    #[test]
    fn unknown_cards_per_street() {
        let hero = ["As", "Ah"];
        let board = ["7c", "8d", "Qs", "2h", "2d"];

        for (len, unknown) in [(0, 7), (3, 4), (4, 3), (5, 2)] {
            let request = EquityRequest::from_codes(&hero, &board[..len], 1).unwrap();
            assert_eq!(request.unknown_cards(), unknown);
            request.validate().unwrap();
        }
    }

    #[test]
    fn current_hand_rank_per_street() {
        let request = EquityRequest::from_codes(&["As", "Ah"], &[], 1).unwrap();
        assert_eq!(request.current_hand_rank(), HandRank::OnePair);

        let request = EquityRequest::from_codes(&["As", "Kh"], &[], 1).unwrap();
        assert_eq!(request.current_hand_rank(), HandRank::HighCard);

        let request = EquityRequest::from_codes(&["As", "Ah"], &["Ad", "Kd", "2c"], 1).unwrap();
        assert_eq!(request.current_hand_rank(), HandRank::ThreeOfAKind);

        let request =
            EquityRequest::from_codes(&["As", "Ah"], &["Ad", "Kd", "2c", "2h"], 1).unwrap();
        assert_eq!(request.current_hand_rank(), HandRank::FullHouse);
    }

    #[test]
    fn street_of_board() {
        assert_eq!(Street::of_board(0), Some(Street::Preflop));
        assert_eq!(Street::of_board(3), Some(Street::Flop));
        assert_eq!(Street::of_board(4), Some(Street::Turn));
        assert_eq!(Street::of_board(5), Some(Street::River));
        assert_eq!(Street::of_board(2), None);
    }
}
