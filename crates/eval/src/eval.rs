// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Poker hand evaluator.
//!
//! [HandValue::eval] maps a 5, 6, or 7 cards hand to a totally ordered value,
//! for 6 and 7 cards hands the value of the best 5 cards subset. The hand
//! category lives in the high bits and the tie break ranks in the nibbles
//! below, so comparing two values compares the hands with no ambiguity and
//! equal values are exactly tied hands.
use serde::{Deserialize, Serialize};
use std::fmt;

use showdown_cards::Card;

/// The rank of a poker hand, in increasing strength order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HandRank {
    /// No pair, value of the highest cards.
    HighCard = 0,
    /// Two cards of the same rank.
    OnePair,
    /// Two pairs of different ranks.
    TwoPair,
    /// Three cards of the same rank.
    ThreeOfAKind,
    /// Five cards of consecutive ranks, the wheel A-2-3-4-5 is the lowest.
    Straight,
    /// Five cards of the same suit.
    Flush,
    /// Three cards of one rank and two of another.
    FullHouse,
    /// Four cards of the same rank.
    FourOfAKind,
    /// A straight all of the same suit.
    StraightFlush,
}

impl HandRank {
    /// The human readable hand rank label.
    pub fn label(&self) -> &'static str {
        match self {
            HandRank::HighCard => "High Card",
            HandRank::OnePair => "One Pair",
            HandRank::TwoPair => "Two Pair",
            HandRank::ThreeOfAKind => "Three of a Kind",
            HandRank::Straight => "Straight",
            HandRank::Flush => "Flush",
            HandRank::FullHouse => "Full House",
            HandRank::FourOfAKind => "Four of a Kind",
            HandRank::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for HandRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rank masks for every straight, ace high down to the wheel, with the rank
/// of the straight high card.
const STRAIGHT_MASKS: [(u16, u8); 10] = [
    (0b1111100000000, 12), // A K Q J T
    (0b0111110000000, 11), // K Q J T 9
    (0b0011111000000, 10), // Q J T 9 8
    (0b0001111100000, 9),  // J T 9 8 7
    (0b0000111110000, 8),  // T 9 8 7 6
    (0b0000011111000, 7),  // 9 8 7 6 5
    (0b0000001111100, 6),  // 8 7 6 5 4
    (0b0000000111110, 5),  // 7 6 5 4 3
    (0b0000000011111, 4),  // 6 5 4 3 2
    (0b1000000001111, 3),  // 5 4 3 2 A (wheel)
];

/// A poker hand value.
///
/// Values order hands by strength, equal values are tied hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandValue(u32);

impl HandValue {
    /// Evaluates a 5, 6, or 7 cards hand.
    ///
    /// For 6 and 7 cards hands returns the value of the best 5 cards subset.
    /// The cards must be distinct. Panics if the hand has fewer than 5 or
    /// more than 7 cards.
    pub fn eval(cards: &[Card]) -> HandValue {
        assert!(
            (5..=7).contains(&cards.len()),
            "hand must have 5 to 7 cards"
        );

        let mut rank_counts = [0u8; 13];
        let mut suit_counts = [0u8; 4];
        let mut suit_masks = [0u16; 4];
        let mut rank_mask = 0u16;

        for c in cards {
            let r = c.rank_bits() as usize;
            // Suit bits are one of 0x1, 0x2, 0x4, 0x8.
            let s = c.suit_bits().trailing_zeros() as usize;
            rank_counts[r] += 1;
            suit_counts[s] += 1;
            suit_masks[s] |= 1 << r;
            rank_mask |= 1 << r;
        }

        // With 7 cards at most one suit can reach 5.
        let flush_suit = suit_counts.iter().position(|&c| c >= 5);

        if let Some(s) = flush_suit {
            if let Some(high) = straight_high(suit_masks[s]) {
                return Self::encode(HandRank::StraightFlush, &[high]);
            }
        }

        // Group the ranks by multiplicity, highest rank first. With at most
        // 7 cards there can be one quads, two trips, or three pairs.
        let mut quads = None;
        let mut trips = [0u8; 2];
        let mut ntrips = 0;
        let mut pairs = [0u8; 3];
        let mut npairs = 0;
        let mut singles = [0u8; 7];
        let mut nsingles = 0;

        for r in (0..13u8).rev() {
            match rank_counts[r as usize] {
                4 => quads = Some(r),
                3 => {
                    trips[ntrips] = r;
                    ntrips += 1;
                }
                2 => {
                    pairs[npairs] = r;
                    npairs += 1;
                }
                1 => {
                    singles[nsingles] = r;
                    nsingles += 1;
                }
                _ => {}
            }
        }

        if let Some(q) = quads {
            // The kicker is the best of the other ranks whatever their
            // multiplicity.
            let kicker = (0..13u8)
                .rev()
                .find(|&r| r != q && rank_counts[r as usize] > 0)
                .unwrap_or(0);
            return Self::encode(HandRank::FourOfAKind, &[q, kicker]);
        }

        if ntrips > 1 {
            // Two trips, the lower one plays as the pair.
            return Self::encode(HandRank::FullHouse, &[trips[0], trips[1]]);
        }

        if ntrips == 1 && npairs > 0 {
            return Self::encode(HandRank::FullHouse, &[trips[0], pairs[0]]);
        }

        if let Some(s) = flush_suit {
            return Self::encode(HandRank::Flush, &top_ranks::<5>(suit_masks[s]));
        }

        if let Some(high) = straight_high(rank_mask) {
            return Self::encode(HandRank::Straight, &[high]);
        }

        if ntrips == 1 {
            // No pairs here or it would be a full house.
            return Self::encode(HandRank::ThreeOfAKind, &[trips[0], singles[0], singles[1]]);
        }

        if npairs >= 2 {
            // A third pair only plays as a kicker.
            let mut kicker = if npairs > 2 { pairs[2] } else { 0 };
            if nsingles > 0 {
                kicker = kicker.max(singles[0]);
            }
            return Self::encode(HandRank::TwoPair, &[pairs[0], pairs[1], kicker]);
        }

        if npairs == 1 {
            return Self::encode(
                HandRank::OnePair,
                &[pairs[0], singles[0], singles[1], singles[2]],
            );
        }

        Self::encode(HandRank::HighCard, &singles[..5])
    }

    /// This hand value rank.
    pub fn rank(&self) -> HandRank {
        match self.0 >> 20 {
            0 => HandRank::HighCard,
            1 => HandRank::OnePair,
            2 => HandRank::TwoPair,
            3 => HandRank::ThreeOfAKind,
            4 => HandRank::Straight,
            5 => HandRank::Flush,
            6 => HandRank::FullHouse,
            7 => HandRank::FourOfAKind,
            8 => HandRank::StraightFlush,
            _ => panic!("Invalid hand value 0x{:x}", self.0),
        }
    }

    /// Encodes the rank and up to five tie break ranks, most significant
    /// first.
    fn encode(rank: HandRank, ranks: &[u8]) -> HandValue {
        let mut value = (rank as u32) << 20;
        for (i, &r) in ranks.iter().enumerate() {
            value |= (r as u32) << (16 - i * 4);
        }

        HandValue(value)
    }
}

/// Returns the high card rank of the best straight in a rank mask.
#[inline]
fn straight_high(mask: u16) -> Option<u8> {
    STRAIGHT_MASKS
        .iter()
        .find(|(m, _)| mask & m == *m)
        .map(|&(_, high)| high)
}

/// Extracts the N highest ranks set in a mask, in descending order.
fn top_ranks<const N: usize>(mask: u16) -> [u8; N] {
    let mut out = [0u8; N];
    let mut pos = 0;

    for r in (0..13u8).rev() {
        if pos == N {
            break;
        }

        if mask & (1 << r) != 0 {
            out[pos] = r;
            pos += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use showdown_cards::Deck;

    fn hand(codes: &str) -> Vec<Card> {
        codes
            .split_whitespace()
            .map(|c| c.parse().unwrap())
            .collect()
    }

    fn eval(codes: &str) -> HandValue {
        HandValue::eval(&hand(codes))
    }

    /// Brute force evaluation as the best 5 cards subset value.
    fn eval_best5(cards: &[Card]) -> HandValue {
        let n = cards.len();
        let mut best = None;

        for c1 in 0..n {
            for c2 in (c1 + 1)..n {
                for c3 in (c2 + 1)..n {
                    for c4 in (c3 + 1)..n {
                        for c5 in (c4 + 1)..n {
                            let subset =
                                [cards[c1], cards[c2], cards[c3], cards[c4], cards[c5]];
                            let value = HandValue::eval(&subset);
                            if best.is_none_or(|b| value > b) {
                                best = Some(value);
                            }
                        }
                    }
                }
            }
        }

        best.unwrap()
    }

    #[test]
    fn hand_categories() {
        assert_eq!(eval("Ah Kd Qc Js 9h").rank(), HandRank::HighCard);
        assert_eq!(eval("Ah Ad Qc Js 9h").rank(), HandRank::OnePair);
        assert_eq!(eval("Ah Ad Qc Qs 9h").rank(), HandRank::TwoPair);
        assert_eq!(eval("Ah Ad Ac Qs 9h").rank(), HandRank::ThreeOfAKind);
        assert_eq!(eval("Ah Kd Qc Js Th").rank(), HandRank::Straight);
        assert_eq!(eval("Ah Kh Qh Jh 9h").rank(), HandRank::Flush);
        assert_eq!(eval("Ah Ad Ac Qs Qh").rank(), HandRank::FullHouse);
        assert_eq!(eval("Ah Ad Ac As 9h").rank(), HandRank::FourOfAKind);
        assert_eq!(eval("Th 9h 8h 7h 6h").rank(), HandRank::StraightFlush);
    }

    #[test]
    fn quads_beat_full_house() {
        // Four equal ranks are always quads, never a full house.
        let quads = eval("7h 7d 7c 7s Ah");
        assert_eq!(quads.rank(), HandRank::FourOfAKind);
        assert!(quads > eval("Ah Ad Ac Ks Kh"));

        // Quads with a pair in seven cards keep the quads rank.
        let quads7 = eval("7h 7d 7c 7s Ah Ad 2c");
        assert_eq!(quads7.rank(), HandRank::FourOfAKind);
    }

    #[test]
    fn wheel_is_lowest_straight() {
        let wheel = eval("Ah 2d 3c 4s 5h");
        assert_eq!(wheel.rank(), HandRank::Straight);

        // Strictly weaker than the six high straight, strictly stronger than
        // any ace high without a straight.
        assert!(wheel < eval("2d 3c 4s 5h 6d"));
        assert!(wheel > eval("Ah Kd Qc Js 9h"));

        // Same for the steel wheel among straight flushes.
        let steel = eval("Ah 2h 3h 4h 5h");
        assert_eq!(steel.rank(), HandRank::StraightFlush);
        assert!(steel < eval("2h 3h 4h 5h 6h"));
    }

    #[test]
    fn ace_high_straight_uses_ace() {
        let broadway = eval("Ah Kd Qc Js Th");
        assert_eq!(broadway.rank(), HandRank::Straight);
        assert!(broadway > eval("Kd Qc Js Th 9h"));
    }

    #[test]
    fn kickers_break_ties() {
        // Higher kicker wins within the same category.
        assert!(eval("Ah Ad Kc Js 9h") > eval("As Ac Qc Js 9d"));
        assert!(eval("Ah Kd Qc Js 9h") > eval("Ah Kd Qc Js 8h"));
        assert!(eval("Ah Ad Qc Qs Kh") > eval("Ah Ad Qc Qs Jh"));

        // The pair rank dominates the kickers.
        assert!(eval("Kh Kd 2c 3s 4h") > eval("Qh Qd Ac Ks Jh"));
    }

    #[test]
    fn identical_hands_tie() {
        // Same ranks in different suits are exactly tied.
        assert_eq!(eval("Ah Kd Qc Js 9h"), eval("As Kh Qd Jc 9d"));
        assert_eq!(eval("Ah Ad Qc Qs Kh"), eval("Ac As Qh Qd Kd"));
    }

    #[test]
    fn total_order_on_disjoint_hands() {
        let hands = [
            "Ah Kd Qc Js 9h",
            "2h 2d 7c 8s 9d",
            "3h 3d 3c 8h 9s",
            "4d 5d 6d 7d 8d",
        ];

        for a in &hands {
            for b in &hands {
                let (va, vb) = (eval(a), eval(b));
                // Exactly one of <, ==, > holds.
                let cmps = [va < vb, va == vb, va > vb];
                assert_eq!(cmps.iter().filter(|&&c| c).count(), 1);
            }
        }
    }

    #[test]
    fn best_subset_of_six() {
        // The sixth card upgrades the hand only when it helps.
        assert_eq!(eval("Ah Ad Qc Js 9h 2d"), eval("Ah Ad Qc Js 9h"));
        assert_eq!(eval("Ah Ad Qc Js 9h Ac").rank(), HandRank::ThreeOfAKind);

        // Flush hidden in six cards.
        assert_eq!(eval("Ah Kh Qh Jh 2d 9h").rank(), HandRank::Flush);
    }

    #[test]
    fn best_subset_of_seven() {
        // Board pairs do not turn trips into a better category by accident.
        assert_eq!(eval("Ah Ad Ac Ks Qh Jd 9c").rank(), HandRank::ThreeOfAKind);

        // Full house from two trips picks the higher trips.
        let v = eval("9h 9d 9c 5s 5h 5d Ah");
        assert_eq!(v.rank(), HandRank::FullHouse);
        assert!(v > eval("5s 5h 5d 9h 9d Ah 2c"));

        // Straight over a pair on a seven cards hand.
        assert_eq!(eval("6h 7d 8c 9s Th 6d 2c").rank(), HandRank::Straight);
    }

    #[test]
    fn matches_brute_force_on_random_hands() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut cards = Deck::default().into_iter().collect::<Vec<_>>();

        for _ in 0..2_000 {
            cards.shuffle(&mut rng);
            assert_eq!(HandValue::eval(&cards[..7]), eval_best5(&cards[..7]));
            assert_eq!(HandValue::eval(&cards[..6]), eval_best5(&cards[..6]));
        }
    }

    #[test]
    fn five_cards_frequencies() {
        // Category counts over all C(52, 5) hands match the known values.
        let mut counts = [0u32; 9];
        Deck::default().for_each(5, |cards| {
            counts[HandValue::eval(cards).rank() as usize] += 1;
        });

        assert_eq!(counts[HandRank::HighCard as usize], 1_302_540);
        assert_eq!(counts[HandRank::OnePair as usize], 1_098_240);
        assert_eq!(counts[HandRank::TwoPair as usize], 123_552);
        assert_eq!(counts[HandRank::ThreeOfAKind as usize], 54_912);
        assert_eq!(counts[HandRank::Straight as usize], 10_200);
        assert_eq!(counts[HandRank::Flush as usize], 5_108);
        assert_eq!(counts[HandRank::FullHouse as usize], 3_744);
        assert_eq!(counts[HandRank::FourOfAKind as usize], 624);
        assert_eq!(counts[HandRank::StraightFlush as usize], 40);
        assert_eq!(counts.iter().sum::<u32>(), 2_598_960);
    }

    #[test]
    fn rank_labels() {
        assert_eq!(HandRank::HighCard.to_string(), "High Card");
        assert_eq!(HandRank::TwoPair.to_string(), "Two Pair");
        assert_eq!(HandRank::FullHouse.to_string(), "Full House");
        assert_eq!(HandRank::StraightFlush.to_string(), "Straight Flush");
    }
}
