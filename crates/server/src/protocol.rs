// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Wire types for the equity service.
//!
//! Requests and replies are single JSON lines. Card codes are two character
//! strings, rank then suit, e.g. `"Ah"` or `"Td"`.
use serde::{Deserialize, Serialize};

use showdown_equity::{EquityError, EquityRequest, EquityResult};

/// An equity request from a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsRequest {
    /// The hero hole card codes.
    pub hero_cards: [String; 2],
    /// The revealed board card codes.
    #[serde(default)]
    pub board: Vec<String>,
    /// The number of opponents.
    pub opponents: usize,
}

impl OddsRequest {
    /// Parses the card codes into an engine request.
    pub fn to_request(&self) -> Result<EquityRequest, EquityError> {
        EquityRequest::from_codes(&self.hero_cards, &self.board, self.opponents)
    }
}

/// An equity reply to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsResponse {
    /// Probability the hero wins the showdown.
    pub win: f64,
    /// Probability the hero ties the best opponent.
    pub tie: f64,
    /// Probability the hero loses the showdown.
    pub loss: f64,
    /// The label of the hero hand as currently visible.
    pub hand_rank: String,
}

impl From<EquityResult> for OddsResponse {
    fn from(result: EquityResult) -> Self {
        Self {
            win: result.win,
            tie: result.tie,
            loss: result.loss,
            hand_rank: result.hand_rank.label().to_string(),
        }
    }
}

/// A structured error reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// The error details.
    pub error: ErrorBody,
}

/// The error details of an [ErrorResponse].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// The stable error kind.
    pub kind: String,
    /// A human readable message.
    pub message: String,
}

impl ErrorResponse {
    /// An invalid request error with the given message.
    pub fn invalid_request(message: String) -> Self {
        Self {
            error: ErrorBody {
                kind: "InvalidRequest".to_string(),
                message,
            },
        }
    }
}

impl From<&EquityError> for ErrorResponse {
    fn from(err: &EquityError) -> Self {
        Self {
            error: ErrorBody {
                kind: err.kind().to_string(),
                message: err.to_string(),
            },
        }
    }
}
