// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Equity computation errors.
use std::time::Duration;

use showdown_cards::{DuplicateCard, InvalidCardCode};

/// An error from building or computing an equity request.
///
/// Validation errors are detected before any enumeration or sampling starts,
/// a failed request never produces a partial result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EquityError {
    /// A malformed card code.
    #[error(transparent)]
    InvalidCardCode(#[from] InvalidCardCode),
    /// The same card appears twice across the hero cards and the board.
    #[error(transparent)]
    DuplicateCard(#[from] DuplicateCard),
    /// The request shape is invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The computation exceeded its wall clock budget.
    #[error("computation timed out after {0:?}")]
    Timeout(Duration),
    /// The computation was cancelled by a newer request.
    #[error("computation cancelled")]
    Cancelled,
}

impl EquityError {
    /// A stable kind name for the wire protocol.
    pub fn kind(&self) -> &'static str {
        match self {
            EquityError::InvalidCardCode(_) => "InvalidCardCode",
            EquityError::DuplicateCard(_) => "DuplicateCard",
            EquityError::InvalidRequest(_) => "InvalidRequest",
            EquityError::Timeout(_) => "Timeout",
            EquityError::Cancelled => "Cancelled",
        }
    }
}
