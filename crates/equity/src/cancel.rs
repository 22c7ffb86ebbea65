// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Cooperative cancellation for in flight computations.
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Cancellation signal shared with a running equity computation.
///
/// The engine checks the token between batches of evaluations and abandons
/// the computation with [EquityError::Cancelled](crate::EquityError::Cancelled)
/// when the token is cancelled, its partial counters are never merged into a
/// result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token in the not cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals the computation holding this token to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Checks if the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
