// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Per client request orchestration.
//!
//! A [Session] keeps at most one authoritative computation in flight for its
//! client. Submitting a request while a computation is running cancels the
//! running one and makes the new request the authoritative one, latest
//! request wins, there is no queue. Completions carry the generation of the
//! request that produced them so a superseded result is discarded instead of
//! delivered.
use log::debug;
use std::sync::Arc;
use tokio::sync::mpsc;

use showdown_equity::{
    CancelToken, EngineConfig, EquityError, EquityRequest, EquityResult, compute_equity,
};

/// The compute seam used by a session.
///
/// The production function is the equity engine, tests inject a slow or
/// scripted computation.
pub type ComputeFn =
    dyn Fn(&EquityRequest, &CancelToken) -> Result<EquityResult, EquityError> + Send + Sync;

/// A finished computation tagged with its request generation.
#[derive(Debug)]
pub struct Completion {
    generation: u64,
    result: Result<EquityResult, EquityError>,
}

/// Orchestrates the computations of one client session.
pub struct Session {
    compute: Arc<ComputeFn>,
    completions_tx: mpsc::Sender<Completion>,
    generation: u64,
    inflight: Option<CancelToken>,
}

impl Session {
    /// Creates a session backed by the equity engine.
    pub fn new(config: EngineConfig, completions_tx: mpsc::Sender<Completion>) -> Self {
        let compute: Arc<ComputeFn> =
            Arc::new(move |request, cancel| compute_equity(request, &config, cancel));
        Self::with_compute(compute, completions_tx)
    }

    /// Creates a session with an injected compute function.
    pub fn with_compute(compute: Arc<ComputeFn>, completions_tx: mpsc::Sender<Completion>) -> Self {
        Self {
            compute,
            completions_tx,
            generation: 0,
            inflight: None,
        }
    }

    /// True while a computation is in flight.
    pub fn is_computing(&self) -> bool {
        self.inflight.is_some()
    }

    /// Submits a request, superseding any computation in flight.
    pub fn submit(&mut self, request: EquityRequest) {
        self.cancel_inflight();
        self.generation += 1;

        let generation = self.generation;
        let token = CancelToken::new();
        self.inflight = Some(token.clone());

        let compute = self.compute.clone();
        let completions_tx = self.completions_tx.clone();

        tokio::task::spawn_blocking(move || {
            let result = compute(&request, &token);
            // The receiver dropping on connection close is not an error.
            let _ = completions_tx.blocking_send(Completion { generation, result });
        });
    }

    /// Cancels the computation in flight, if any.
    pub fn cancel_inflight(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
    }

    /// Filters a completion, returning the result to deliver to the client.
    ///
    /// A completion from a superseded generation, or a computation that
    /// observed its cancellation, yields nothing, its counters never reach
    /// the client.
    pub fn take(&mut self, completion: Completion) -> Option<Result<EquityResult, EquityError>> {
        if completion.generation != self.generation {
            debug!(
                "discarding completion for generation {} superseded by {}",
                completion.generation, self.generation
            );
            return None;
        }

        self.inflight = None;
        match completion.result {
            Err(EquityError::Cancelled) => None,
            result => Some(result),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // A session dropped mid computation stops it instead of letting it
        // run to completion for nobody.
        self.cancel_inflight();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showdown_equity::HandRank;
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        thread,
        time::Duration,
    };

    fn request(opponents: usize) -> EquityRequest {
        EquityRequest::from_codes(&["As", "Ah"], &[], opponents).unwrap()
    }

    fn result(win: f64) -> EquityResult {
        EquityResult {
            win,
            tie: 0.0,
            loss: 1.0 - win,
            hand_rank: HandRank::OnePair,
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn latest_request_wins() {
        // A slow first computation that honors its token, and a fast second
        // one, keyed by the opponents count.
        let saw_cancel = Arc::new(AtomicBool::new(false));
        let saw_cancel_compute = saw_cancel.clone();

        let compute: Arc<ComputeFn> = Arc::new(move |request, cancel| {
            if request.opponents == 1 {
                for _ in 0..10_000 {
                    if cancel.is_cancelled() {
                        saw_cancel_compute.store(true, Ordering::Relaxed);
                        return Err(EquityError::Cancelled);
                    }

                    thread::sleep(Duration::from_millis(1));
                }

                Ok(result(0.0))
            } else {
                Ok(result(1.0))
            }
        });

        let (completions_tx, mut completions_rx) = mpsc::channel(16);
        let mut session = Session::with_compute(compute, completions_tx);

        // The second request supersedes the first while it is computing.
        session.submit(request(1));
        assert!(session.is_computing());
        session.submit(request(2));

        // Both computations complete, in any order, only the second one is
        // delivered.
        let mut delivered = Vec::new();
        for _ in 0..2 {
            let completion = completions_rx.recv().await.unwrap();
            if let Some(result) = session.take(completion) {
                delivered.push(result);
            }
        }

        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].as_ref().unwrap().win, 1.0);
        assert!(!session.is_computing());

        // The superseded computation observed its cancellation instead of
        // running to completion.
        assert!(saw_cancel.load(Ordering::Relaxed));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn forwards_current_errors() {
        let compute: Arc<ComputeFn> =
            Arc::new(|_, _| Err(EquityError::Timeout(Duration::from_millis(5))));

        let (completions_tx, mut completions_rx) = mpsc::channel(16);
        let mut session = Session::with_compute(compute, completions_tx);

        session.submit(request(1));
        let completion = completions_rx.recv().await.unwrap();

        let result = session.take(completion).unwrap();
        assert_eq!(
            result.unwrap_err(),
            EquityError::Timeout(Duration::from_millis(5))
        );
        assert!(!session.is_computing());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delivers_results_through_the_engine() {
        let config = EngineConfig {
            tasks: 2,
            seed: Some(7),
            ..EngineConfig::default()
        };

        let (completions_tx, mut completions_rx) = mpsc::channel(16);
        let mut session = Session::new(config, completions_tx);

        session.submit(request(1));
        let completion = completions_rx.recv().await.unwrap();

        let result = session.take(completion).unwrap().unwrap();
        assert_eq!(result.hand_rank, HandRank::OnePair);
        assert!(result.win > 0.8);
    }
}
