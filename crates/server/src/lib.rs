// Copyright (C) 2025 Vince Vasta
// SPDX-License-Identifier: Apache-2.0

//! Showdown Poker equity server.
//!
//! Serves the equity engine over newline delimited JSON, one request per
//! line, one reply per authoritative computation. Each connection owns a
//! [session::Session] that keeps at most one computation in flight, a new
//! request supersedes the previous one.
#![warn(clippy::all, rust_2018_idioms, missing_docs)]
pub mod protocol;
pub mod server;
pub use server::{Config, run};
pub mod session;
