//! N-gram Markov-chain probability engine.
//!
//! This crate loads a stochastic transition table from a delimited text file
//! and performs weighted-random state transitions over a sliding context
//! window (a "gram"):
//! - Bounds-checked table loading with a binary cache fast path
//! - Weighted-random next-symbol sampling from an injected random source
//! - Read-only diagnostic reporting
//!
//! Host integration (event routing, scheduling, UI) stays outside: an
//! embedder constructs one engine per session and drives it through
//! `trigger`.

/// Typed errors for loading and sampling.
pub mod error;

/// Core matrix, sampler, engine and reporting logic.
pub mod model;

/// I/O utilities (file loading, cache path helper).
///
/// Not exposed
pub(crate) mod io;
