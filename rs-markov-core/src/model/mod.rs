//! Top-level module for the Markov-chain probability engine.
//!
//! This module provides a file-backed probabilistic state machine, including:
//! - The stochastic transition table (`ProbabilityMatrix`)
//! - Weighted-random transition sampling (`sampler`)
//! - The stateful engine driven by external triggers (`MarkovEngine`)
//! - Human-readable state dumps (`report`)

/// Stateful engine owning one transition table and the active gram.
///
/// Exposes fail-fast construction, one weighted-random transition per
/// `trigger` call, and read-only state reporting.
pub mod engine;

/// Stochastic transition table mapping grams to per-symbol weights.
///
/// Handles delimited table parsing, capacity guarding, re-serialization
/// and the binary cache fast path.
pub mod matrix;

/// Diagnostic text rendering of a matrix and the active gram.
///
/// Pure and lazy; never mutates state.
pub mod report;

/// Weighted-random transition step and the injected randomness seam.
///
/// Defines `RandomSource` so tests can script draws and hosts can seed
/// reproducible sessions.
pub mod sampler;
