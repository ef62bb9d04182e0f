use std::path::Path;

use crate::error::MarkovError;
use crate::model::matrix::ProbabilityMatrix;
use crate::model::report;
use crate::model::sampler::{self, RandomSource, ThreadSource};

/// File-backed Markov-chain engine owning one transition table and the
/// active gram.
///
/// # Responsibilities
/// - Fail-fast construction: a failed load leaves no engine behind
/// - One weighted-random transition per `trigger` call
/// - Read-only state reporting at any time
///
/// # Invariants
/// - `current_gram_index` starts at row 0 and is mutated only by a
///   successful `trigger` or an explicit `reset`
/// - A failed `trigger` leaves the index untouched; the call is recoverable
pub struct MarkovEngine {
	matrix: ProbabilityMatrix,
	current_gram_index: usize,
	source: Box<dyn RandomSource>,
}

impl MarkovEngine {
	/// Opens an engine over the transition table at `path`, sampling with
	/// the thread-local generator.
	///
	/// # Errors
	/// Everything the loader reports: `InvalidConfiguration`,
	/// `FileNotFound`, `Io`, `CapacityExceeded`.
	pub fn open<P: AsRef<Path>>(path: P, order: usize, n_states: usize) -> Result<Self, MarkovError> {
		Self::open_with_source(path, order, n_states, Box::new(ThreadSource))
	}

	/// Opens an engine with an injected random source.
	///
	/// Pass an `RngSource` around a seeded generator to replay a session,
	/// or a scripted source in tests.
	pub fn open_with_source<P: AsRef<Path>>(
		path: P,
		order: usize,
		n_states: usize,
		source: Box<dyn RandomSource>,
	) -> Result<Self, MarkovError> {
		Ok(Self {
			matrix: ProbabilityMatrix::load(path, order, n_states)?,
			current_gram_index: 0,
			source,
		})
	}

	/// Opens an engine through the binary cache fast path, sampling with
	/// the thread-local generator.
	pub fn open_cached<P: AsRef<Path>>(path: P, order: usize, n_states: usize) -> Result<Self, MarkovError> {
		Ok(Self {
			matrix: ProbabilityMatrix::open_cached(path, order, n_states)?,
			current_gram_index: 0,
			source: Box::new(ThreadSource),
		})
	}

	/// Performs one weighted-random transition and returns the sampled
	/// symbol.
	///
	/// On success the gram window slides and the engine moves to the
	/// matching row (or stays, per the sampler's stay policy). On error the
	/// engine state is unchanged and the call may simply be retried.
	pub fn trigger(&mut self) -> Result<String, MarkovError> {
		let transition = sampler::step(&self.matrix, self.current_gram_index, self.source.as_mut())?;
		self.current_gram_index = transition.gram_index;
		Ok(self.matrix.alphabet()[transition.symbol_index].clone())
	}

	/// Renders the configuration, alphabet, gram labels and every weight
	/// cell as text lines. Read-only; two calls without an intervening
	/// `trigger` yield identical output.
	pub fn report_state(&self) -> impl Iterator<Item = String> + '_ {
		report::describe(&self.matrix, self.current_gram_index)
	}

	/// Returns the active gram to the first loaded row. Never invoked
	/// automatically.
	pub fn reset(&mut self) {
		self.current_gram_index = 0;
	}

	/// The loaded transition table.
	pub fn matrix(&self) -> &ProbabilityMatrix {
		&self.matrix
	}

	/// Row index of the active gram.
	pub fn current_gram_index(&self) -> usize {
		self.current_gram_index
	}

	/// Label of the active gram, `None` when no row was loaded.
	pub fn current_gram(&self) -> Option<&str> {
		self.matrix.gram_label(self.current_gram_index)
	}
}

#[cfg(test)]
mod tests {
	use std::path::Path;

	use super::*;

	struct SequenceSource {
		values: Vec<f64>,
		next: usize,
	}

	impl RandomSource for SequenceSource {
		fn next_uniform(&mut self) -> f64 {
			let value = self.values[self.next.min(self.values.len() - 1)];
			self.next += 1;
			value
		}
	}

	fn engine(lines: &[&str], order: usize, n_states: usize, script: &[f64]) -> MarkovEngine {
		let lines: Vec<String> = lines.iter().map(|line| (*line).to_owned()).collect();
		MarkovEngine {
			matrix: ProbabilityMatrix::from_lines(Path::new("fixture.csv"), &lines, order, n_states)
				.unwrap(),
			current_gram_index: 0,
			source: Box::new(SequenceSource { values: script.to_vec(), next: 0 }),
		}
	}

	const FIXTURE: [&str; 5] = [" ,a,b", "aa,1.0,0.0", "ab,0.0,1.0", "ba,1.0,0.0", "bb,0.0,1.0"];

	#[test]
	fn trigger_returns_the_symbol_and_slides_the_window() {
		let mut engine = engine(&FIXTURE, 2, 2, &[0.0]);
		assert_eq!(engine.current_gram(), Some("aa"));
		for _ in 0..4 {
			assert_eq!(engine.trigger().unwrap(), "a");
			assert_eq!(engine.current_gram(), Some("aa"));
		}
	}

	#[test]
	fn trigger_sequences_are_reproducible() {
		let script = [0.2, 0.8, 0.6, 0.1, 0.9, 0.4, 0.0, 0.7];
		let mut run = || -> Vec<String> {
			let mut engine = engine(&FIXTURE, 2, 2, &script);
			(0..script.len()).map(|_| engine.trigger().unwrap()).collect()
		};
		assert_eq!(run(), run());
	}

	#[test]
	fn failed_trigger_leaves_the_gram_unchanged() {
		let mut engine = engine(&[" ,a,b", "aa,0,1", "ab,0,0"], 2, 2, &[0.5]);
		assert_eq!(engine.trigger().unwrap(), "b");
		assert_eq!(engine.current_gram(), Some("ab"));

		// "ab" is all-zero, the trigger fails and the engine stays put
		assert!(matches!(engine.trigger(), Err(MarkovError::EmptyRow { .. })));
		assert_eq!(engine.current_gram(), Some("ab"));

		// still recoverable state, not poisoned
		assert!(engine.trigger().is_err());
	}

	#[test]
	fn report_is_idempotent_between_triggers() {
		let engine = engine(&FIXTURE, 2, 2, &[0.5]);
		let first: Vec<String> = engine.report_state().collect();
		let second: Vec<String> = engine.report_state().collect();
		assert_eq!(first, second);
		assert!(first[0].contains("current_gram=\"aa\""));
	}

	#[test]
	fn reset_returns_to_the_first_row() {
		let mut engine = engine(&[" ,a,b", "aa,0,1", "ab,0,1", "bb,0,1"], 2, 2, &[0.5]);
		engine.trigger().unwrap();
		engine.trigger().unwrap();
		assert_eq!(engine.current_gram(), Some("bb"));

		engine.reset();
		assert_eq!(engine.current_gram_index(), 0);
		assert_eq!(engine.current_gram(), Some("aa"));
	}
}
