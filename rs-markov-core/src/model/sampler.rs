use rand::Rng;

use crate::error::MarkovError;
use crate::model::matrix::ProbabilityMatrix;

/// Uniform randomness injected into the sampler.
///
/// Implementations return draws in `[0, 1)`. Injecting the source keeps
/// sampling reproducible: tests script the exact draws, hosts that need
/// repeatable sessions wrap a seeded generator.
pub trait RandomSource {
	/// Next uniform draw in `[0, 1)`.
	fn next_uniform(&mut self) -> f64;
}

/// Default source backed by the thread-local generator.
pub struct ThreadSource;

impl RandomSource for ThreadSource {
	fn next_uniform(&mut self) -> f64 {
		rand::rng().random()
	}
}

/// Adapter exposing any `rand` generator as a `RandomSource`.
///
/// Wrap a seeded `StdRng` to replay a sampling session bit-for-bit.
pub struct RngSource<R: Rng>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
	fn next_uniform(&mut self) -> f64 {
		self.0.random()
	}
}

/// Outcome of one weighted-random transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
	/// Index of the sampled alphabet element.
	pub symbol_index: usize,

	/// Row index after sliding the gram window. Equal to the previous index
	/// when the new gram matched no row (stay policy).
	pub gram_index: usize,
}

/// Draws the next symbol from the current gram's row and slides the window.
///
/// # Behavior
/// - Draws `r` in `[0, 1)` and walks the row left to right; the first
///   element whose cumulative weight exceeds `r` is the sampled symbol, so
///   a leading 0.0 weight is never selected by `r = 0.0`.
/// - Rows are relied upon, not required, to sum to 1.0: when rounding
///   leaves the cumulative weight at or below `r` after the last element,
///   the last element is the defined fallback.
/// - The new gram drops the first character of the current gram and appends
///   the sampled symbol's first character, keeping the window at `order`
///   characters. Its row is found by linear scan over the labels, first
///   match wins.
/// - Stay policy: a gram with no matching row keeps `gram_index` at
///   `current_gram_index` and logs the miss; the sampled symbol still
///   stands. The chain resumes from the row it last matched.
///
/// # Errors
/// `EmptyRow` when the row is missing or holds no positive weight; the
/// caller's state is untouched.
pub fn step(
	matrix: &ProbabilityMatrix,
	current_gram_index: usize,
	source: &mut dyn RandomSource,
) -> Result<Transition, MarkovError> {
	let row = match matrix.row(current_gram_index) {
		Some(row) if row.iter().any(|weight| *weight > 0.0) => row,
		_ => {
			return Err(MarkovError::EmptyRow {
				gram: matrix.gram_label(current_gram_index).unwrap_or_default().to_owned(),
				index: current_gram_index,
			});
		}
	};

	let r = source.next_uniform();
	let mut cdf = 0.0;
	let mut symbol_index = row.len() - 1;
	for (index, weight) in row.iter().enumerate() {
		cdf += weight;
		if r < cdf {
			symbol_index = index;
			break;
		}
	}

	let gram_index = relocate(matrix, current_gram_index, symbol_index);
	Ok(Transition { symbol_index, gram_index })
}

/// Slides the gram window and resolves the resulting label to a row index.
fn relocate(matrix: &ProbabilityMatrix, current_gram_index: usize, symbol_index: usize) -> usize {
	let current = matrix.gram_label(current_gram_index).unwrap_or_default();
	let mut next_gram: String = current.chars().skip(1).collect();
	// An absent alphabet cell has no character to append; the shortened
	// gram then matches no label and the stay policy applies
	if let Some(character) = matrix.alphabet()[symbol_index].chars().next() {
		next_gram.push(character);
	}

	match matrix.find_gram(&next_gram) {
		Some(index) => index,
		None => {
			log::warn!("no row for gram {:?}, staying at {:?}", next_gram, current);
			current_gram_index
		}
	}
}
