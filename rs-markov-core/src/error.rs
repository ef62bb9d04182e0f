use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading a transition table or sampling from it.
///
/// Loader variants abort construction entirely: a failed load never leaves
/// a partially filled matrix behind. Sampler variants are per-call and
/// recoverable, the engine state is left untouched.
#[derive(Error, Debug)]
pub enum MarkovError {
	/// The transition table file does not exist.
	#[error("file not found: {}", .path.display())]
	FileNotFound { path: PathBuf },

	/// Propagated I/O error (read failure mid-file, cache write failure).
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// The file holds more rows or columns than the declared dimensions.
	/// `column` is the first overflowing cell, or 0 when a whole row
	/// overflows the gram capacity.
	#[error("capacity exceeded in {}: row {row}, column {column}, declared capacity {declared}", .path.display())]
	CapacityExceeded {
		path: PathBuf,
		row: usize,
		column: usize,
		declared: usize,
	},

	/// Non-positive `order`/`n_states`, or dimensions too large to hold.
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),

	/// Sampling hit a row with no usable weights.
	#[error("empty row for gram {gram:?} at index {index}")]
	EmptyRow { gram: String, index: usize },

	/// Binary cache codec failure.
	#[error("cache codec error: {0}")]
	Cache(#[from] postcard::Error),
}
