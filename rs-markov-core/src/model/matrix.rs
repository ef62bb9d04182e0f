use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::MarkovError;
use crate::io::{cache_path, read_file};

/// Field separators accepted in transition table files.
const DELIMITERS: [char; 2] = [',', ';'];

/// Stochastic transition table mapping each known gram to one weight per
/// alphabet element.
///
/// The table is built once from a delimited text file and never mutated
/// afterwards. Rows are addressed by the gram's position of first appearance
/// in the file, not by any combinatorial encoding of its symbols: only grams
/// that literally appear as row labels are stored, the theoretical gram
/// space (`n_states^order`) only bounds how many may appear.
///
/// # Responsibilities
/// - Parse the header row into the ordered alphabet
/// - Parse each data row into a gram label and its weight vector
/// - Guard every write against the declared capacity
/// - Re-serialize to the delimited format and to a compact binary cache
///
/// # Invariants
/// - `alphabet.len() == n_states`, missing header cells are stored empty
/// - `rows.len() == grams.len()` and `rows.len() <= capacity`
/// - `rows[i].len() == n_states` for every loaded row, whatever the file held
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ProbabilityMatrix {
	/// Context window length in symbols.
	order: usize,

	/// Number of alphabet elements, fixed row width.
	n_states: usize,

	/// Gram capacity, `n_states^order`.
	capacity: usize,

	/// Alphabet in header order. Empty entries mark absent header cells.
	alphabet: Vec<String>,

	/// Gram labels in first-appearance order.
	grams: Vec<String>,

	/// One weight vector per gram, indexed like `grams`.
	rows: Vec<Vec<f64>>,
}

impl ProbabilityMatrix {
	/// Loads a transition table from the delimited text file at `path`.
	///
	/// The file layout is one header row (ignored label cell, then up to
	/// `n_states` alphabet symbols) followed by one row per gram (label
	/// cell, then up to `n_states` weights). Commas and semicolons both
	/// separate fields, even mixed on one line; cells are trimmed; blank
	/// lines are skipped.
	///
	/// Tolerated input:
	/// - Unparseable or missing weight cells default to 0.0
	/// - A duplicate gram label keeps its first index, the later row
	///   silently overwrites the cells it provides
	///
	/// # Errors
	/// - `InvalidConfiguration` if `order` or `n_states` is 0, or the gram
	///   capacity `n_states^order` overflows
	/// - `FileNotFound` / `Io` if the file cannot be opened or read; a
	///   failed load never yields a partial matrix
	/// - `CapacityExceeded` if the file holds more distinct grams than the
	///   capacity, or more cells in a row than `n_states`
	pub fn load<P: AsRef<Path>>(path: P, order: usize, n_states: usize) -> Result<Self, MarkovError> {
		let path = path.as_ref();
		check_dimensions(order, n_states)?;

		let lines = read_file(path).map_err(|error| match error.kind() {
			std::io::ErrorKind::NotFound => MarkovError::FileNotFound { path: path.to_path_buf() },
			_ => MarkovError::Io(error),
		})?;

		Self::from_lines(path, &lines, order, n_states)
	}

	/// Loads through the sibling `.bin` postcard cache when possible.
	///
	/// A readable cache with matching dimensions is returned directly; a
	/// corrupt or mismatched cache is discarded with a warning. On a cache
	/// miss the text table is parsed and the cache (re)written for the next
	/// session.
	pub fn open_cached<P: AsRef<Path>>(path: P, order: usize, n_states: usize) -> Result<Self, MarkovError> {
		let path = path.as_ref();
		check_dimensions(order, n_states)?;

		let cache = cache_path(path)?;
		if cache.exists() {
			let bytes = std::fs::read(&cache)?;
			match postcard::from_bytes::<Self>(&bytes) {
				Ok(matrix) if matrix.order == order && matrix.n_states == n_states => {
					log::debug!("loaded {} grams from cache {}", matrix.rows.len(), cache.display());
					return Ok(matrix);
				}
				Ok(_) => log::warn!("discarding cache {}: dimensions do not match", cache.display()),
				Err(error) => log::warn!("discarding unreadable cache {}: {}", cache.display(), error),
			}
		}

		let matrix = Self::load(path, order, n_states)?;
		std::fs::write(&cache, postcard::to_stdvec(&matrix)?)?;
		Ok(matrix)
	}

	/// Parses the table from pre-split lines. `origin` only labels errors
	/// and diagnostics.
	pub(crate) fn from_lines(
		origin: &Path,
		lines: &[String],
		order: usize,
		n_states: usize,
	) -> Result<Self, MarkovError> {
		let capacity = check_dimensions(order, n_states)?;

		let mut matrix = Self {
			order,
			n_states,
			capacity,
			alphabet: vec![String::new(); n_states],
			grams: Vec::new(),
			rows: Vec::new(),
		};

		let mut seen_header = false;
		for (row_number, line) in lines.iter().enumerate() {
			let mut cells: Vec<&str> = line.split(DELIMITERS).map(str::trim).collect();
			// A trailing delimiter leaves empty cells behind
			while cells.last() == Some(&"") {
				cells.pop();
			}
			if cells.is_empty() {
				continue;
			}

			if !seen_header {
				matrix.read_header(origin, row_number, &cells)?;
				seen_header = true;
			} else {
				matrix.insert_row(origin, row_number, &cells)?;
			}
		}

		log::debug!(
			"loaded {} grams from {} (order={}, n_states={}, capacity={})",
			matrix.rows.len(),
			origin.display(),
			order,
			n_states,
			capacity
		);
		Ok(matrix)
	}

	/// Row 0: cell 0 is an ignored label, cells 1..=n_states define the
	/// alphabet in insertion order. No deduplication.
	fn read_header(&mut self, origin: &Path, row_number: usize, cells: &[&str]) -> Result<(), MarkovError> {
		if cells.len() > self.n_states + 1 {
			return Err(MarkovError::CapacityExceeded {
				path: origin.to_path_buf(),
				row: row_number,
				column: self.n_states + 1,
				declared: self.n_states,
			});
		}
		for (index, cell) in cells.iter().skip(1).enumerate() {
			self.alphabet[index] = (*cell).to_owned();
		}
		Ok(())
	}

	/// One data row: gram label, then its weights. First appearance wins the
	/// index, later duplicates overwrite the cells they provide.
	fn insert_row(&mut self, origin: &Path, row_number: usize, cells: &[&str]) -> Result<(), MarkovError> {
		if cells.len() > self.n_states + 1 {
			return Err(MarkovError::CapacityExceeded {
				path: origin.to_path_buf(),
				row: row_number,
				column: self.n_states + 1,
				declared: self.n_states,
			});
		}

		let label = cells[0];
		let index = match self.find_gram(label) {
			Some(index) => index,
			None => {
				if self.grams.len() >= self.capacity {
					return Err(MarkovError::CapacityExceeded {
						path: origin.to_path_buf(),
						row: row_number,
						column: 0,
						declared: self.capacity,
					});
				}
				self.grams.push(label.to_owned());
				self.rows.push(vec![0.0; self.n_states]);
				self.rows.len() - 1
			}
		};

		for (column, cell) in cells.iter().skip(1).enumerate() {
			// Unparseable cells stay at 0.0, like missing ones
			self.rows[index][column] = cell.parse::<f64>().unwrap_or(0.0);
		}

		Ok(())
	}

	/// Context window length in symbols.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of alphabet elements, the width of every row.
	pub fn n_states(&self) -> usize {
		self.n_states
	}

	/// Gram capacity derived from the declared dimensions, `n_states^order`.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Count of gram rows actually read, may be less than the capacity.
	pub fn n_grams(&self) -> usize {
		self.rows.len()
	}

	/// Alphabet in header order. Empty entries mark absent header cells.
	pub fn alphabet(&self) -> &[String] {
		&self.alphabet
	}

	/// Gram labels in first-appearance order.
	pub fn gram_labels(&self) -> &[String] {
		&self.grams
	}

	/// Label of the gram at `index`, if loaded.
	pub fn gram_label(&self, index: usize) -> Option<&str> {
		self.grams.get(index).map(String::as_str)
	}

	/// Weight row of the gram at `index`, if loaded.
	pub fn row(&self, index: usize) -> Option<&[f64]> {
		self.rows.get(index).map(Vec::as_slice)
	}

	/// Resolves a gram label to its row index.
	///
	/// Linear scan, first match wins, so duplicate labels keep resolving to
	/// the earliest index.
	pub fn find_gram(&self, label: &str) -> Option<usize> {
		self.grams.iter().position(|gram| gram == label)
	}

	/// Re-serializes the table to the delimited text format.
	///
	/// Header and row ordering reproduce the load order. Weights use the
	/// default float formatting, not the original spelling.
	pub fn to_delimited(&self) -> String {
		let mut out = String::new();
		out.push(' ');
		for symbol in &self.alphabet {
			out.push(',');
			out.push_str(symbol);
		}
		out.push('\n');
		for (label, row) in self.grams.iter().zip(&self.rows) {
			out.push_str(label);
			for weight in row {
				out.push(',');
				out.push_str(&weight.to_string());
			}
			out.push('\n');
		}
		out
	}
}

/// Validates the declared dimensions and derives the gram capacity.
fn check_dimensions(order: usize, n_states: usize) -> Result<usize, MarkovError> {
	if order == 0 || n_states == 0 {
		return Err(MarkovError::InvalidConfiguration(format!(
			"order and n_states must be positive, got order={} n_states={}",
			order, n_states
		)));
	}
	let exponent = u32::try_from(order).map_err(|_| {
		MarkovError::InvalidConfiguration(format!("order {} is too large", order))
	})?;
	n_states.checked_pow(exponent).ok_or_else(|| {
		MarkovError::InvalidConfiguration(format!(
			"gram capacity {}^{} does not fit in usize",
			n_states, order
		))
	})
}
