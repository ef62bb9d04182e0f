use crate::model::matrix::ProbabilityMatrix;

/// Marker printed in place of a value the matrix does not hold.
const ABSENT: &str = "(absent)";

/// Renders the matrix and the active gram as human-readable text lines.
///
/// Listed in order: the configuration, the full alphabet, every gram label,
/// then every `(gram, symbol) -> weight` cell. The returned iterator is
/// lazy, finite and read-only; calling `describe` again restarts the
/// listing. Safe on a partially loaded matrix: absent fields print an
/// explicit marker instead of panicking.
pub fn describe(
	matrix: &ProbabilityMatrix,
	current_gram_index: usize,
) -> impl Iterator<Item = String> + '_ {
	let configuration = std::iter::once(format!(
		"order={} n_states={} capacity={} grams_loaded={} current_gram={}",
		matrix.order(),
		matrix.n_states(),
		matrix.capacity(),
		matrix.n_grams(),
		matrix
			.gram_label(current_gram_index)
			.map_or_else(|| ABSENT.to_owned(), |label| format!("{:?}", label)),
	));

	let alphabet = matrix.alphabet().iter().enumerate().map(|(index, symbol)| {
		if symbol.is_empty() {
			format!("alphabet[{}]={}", index, ABSENT)
		} else {
			format!("alphabet[{}]={:?}", index, symbol)
		}
	});

	let grams = matrix
		.gram_labels()
		.iter()
		.enumerate()
		.map(|(index, label)| format!("gram[{}]={:?}", index, label));

	let cells = matrix.gram_labels().iter().enumerate().flat_map(move |(index, label)| {
		matrix.row(index).unwrap_or(&[]).iter().enumerate().map(move |(column, weight)| {
			match matrix.alphabet().get(column) {
				Some(symbol) if !symbol.is_empty() => {
					format!("weight[{:?}][{:?}]={}", label, symbol, weight)
				}
				_ => format!("weight[{:?}][{}]={}", label, ABSENT, weight),
			}
		})
	});

	configuration.chain(alphabet).chain(grams).chain(cells)
}

#[cfg(test)]
mod tests {
	use std::path::Path;

	use super::*;

	fn matrix(lines: &[&str], order: usize, n_states: usize) -> ProbabilityMatrix {
		let lines: Vec<String> = lines.iter().map(|line| (*line).to_owned()).collect();
		ProbabilityMatrix::from_lines(Path::new("fixture.csv"), &lines, order, n_states).unwrap()
	}

	#[test]
	fn lists_configuration_alphabet_grams_and_every_cell() {
		let fixture = matrix(&[" ,a,b", "aa,1,0", "ab,0,1"], 2, 2);
		let lines: Vec<String> = describe(&fixture, 0).collect();

		// 1 configuration + 2 alphabet + 2 grams + 2 * 2 cells
		assert_eq!(lines.len(), 9);
		assert_eq!(lines[0], "order=2 n_states=2 capacity=4 grams_loaded=2 current_gram=\"aa\"");
		assert_eq!(lines[1], "alphabet[0]=\"a\"");
		assert_eq!(lines[3], "gram[0]=\"aa\"");
		assert_eq!(lines[5], "weight[\"aa\"][\"a\"]=1");
		assert_eq!(lines[8], "weight[\"ab\"][\"b\"]=1");
	}

	#[test]
	fn restarting_yields_identical_output() {
		let fixture = matrix(&[" ,a,b", "aa,0.5,0.5", "ab,0,1"], 2, 2);
		let first: Vec<String> = describe(&fixture, 1).collect();
		let second: Vec<String> = describe(&fixture, 1).collect();
		assert_eq!(first, second);
	}

	#[test]
	fn absent_fields_are_marked_not_panicked_on() {
		// Header only, no gram rows, one missing alphabet cell
		let fixture = matrix(&[" ,a"], 2, 2);
		let lines: Vec<String> = describe(&fixture, 0).collect();

		assert_eq!(lines.len(), 3);
		assert!(lines[0].ends_with("current_gram=(absent)"));
		assert_eq!(lines[1], "alphabet[0]=\"a\"");
		assert_eq!(lines[2], "alphabet[1]=(absent)");
	}

	#[test]
	fn absent_symbol_cells_are_marked() {
		let fixture = matrix(&[" ,a", "aa,0.5,0.5"], 2, 2);
		let lines: Vec<String> = describe(&fixture, 0).collect();
		assert!(lines.contains(&"weight[\"aa\"][(absent)]=0.5".to_owned()));
	}
}
