use std::{cmp::Ordering, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Exact L2 nearest-neighbor index over position-addressed vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatIndex {
	dimensions: usize,
	vectors: Vec<Vec<f32>>,
}
impl FlatIndex {
	pub fn new(dimensions: usize, vectors: Vec<Vec<f32>>) -> Result<Self> {
		if dimensions == 0 {
			return Err(Error::InvalidArgument(
				"Index dimensions must be greater than zero.".to_string(),
			));
		}

		for (position, vector) in vectors.iter().enumerate() {
			if vector.len() != dimensions {
				return Err(Error::InvalidArgument(format!(
					"Vector at position {position} has {} dimensions; expected {dimensions}.",
					vector.len()
				)));
			}
			if vector.iter().any(|value| !value.is_finite()) {
				return Err(Error::InvalidArgument(format!(
					"Vector at position {position} contains a non-finite value."
				)));
			}
		}

		Ok(Self { dimensions, vectors })
	}

	pub fn load(path: &Path) -> Result<Self> {
		if !path.exists() {
			return Err(Error::NotFound(format!("Vector index {} is missing.", path.display())));
		}

		let raw =
			fs::read(path).map_err(|err| Error::Io { path: path.to_path_buf(), source: err })?;
		let decoded: Self = serde_json::from_slice(&raw)
			.map_err(|err| Error::Json { path: path.to_path_buf(), source: err })?;

		Self::new(decoded.dimensions, decoded.vectors)
	}

	pub fn save(&self, path: &Path) -> Result<()> {
		let raw = serde_json::to_vec(self)
			.map_err(|err| Error::Json { path: path.to_path_buf(), source: err })?;

		fs::write(path, raw).map_err(|err| Error::Io { path: path.to_path_buf(), source: err })
	}

	pub fn dimensions(&self) -> usize {
		self.dimensions
	}

	pub fn len(&self) -> usize {
		self.vectors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.vectors.is_empty()
	}

	/// Returns up to `k` `(position, squared_distance)` pairs, nearest first. Equal distances
	/// keep position order.
	pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>> {
		if query.len() != self.dimensions {
			return Err(Error::InvalidArgument(format!(
				"Query has {} dimensions; index expects {}.",
				query.len(),
				self.dimensions
			)));
		}
		if k == 0 || self.vectors.is_empty() {
			return Ok(Vec::new());
		}

		let mut scored: Vec<(usize, f32)> = self
			.vectors
			.iter()
			.enumerate()
			.map(|(position, vector)| (position, squared_l2(query, vector)))
			.collect();

		scored.sort_by(|left, right| left.1.partial_cmp(&right.1).unwrap_or(Ordering::Equal));
		scored.truncate(k);

		Ok(scored)
	}
}

fn squared_l2(left: &[f32], right: &[f32]) -> f32 {
	left.iter().zip(right).map(|(a, b)| (a - b) * (a - b)).sum()
}

#[cfg(test)]
mod tests {
	use std::{
		env,
		time::{SystemTime, UNIX_EPOCH},
	};

	use super::*;

	fn sample() -> FlatIndex {
		FlatIndex::new(
			2,
			vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 3.0], vec![1.0, 0.0], vec![5.0, 5.0]],
		)
		.expect("Valid index.")
	}

	#[test]
	fn search_orders_by_distance_then_position() {
		let hits = sample().search(&[1.0, 0.1], 3).expect("Search succeeds.");
		let positions: Vec<usize> = hits.iter().map(|(position, _)| *position).collect();

		assert_eq!(positions, vec![1, 3, 0]);
	}

	#[test]
	fn search_caps_at_index_size() {
		let hits = sample().search(&[0.0, 0.0], 50).expect("Search succeeds.");

		assert_eq!(hits.len(), 5);
	}

	#[test]
	fn search_rejects_wrong_dimensions() {
		let err = sample().search(&[0.0, 0.0, 0.0], 2).expect_err("Expected dimension error.");

		assert!(matches!(err, Error::InvalidArgument(_)), "Unexpected error: {err}");
	}

	#[test]
	fn new_rejects_ragged_vectors() {
		let err = FlatIndex::new(2, vec![vec![0.0, 0.0], vec![1.0]]).expect_err("Ragged input.");

		assert!(err.to_string().contains("position 1"), "Unexpected error: {err}");
	}

	#[test]
	fn load_reports_missing_file() {
		let path = env::temp_dir().join("drill_flat_index_missing.json");
		let err = FlatIndex::load(&path).expect_err("Expected missing index.");

		assert!(matches!(err, Error::NotFound(_)), "Unexpected error: {err}");
	}

	#[test]
	fn save_then_load_preserves_search_results() {
		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.expect("System time must be valid.")
			.as_nanos();
		let path = env::temp_dir().join(format!("drill_flat_index_{nanos}.json"));
		let index = sample();

		index.save(&path).expect("Save succeeds.");

		let loaded = FlatIndex::load(&path);

		fs::remove_file(&path).expect("Failed to remove test index.");

		let loaded = loaded.expect("Load succeeds.");

		assert_eq!(loaded.dimensions(), 2);
		assert_eq!(
			loaded.search(&[0.0, 2.5], 2).expect("Search succeeds."),
			index.search(&[0.0, 2.5], 2).expect("Search succeeds.")
		);
	}

	#[test]
	fn load_rejects_corrupt_file() {
		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.expect("System time must be valid.")
			.as_nanos();
		let path = env::temp_dir().join(format!("drill_flat_index_corrupt_{nanos}.json"));

		fs::write(&path, b"not json").expect("Failed to write corrupt index.");

		let result = FlatIndex::load(&path);

		fs::remove_file(&path).expect("Failed to remove test index.");

		assert!(matches!(result, Err(Error::Json { .. })));
	}
}
