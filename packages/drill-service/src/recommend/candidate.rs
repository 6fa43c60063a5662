use std::collections::HashSet;

use super::EmbeddingReference;
use crate::{Result, VectorIndex};
use drill_domain::{ProblemId, ProblemPool, normalize_difficulty};

/// A working-list entry proposed for scoring.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateRecord<'a> {
	pub problem_id: ProblemId,
	pub position: usize,
	pub tags: &'a [String],
	/// Difficulty label in [`normalize_difficulty`] form.
	pub difficulty: String,
	pub embedding: Option<&'a [f32]>,
}

/// Nearest neighbors of the reference vector, or the head of the pool on cold start.
pub async fn generate_candidates<'a>(
	reference: &EmbeddingReference,
	pool: &'a ProblemPool,
	index: &dyn VectorIndex,
	pool_size: usize,
) -> Result<Vec<CandidateRecord<'a>>> {
	if pool_size == 0 || pool.is_empty() {
		return Ok(Vec::new());
	}

	let Some(query) = reference.vector() else {
		return Ok((0..pool.len().min(pool_size))
			.filter_map(|position| record_at(pool, position))
			.collect());
	};
	let positions = index.nearest(query, pool_size).await?;
	let mut seen = HashSet::with_capacity(positions.len());
	let mut out = Vec::with_capacity(positions.len());

	for position in positions {
		if !seen.insert(position) {
			continue;
		}

		let Some(record) = record_at(pool, position) else {
			tracing::warn!(
				position,
				pool_len = pool.len(),
				"Skipping index position outside the working problem list."
			);

			continue;
		};

		out.push(record);

		if out.len() == pool_size {
			break;
		}
	}

	Ok(out)
}

fn record_at(pool: &ProblemPool, position: usize) -> Option<CandidateRecord<'_>> {
	let problem_id = pool.positions().id_at(position)?;
	let problem = pool.get(position)?;

	Some(CandidateRecord {
		problem_id,
		position,
		tags: &problem.tags,
		difficulty: normalize_difficulty(&problem.difficulty),
		embedding: problem.embedding.as_deref(),
	})
}
