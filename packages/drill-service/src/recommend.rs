mod candidate;
mod fallback;
mod reference;
mod scorer;

pub use candidate::{CandidateRecord, generate_candidates};
pub use fallback::rank_by_tags;
pub use reference::{EmbeddingReference, References, build_references, tag_reference};
pub use scorer::{cmp_f32_desc, cosine_similarity, score_candidate, tag_overlap};

use serde::Serialize;

use crate::{Error, Result, VectorIndex};
use drill_domain::{ProblemId, ProblemPool, normalize_difficulty};

/// Most recent solved problems whose embeddings form the reference vector.
pub const EMBEDDING_REFERENCE_DEPTH: usize = 2;
/// Most recent solved problems whose tags form the reference tag list.
pub const TAG_REFERENCE_DEPTH: usize = 5;
pub const SIMILARITY_WEIGHT: f32 = 0.4;
pub const TAG_WEIGHT: f32 = 0.6;
/// Similarity assigned to every candidate when there is no reference vector.
pub const NEUTRAL_SIMILARITY: f32 = 0.5;
pub const COSINE_EPSILON: f32 = 1e-6;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoredCandidate {
	pub problem_id: ProblemId,
	pub position: usize,
	pub score: f32,
	pub similarity_score: f32,
	pub tag_score: f32,
	pub tags: Vec<String>,
	pub difficulty: String,
}

pub struct RecommendArgs<'a> {
	/// Solved problem ids, most recent last. `None` means the user has no profile.
	pub history: Option<&'a [ProblemId]>,
	pub difficulty: &'a str,
	/// Working problem list; must use the ordering `index` was built against.
	pub pool: &'a ProblemPool,
	pub index: &'a dyn VectorIndex,
	pub top_k: usize,
	pub candidate_pool_size: usize,
}

/// Scores and orders candidates for one user. Equal scores keep candidate order.
pub async fn rerank(args: RecommendArgs<'_>) -> Result<Vec<ScoredCandidate>> {
	let RecommendArgs { history, difficulty, pool, index, top_k, candidate_pool_size } = args;
	let difficulty = normalize_difficulty(difficulty);

	if difficulty.is_empty() {
		return Err(Error::InvalidRequest { message: "difficulty must be non-empty.".to_string() });
	}

	let Some(history) = history else { return Ok(Vec::new()) };

	if pool.is_empty() || top_k == 0 {
		return Ok(Vec::new());
	}

	let references = build_references(history, pool, index.dimensions())?;
	let candidates =
		generate_candidates(&references.embedding, pool, index, candidate_pool_size).await?;
	let candidate_count = candidates.len();
	let mut scored = Vec::with_capacity(candidate_count);

	for candidate in &candidates {
		if let Some(item) = score_candidate(candidate, &difficulty, &references)? {
			scored.push(item);
		}
	}

	tracing::debug!(
		reference = references.embedding.label(),
		reference_tags = references.tags.len(),
		candidates = candidate_count,
		kept = scored.len(),
		difficulty = difficulty.as_str(),
		"Scored recommendation candidates."
	);

	scored.sort_by(|left, right| cmp_f32_desc(left.score, right.score));
	scored.truncate(top_k);

	Ok(scored)
}

/// [`rerank`] reduced to problem ids in rank order.
pub async fn recommend(args: RecommendArgs<'_>) -> Result<Vec<ProblemId>> {
	let scored = rerank(args).await?;

	Ok(scored.into_iter().map(|candidate| candidate.problem_id).collect())
}
