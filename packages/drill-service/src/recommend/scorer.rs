use std::{cmp::Ordering, collections::HashSet};

use super::{
	COSINE_EPSILON, CandidateRecord, NEUTRAL_SIMILARITY, References, SIMILARITY_WEIGHT,
	ScoredCandidate, TAG_WEIGHT,
};
use crate::{Error, Result};
use drill_domain::ProblemId;

/// Scores one candidate, or returns `None` when it fails the difficulty filter.
///
/// `difficulty` must already be in [`normalize_difficulty`] form.
///
/// [`normalize_difficulty`]: drill_domain::normalize_difficulty
pub fn score_candidate(
	candidate: &CandidateRecord<'_>,
	difficulty: &str,
	references: &References,
) -> Result<Option<ScoredCandidate>> {
	if candidate.difficulty != difficulty {
		return Ok(None);
	}

	let similarity_score = match (references.embedding.vector(), candidate.embedding) {
		(None, _) => NEUTRAL_SIMILARITY,
		(Some(_), None) => 0.0,
		(Some(reference), Some(embedding)) => {
			validate_embedding(candidate.problem_id, embedding, reference.len())?;

			cosine_similarity(embedding, reference)
		},
	};
	let tag_score = tag_overlap(candidate.tags, &references.tags);

	Ok(Some(ScoredCandidate {
		problem_id: candidate.problem_id,
		position: candidate.position,
		score: SIMILARITY_WEIGHT * similarity_score + TAG_WEIGHT * tag_score,
		similarity_score,
		tag_score,
		tags: candidate.tags.to_vec(),
		difficulty: candidate.difficulty.clone(),
	}))
}

/// Cosine similarity clamped to `[0, 1]`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
	let mut dot = 0.0_f32;
	let mut norm_a = 0.0_f32;
	let mut norm_b = 0.0_f32;

	for (x, y) in a.iter().zip(b) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	let cosine = dot / (norm_a.sqrt() * norm_b.sqrt() + COSINE_EPSILON);

	if cosine.is_nan() { 0.0 } else { cosine.clamp(0.0, 1.0) }
}

/// Distinct shared tags over the length of the reference list, duplicates included.
pub fn tag_overlap(candidate_tags: &[String], reference_tags: &[String]) -> f32 {
	if reference_tags.is_empty() {
		return 0.0;
	}

	let candidate: HashSet<&str> = candidate_tags.iter().map(String::as_str).collect();
	let reference: HashSet<&str> = reference_tags.iter().map(String::as_str).collect();
	let shared = candidate.intersection(&reference).count();

	shared as f32 / reference_tags.len() as f32
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

pub(crate) fn validate_embedding(
	problem_id: ProblemId,
	embedding: &[f32],
	dimensions: usize,
) -> Result<()> {
	if embedding.len() != dimensions {
		return Err(Error::EmbeddingIncompatible {
			message: format!(
				"Problem {problem_id} has a {}-dimensional embedding; expected {dimensions}.",
				embedding.len()
			),
		});
	}
	if embedding.iter().any(|value| !value.is_finite()) {
		return Err(Error::EmbeddingIncompatible {
			message: format!("Problem {problem_id} has a non-finite embedding value."),
		});
	}

	Ok(())
}
