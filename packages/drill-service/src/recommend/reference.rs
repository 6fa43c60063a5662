use super::{EMBEDDING_REFERENCE_DEPTH, TAG_REFERENCE_DEPTH, scorer::validate_embedding};
use crate::Result;
use drill_domain::{Problem, ProblemId, ProblemPool};

/// Reference vector derived from solve history.
#[derive(Clone, Debug, PartialEq)]
pub enum EmbeddingReference {
	/// No solved problem with an embedding; candidates come from the cold-start prefix.
	NoHistory,
	Single(Vec<f32>),
	/// Element-wise mean of the two most recent embeddings.
	Dual(Vec<f32>),
}
impl EmbeddingReference {
	pub fn vector(&self) -> Option<&[f32]> {
		match self {
			Self::NoHistory => None,
			Self::Single(vector) | Self::Dual(vector) => Some(vector.as_slice()),
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			Self::NoHistory => "no_history",
			Self::Single(_) => "single",
			Self::Dual(_) => "dual",
		}
	}
}

#[derive(Clone, Debug)]
pub struct References {
	pub embedding: EmbeddingReference,
	/// Tags of the recent solves in history order. Duplicates are kept.
	pub tags: Vec<String>,
}

pub fn build_references(
	history: &[ProblemId],
	pool: &ProblemPool,
	dimensions: usize,
) -> Result<References> {
	let resolved = resolve(history, pool);
	let tags = window_tags(&resolved);
	let embedded: Vec<(ProblemId, &[f32])> = resolved
		.iter()
		.filter_map(|problem| problem.embedding.as_deref().map(|vector| (problem.id, vector)))
		.collect();
	let recent = &embedded[embedded.len().saturating_sub(EMBEDDING_REFERENCE_DEPTH)..];

	for (problem_id, vector) in recent {
		validate_embedding(*problem_id, vector, dimensions)?;
	}

	let embedding = match recent {
		[] => EmbeddingReference::NoHistory,
		[(_, only)] => EmbeddingReference::Single(only.to_vec()),
		_ => EmbeddingReference::Dual(mean(recent.iter().map(|(_, vector)| *vector))),
	};

	Ok(References { embedding, tags })
}

/// Tags of the most recent resolvable solves, flattened in history order.
pub fn tag_reference(history: &[ProblemId], pool: &ProblemPool) -> Vec<String> {
	window_tags(&resolve(history, pool))
}

fn resolve<'a>(history: &[ProblemId], pool: &'a ProblemPool) -> Vec<&'a Problem> {
	history.iter().filter_map(|id| pool.by_id(*id)).collect()
}

fn window_tags(resolved: &[&Problem]) -> Vec<String> {
	resolved[resolved.len().saturating_sub(TAG_REFERENCE_DEPTH)..]
		.iter()
		.flat_map(|problem| problem.tags.iter().cloned())
		.collect()
}

fn mean<'a, I>(vectors: I) -> Vec<f32>
where
	I: IntoIterator<Item = &'a [f32]>,
{
	let mut sums: Vec<f64> = Vec::new();
	let mut count = 0_usize;

	for vector in vectors {
		if sums.is_empty() {
			sums = vec![0.0; vector.len()];
		}

		for (sum, value) in sums.iter_mut().zip(vector) {
			*sum += f64::from(*value);
		}

		count += 1;
	}

	if count == 0 {
		return Vec::new();
	}

	sums.into_iter().map(|sum| (sum / count as f64) as f32).collect()
}
