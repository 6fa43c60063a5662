use time::{Duration, OffsetDateTime, macros::datetime};

use drill_domain::{Problem, ProblemId, ProblemPool};

const EPOCH: OffsetDateTime = datetime!(2025-01-01 00:00 UTC);

pub fn problem(id: ProblemId, difficulty: &str, tags: &[&str]) -> Problem {
	Problem {
		id,
		title: format!("Problem {id}"),
		tags: tags.iter().map(|tag| tag.to_string()).collect(),
		difficulty: difficulty.to_string(),
		embedding: None,
		popularity: 0,
		created_at: EPOCH + Duration::days(id),
	}
}

pub fn embedded(
	id: ProblemId,
	difficulty: &str,
	tags: &[&str],
	embedding: impl Into<Vec<f32>>,
) -> Problem {
	Problem { embedding: Some(embedding.into()), ..problem(id, difficulty, tags) }
}

pub fn with_popularity(mut problem: Problem, popularity: u64) -> Problem {
	problem.popularity = popularity;

	problem
}

pub fn created_at(mut problem: Problem, created_at: OffsetDateTime) -> Problem {
	problem.created_at = created_at;

	problem
}

/// Unit vector along `axis` in `dimensions` space.
pub fn axis(dimensions: usize, axis: usize) -> Vec<f32> {
	let mut out = vec![0.0; dimensions];

	if let Some(slot) = out.get_mut(axis) {
		*slot = 1.0;
	}

	out
}

pub fn pool(problems: Vec<Problem>) -> ProblemPool {
	ProblemPool::new(problems)
}

/// One index vector per pool position. Problems without an embedding get a zero vector so
/// index positions keep addressing the same problems as the pool.
pub fn embeddings(pool: &ProblemPool) -> Vec<Vec<f32>> {
	let dimensions = pool
		.problems()
		.iter()
		.find_map(|problem| problem.embedding.as_ref().map(Vec::len))
		.unwrap_or(0);

	pool.problems()
		.iter()
		.map(|problem| problem.embedding.clone().unwrap_or_else(|| vec![0.0; dimensions]))
		.collect()
}
