use crate::{Error, Result};
use drill_domain::{Problem, ProblemId, ProblemPool, UserProfile, normalize_tags};
use drill_storage::{
	db::Db,
	models::{ProblemRow, UserProfileRow},
	queries,
};

/// Loads the working problem list in index position order.
pub async fn load_pool(db: &Db) -> Result<ProblemPool> {
	let rows = queries::fetch_problems(db).await?;
	let problems = rows.into_iter().map(problem_from_row).collect::<Result<Vec<_>>>()?;

	Ok(ProblemPool::new(problems))
}

pub async fn load_profile(db: &Db, user_id: i64) -> Result<Option<UserProfile>> {
	let row = queries::fetch_user_profile(db, user_id).await?;

	Ok(row.map(profile_from_row))
}

pub fn problem_from_row(row: ProblemRow) -> Result<Problem> {
	let embedding = match row.embedding.as_deref() {
		Some(bytes) => decode_embedding(row.problem_id, bytes)?,
		None => None,
	};

	Ok(Problem {
		id: row.problem_id,
		title: row.title,
		tags: normalize_tags(row.tags),
		difficulty: row.difficulty,
		embedding,
		popularity: u64::try_from(row.submissions).unwrap_or(0),
		created_at: row.created_at,
	})
}

pub fn profile_from_row(row: UserProfileRow) -> UserProfile {
	UserProfile {
		user_id: row.user_id,
		last_solved: row.last_solved_ids,
		preferred_tags: normalize_tags(row.preferred_tags),
	}
}

/// Decodes little-endian `f32` bytes. Empty input means the problem has no embedding.
pub fn decode_embedding(problem_id: ProblemId, bytes: &[u8]) -> Result<Option<Vec<f32>>> {
	if bytes.is_empty() {
		return Ok(None);
	}

	let chunks = bytes.chunks_exact(4);

	if !chunks.remainder().is_empty() {
		return Err(Error::EmbeddingIncompatible {
			message: format!(
				"Problem {problem_id} embedding has {} bytes, not a multiple of 4.",
				bytes.len()
			),
		});
	}

	let mut out = Vec::with_capacity(bytes.len() / 4);

	for chunk in chunks {
		let value = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);

		if !value.is_finite() {
			return Err(Error::EmbeddingIncompatible {
				message: format!("Problem {problem_id} embedding contains a non-finite value."),
			});
		}

		out.push(value);
	}

	Ok(Some(out))
}
