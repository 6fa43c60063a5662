use crate::{
	Result,
	db::Db,
	models::{ProblemRow, UserProfileRow},
};

/// Loads the working problem list. The `problem_id` order is the order index positions refer to.
pub async fn fetch_problems(db: &Db) -> Result<Vec<ProblemRow>> {
	let rows = sqlx::query_as::<_, ProblemRow>(
		"\
SELECT problem_id, title, difficulty, tags, submissions, created_at, embedding
FROM problems
ORDER BY problem_id ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn fetch_user_profile(db: &Db, user_id: i64) -> Result<Option<UserProfileRow>> {
	let row = sqlx::query_as::<_, UserProfileRow>(
		"\
SELECT user_id, last_solved_ids, preferred_tags
FROM user_profiles
WHERE user_id = $1",
	)
	.bind(user_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}
