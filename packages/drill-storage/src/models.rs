use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct ProblemRow {
	pub problem_id: i64,
	pub title: String,
	pub difficulty: String,
	pub tags: Vec<String>,
	pub submissions: i64,
	pub created_at: OffsetDateTime,
	/// Little-endian `f32` values.
	pub embedding: Option<Vec<u8>>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserProfileRow {
	pub user_id: i64,
	pub last_solved_ids: Vec<i64>,
	pub preferred_tags: Vec<String>,
}
