use serde::{Deserialize, Serialize};

use crate::ProblemId;

/// Number of solved problems a profile remembers.
pub const HISTORY_LIMIT: usize = 5;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	pub user_id: i64,
	/// Most recent last.
	pub last_solved: Vec<ProblemId>,
	#[serde(default)]
	pub preferred_tags: Vec<String>,
}
impl UserProfile {
	pub fn new(user_id: i64) -> Self {
		Self { user_id, ..Default::default() }
	}

	/// Moves `problem_id` to the most recent slot and evicts the oldest entries past
	/// [`HISTORY_LIMIT`].
	pub fn record_solve(&mut self, problem_id: ProblemId) {
		self.last_solved.retain(|id| *id != problem_id);
		self.last_solved.push(problem_id);

		if self.last_solved.len() > HISTORY_LIMIT {
			let overflow = self.last_solved.len() - HISTORY_LIMIT;

			self.last_solved.drain(..overflow);
		}
	}
}
