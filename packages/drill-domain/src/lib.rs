pub mod pool;
pub mod problem;
pub mod profile;

pub use pool::{PositionMap, ProblemPool};
pub use problem::{Difficulty, Problem, ProblemId, normalize_difficulty, normalize_tags};
pub use profile::{HISTORY_LIMIT, UserProfile};
