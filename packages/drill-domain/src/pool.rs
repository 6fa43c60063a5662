use std::collections::HashMap;

use crate::{Problem, ProblemId};

/// Explicit mapping between index positions and problem ids.
///
/// Position `i` is the `i`-th entry of the working problem list the vector index was built
/// against. Keeping the mapping as a value makes that alignment a visible precondition.
#[derive(Clone, Debug, Default)]
pub struct PositionMap {
	ids: Vec<ProblemId>,
	positions: HashMap<ProblemId, usize>,
}
impl PositionMap {
	pub fn from_ids<I>(ids: I) -> Self
	where
		I: IntoIterator<Item = ProblemId>,
	{
		let ids: Vec<ProblemId> = ids.into_iter().collect();
		let mut positions = HashMap::with_capacity(ids.len());

		for (position, id) in ids.iter().enumerate() {
			positions.entry(*id).or_insert(position);
		}

		Self { ids, positions }
	}

	pub fn position_of(&self, id: ProblemId) -> Option<usize> {
		self.positions.get(&id).copied()
	}

	pub fn id_at(&self, position: usize) -> Option<ProblemId> {
		self.ids.get(position).copied()
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}
}

/// Immutable snapshot of the catalog for one recommendation call.
#[derive(Clone, Debug, Default)]
pub struct ProblemPool {
	problems: Vec<Problem>,
	positions: PositionMap,
}
impl ProblemPool {
	pub fn new(problems: Vec<Problem>) -> Self {
		let positions = PositionMap::from_ids(problems.iter().map(|problem| problem.id));

		Self { problems, positions }
	}

	pub fn problems(&self) -> &[Problem] {
		&self.problems
	}

	pub fn positions(&self) -> &PositionMap {
		&self.positions
	}

	pub fn get(&self, position: usize) -> Option<&Problem> {
		self.problems.get(position)
	}

	pub fn by_id(&self, id: ProblemId) -> Option<&Problem> {
		self.positions.position_of(id).and_then(|position| self.problems.get(position))
	}

	pub fn len(&self) -> usize {
		self.problems.len()
	}

	pub fn is_empty(&self) -> bool {
		self.problems.is_empty()
	}
}
