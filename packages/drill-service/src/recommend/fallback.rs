use std::{cmp::Reverse, collections::HashSet};

use drill_domain::{Problem, ProblemId};

/// Orders problems sharing at least one tag with `reference_tags`.
///
/// Sort keys: shared tag count descending, difficulty ascending, popularity descending, newest
/// first. Complete ties keep the input order.
pub fn rank_by_tags(reference_tags: &[String], problems: &[Problem]) -> Vec<ProblemId> {
	if reference_tags.is_empty() {
		return Vec::new();
	}

	let reference: HashSet<&str> = reference_tags.iter().map(String::as_str).collect();
	let mut matched: Vec<(usize, &Problem)> = problems
		.iter()
		.filter_map(|problem| {
			let shared = problem
				.tags
				.iter()
				.map(String::as_str)
				.collect::<HashSet<_>>()
				.intersection(&reference)
				.count();

			(shared > 0).then_some((shared, problem))
		})
		.collect();

	matched.sort_by_key(|(shared, problem)| {
		(Reverse(*shared), problem.severity(), Reverse(problem.popularity), Reverse(problem.created_at))
	});

	matched.into_iter().map(|(_, problem)| problem.id).collect()
}
