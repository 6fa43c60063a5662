use serde::{Deserialize, Serialize};

use crate::{
	Error, RecommendService, Result, VectorIndex, catalog,
	recommend::{self, RecommendArgs},
};
use drill_domain::{
	ProblemId, ProblemPool, UserProfile, normalize_difficulty, normalize_tags,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
	/// Embedding and tag reranking over index candidates.
	Personalized,
	/// Tag-only ranking because no usable index was available.
	TagFallback,
	/// The user has no profile.
	None,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RecommendRequest {
	pub user_id: i64,
	pub difficulty: Option<String>,
	pub top_k: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecommendResponse {
	pub user_id: i64,
	pub difficulty: String,
	pub source: RecommendationSource,
	pub problem_ids: Vec<ProblemId>,
}

pub struct RouteArgs<'a> {
	pub user_id: i64,
	pub profile: Option<&'a UserProfile>,
	pub difficulty: &'a str,
	pub pool: &'a ProblemPool,
	pub index: Option<&'a dyn VectorIndex>,
	pub top_k: usize,
	pub candidate_pool_size: usize,
}

/// Picks personalized ranking when an index is usable and tag-only ranking otherwise.
pub async fn route_recommendation(args: RouteArgs<'_>) -> Result<RecommendResponse> {
	let RouteArgs { user_id, profile, difficulty, pool, index, top_k, candidate_pool_size } = args;
	let difficulty = normalize_difficulty(difficulty);

	if difficulty.is_empty() {
		return Err(Error::InvalidRequest { message: "difficulty must be non-empty.".to_string() });
	}

	let respond = |source, problem_ids| RecommendResponse {
		user_id,
		difficulty: difficulty.clone(),
		source,
		problem_ids,
	};
	let Some(profile) = profile else {
		return Ok(respond(RecommendationSource::None, Vec::new()));
	};
	let Some(index) = index else {
		return Ok(respond(RecommendationSource::TagFallback, fallback(profile, pool, top_k)));
	};
	let result = recommend::recommend(RecommendArgs {
		history: Some(profile.last_solved.as_slice()),
		difficulty: &difficulty,
		pool,
		index,
		top_k,
		candidate_pool_size,
	})
	.await;

	match result {
		Ok(problem_ids) => Ok(respond(RecommendationSource::Personalized, problem_ids)),
		Err(Error::IndexUnavailable { message }) => {
			tracing::warn!(
				user_id,
				error = %message,
				"Vector index unavailable. Falling back to tag ranking."
			);

			Ok(respond(RecommendationSource::TagFallback, fallback(profile, pool, top_k)))
		},
		Err(err) => Err(err),
	}
}

fn fallback(profile: &UserProfile, pool: &ProblemPool, top_k: usize) -> Vec<ProblemId> {
	let reference = if profile.preferred_tags.is_empty() {
		normalize_tags(recommend::tag_reference(&profile.last_solved, pool))
	} else {
		profile.preferred_tags.clone()
	};
	let mut ranked = recommend::rank_by_tags(&reference, pool.problems());

	ranked.truncate(top_k);

	ranked
}

impl RecommendService {
	pub async fn recommend_for_user(&self, req: RecommendRequest) -> Result<RecommendResponse> {
		let difficulty =
			req.difficulty.unwrap_or_else(|| self.cfg.recommend.default_difficulty.clone());
		let top_k = req.top_k.unwrap_or(self.cfg.recommend.top_k as usize);
		let profile = catalog::load_profile(&self.db, req.user_id).await?;
		let pool = match profile {
			Some(_) => catalog::load_pool(&self.db).await?,
			None => ProblemPool::default(),
		};

		route_recommendation(RouteArgs {
			user_id: req.user_id,
			profile: profile.as_ref(),
			difficulty: &difficulty,
			pool: &pool,
			index: self.index.as_deref(),
			top_k,
			candidate_pool_size: self.cfg.recommend.candidate_pool_size as usize,
		})
		.await
	}

	/// Tag-only ranking over the whole catalog for an explicit tag list.
	///
	/// A list with no usable tag ranks nothing and does not touch the catalog.
	pub async fn rank_tags(&self, tags: &[String], limit: usize) -> Result<Vec<ProblemId>> {
		let reference = normalize_tags(tags);

		if reference.is_empty() {
			return Ok(Vec::new());
		}

		let pool = catalog::load_pool(&self.db).await?;
		let mut ranked = recommend::rank_by_tags(&reference, pool.problems());

		ranked.truncate(limit);

		Ok(ranked)
	}
}
