pub mod catalog;
pub mod index;
pub mod recommend;
pub mod routing;

mod error;

pub use error::{Error, Result};
pub use index::open_index;
pub use recommend::{
	RecommendArgs, ScoredCandidate, rank_by_tags, recommend as recommend_ids, rerank,
};
pub use routing::{
	RecommendRequest, RecommendResponse, RecommendationSource, RouteArgs, route_recommendation,
};

use std::{future::Future, pin::Pin, sync::Arc};

use drill_config::Config;
use drill_storage::db::Db;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Nearest-neighbor lookup over problem embeddings.
///
/// Positions refer to the working problem list the index was built from.
pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn dimensions(&self) -> usize;

	/// Up to `k` positions, nearest first.
	fn nearest<'a>(&'a self, query: &'a [f32], k: usize) -> BoxFuture<'a, Result<Vec<usize>>>;
}

pub struct RecommendService {
	pub cfg: Config,
	pub db: Db,
	pub index: Option<Arc<dyn VectorIndex>>,
}
impl RecommendService {
	pub fn new(cfg: Config, db: Db, index: Option<Arc<dyn VectorIndex>>) -> Self {
		Self { cfg, db, index }
	}
}
