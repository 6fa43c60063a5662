use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub index: Index,
	#[serde(default)]
	pub recommend: Recommend,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Index {
	/// One of "flat" or "qdrant".
	pub backend: String,
	/// Snapshot file read by the flat backend.
	pub path: Option<PathBuf>,
	pub vector_dim: u32,
	pub qdrant: Option<Qdrant>,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Recommend {
	/// Number of candidates pulled from the index (or the cold-start prefix) per request.
	pub candidate_pool_size: u32,
	pub top_k: u32,
	pub default_difficulty: String,
}
impl Default for Recommend {
	fn default() -> Self {
		Self {
			candidate_pool_size: default_candidate_pool_size(),
			top_k: default_top_k(),
			default_difficulty: default_difficulty(),
		}
	}
}

fn default_candidate_pool_size() -> u32 {
	crate::DEFAULT_CANDIDATE_POOL
}

fn default_top_k() -> u32 {
	20
}

fn default_difficulty() -> String {
	"easy".to_string()
}
