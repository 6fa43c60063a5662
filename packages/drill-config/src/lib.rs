mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Index, Postgres, Qdrant, Recommend, Service, Storage};

use std::{fs, path::Path};

pub const INDEX_BACKEND_FLAT: &str = "flat";
pub const INDEX_BACKEND_QDRANT: &str = "qdrant";
/// Candidates pulled per request when `recommend.candidate_pool_size` is not set.
pub const DEFAULT_CANDIDATE_POOL: u32 = 10;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.index.vector_dim == 0 {
		return Err(Error::Validation {
			message: "index.vector_dim must be greater than zero.".to_string(),
		});
	}

	match cfg.index.backend.as_str() {
		INDEX_BACKEND_FLAT =>
			if cfg.index.path.is_none() {
				return Err(Error::Validation {
					message: "index.path is required when index.backend is flat.".to_string(),
				});
			},
		INDEX_BACKEND_QDRANT => {
			let Some(qdrant) = cfg.index.qdrant.as_ref() else {
				return Err(Error::Validation {
					message: "index.qdrant is required when index.backend is qdrant.".to_string(),
				});
			};

			for (label, value) in
				[("index.qdrant.url", &qdrant.url), ("index.qdrant.collection", &qdrant.collection)]
			{
				if value.trim().is_empty() {
					return Err(Error::Validation { message: format!("{label} must be non-empty.") });
				}
			}
		},
		_ => {
			return Err(Error::Validation {
				message: "index.backend must be one of flat or qdrant.".to_string(),
			});
		},
	}

	if cfg.recommend.candidate_pool_size == 0 {
		return Err(Error::Validation {
			message: "recommend.candidate_pool_size must be greater than zero.".to_string(),
		});
	}
	if !matches!(cfg.recommend.default_difficulty.as_str(), "easy" | "medium" | "hard") {
		return Err(Error::Validation {
			message: "recommend.default_difficulty must be one of easy, medium, or hard."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.index.backend = cfg.index.backend.trim().to_ascii_lowercase();
	cfg.recommend.default_difficulty = cfg.recommend.default_difficulty.trim().to_lowercase();

	if cfg.index.path.as_deref().map(|path| path.as_os_str().is_empty()).unwrap_or(false) {
		cfg.index.path = None;
	}
}
