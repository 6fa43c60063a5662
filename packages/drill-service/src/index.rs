use std::sync::Arc;

use crate::{BoxFuture, Error, Result, VectorIndex};
use drill_config::{INDEX_BACKEND_FLAT, INDEX_BACKEND_QDRANT, Index};
use drill_storage::{flat::FlatIndex, qdrant::QdrantStore};

impl VectorIndex for FlatIndex {
	fn dimensions(&self) -> usize {
		FlatIndex::dimensions(self)
	}

	fn nearest<'a>(&'a self, query: &'a [f32], k: usize) -> BoxFuture<'a, Result<Vec<usize>>> {
		Box::pin(async move {
			check_query(query, FlatIndex::dimensions(self))?;

			let hits = self.search(query, k)?;

			Ok(hits.into_iter().map(|(position, _)| position).collect())
		})
	}
}

impl VectorIndex for QdrantStore {
	fn dimensions(&self) -> usize {
		self.vector_dim as usize
	}

	fn nearest<'a>(&'a self, query: &'a [f32], k: usize) -> BoxFuture<'a, Result<Vec<usize>>> {
		Box::pin(async move {
			check_query(query, self.vector_dim as usize)?;

			self.nearest_positions(query, k)
				.await
				.map_err(|err| Error::IndexUnavailable { message: err.to_string() })
		})
	}
}

/// Opens the configured vector index.
///
/// A missing snapshot or unreachable collection yields `Ok(None)` so callers can degrade to
/// tag-only ranking. A snapshot built for other dimensions is an error.
pub async fn open_index(cfg: &Index) -> Result<Option<Arc<dyn VectorIndex>>> {
	match cfg.backend.as_str() {
		INDEX_BACKEND_FLAT => open_flat(cfg),
		INDEX_BACKEND_QDRANT => open_qdrant(cfg).await,
		other => Err(Error::InvalidRequest { message: format!("Unknown index backend {other:?}.") }),
	}
}

fn open_flat(cfg: &Index) -> Result<Option<Arc<dyn VectorIndex>>> {
	let Some(path) = cfg.path.as_deref() else {
		tracing::warn!("Flat index path is not configured.");

		return Ok(None);
	};
	let index = match FlatIndex::load(path) {
		Ok(index) => index,
		Err(drill_storage::Error::InvalidArgument(message)) =>
			return Err(Error::EmbeddingIncompatible { message }),
		Err(err) => {
			tracing::warn!(error = %err, path = %path.display(), "Vector index unavailable.");

			return Ok(None);
		},
	};
	let expected = cfg.vector_dim as usize;

	if index.dimensions() != expected {
		return Err(Error::EmbeddingIncompatible {
			message: format!(
				"Index {} has {} dimensions; index.vector_dim is {expected}.",
				path.display(),
				index.dimensions()
			),
		});
	}

	tracing::info!(path = %path.display(), vectors = index.len(), "Loaded flat vector index.");

	Ok(Some(Arc::new(index)))
}

async fn open_qdrant(cfg: &Index) -> Result<Option<Arc<dyn VectorIndex>>> {
	let Some(qdrant) = cfg.qdrant.as_ref() else {
		tracing::warn!("Qdrant index is not configured.");

		return Ok(None);
	};
	let store = match QdrantStore::new(qdrant, cfg.vector_dim) {
		Ok(store) => store,
		Err(err) => {
			tracing::warn!(error = %err, url = %qdrant.url, "Vector index unavailable.");

			return Ok(None);
		},
	};

	match store.collection_exists().await {
		Ok(true) => Ok(Some(Arc::new(store))),
		Ok(false) => {
			tracing::warn!(collection = %qdrant.collection, "Qdrant collection is missing.");

			Ok(None)
		},
		Err(err) => {
			tracing::warn!(error = %err, url = %qdrant.url, "Vector index unavailable.");

			Ok(None)
		},
	}
}

fn check_query(query: &[f32], dimensions: usize) -> Result<()> {
	if query.len() != dimensions {
		return Err(Error::EmbeddingIncompatible {
			message: format!(
				"Query has {} dimensions; index expects {dimensions}.",
				query.len()
			),
		});
	}

	Ok(())
}
