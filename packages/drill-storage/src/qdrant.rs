use qdrant_client::qdrant::{Query, QueryPointsBuilder, point_id::PointIdOptions};

use crate::Result;

pub const DENSE_VECTOR_NAME: &str = "dense";

/// Qdrant collection whose point ids are working-list positions.
pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &drill_config::Qdrant, vector_dim: u32) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim })
	}

	pub async fn collection_exists(&self) -> Result<bool> {
		Ok(self.client.collection_exists(self.collection.clone()).await?)
	}

	/// Positions nearest to `query`, in the order Qdrant scores them.
	pub async fn nearest_positions(&self, query: &[f32], k: usize) -> Result<Vec<usize>> {
		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(query.to_vec()))
			.using(DENSE_VECTOR_NAME)
			.limit(k as u64);
		let response = self.client.query(search).await?;
		let mut out = Vec::with_capacity(response.result.len());

		for point in response.result {
			match point.id.and_then(|id| id.point_id_options) {
				Some(PointIdOptions::Num(position)) => out.push(position as usize),
				other => {
					tracing::warn!(point_id = ?other, "Skipping point without a numeric position.");
				},
			}
		}

		Ok(out)
	}
}
