mod error;

pub mod fixtures;

pub use error::{Error, Result};

use std::{collections::HashMap, env, future::Future, str::FromStr, sync::Mutex, thread};

use qdrant_client::{
	Payload, Qdrant,
	qdrant::{
		CreateCollectionBuilder, Distance, PointStruct, UpsertPointsBuilder, Vector,
		VectorParamsBuilder, VectorsConfigBuilder,
	},
};
use sqlx::{
	ConnectOptions, Connection, Executor, PgPool,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

use drill_domain::{Problem, UserProfile};

const ADMIN_DATABASES: [&str; 2] = ["postgres", "template1"];

/// Throwaway Postgres database, dropped on cleanup or when the value goes out of scope.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: PgConnectOptions,
	cleaned: bool,
	collections: Mutex<Vec<String>>,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Failed to parse DRILL_PG_DSN: {err}.")))?;
		let (admin_options, mut admin_conn) = connect_admin(&base_options).await?;
		let name = format!("drill_test_{}", Uuid::new_v4().simple());

		admin_conn
			.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create test database: {err}.")))?;

		let dsn = base_options.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin_options, cleaned: false, collections: Mutex::new(Vec::new()) })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Collection name unique to this database; removed again on cleanup.
	pub fn collection_name(&self, prefix: &str) -> String {
		let collection = format!("{prefix}_{}", self.name);
		let mut tracked = self.collections.lock().unwrap_or_else(|err| err.into_inner());

		tracked.push(collection.clone());

		collection
	}

	pub async fn cleanup(mut self) -> Result<()> {
		let collections = self.tracked_collections();

		cleanup_qdrant_collections(&collections).await?;
		drop_database(&self.name, &self.admin_options).await?;

		self.cleaned = true;

		Ok(())
	}

	fn tracked_collections(&self) -> Vec<String> {
		self.collections.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let name = self.name.clone();
		let admin_options = self.admin_options.clone();
		let collections = self.tracked_collections();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test database cleanup failed: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(cleanup_qdrant_collections(&collections)) {
				eprintln!("Test Qdrant cleanup failed: {err}.");
			}
			if let Err(err) = runtime.block_on(drop_database(&name, &admin_options)) {
				eprintln!("Test database cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

pub fn env_dsn() -> Option<String> {
	env::var("DRILL_PG_DSN").ok()
}

pub fn env_qdrant_url() -> Option<String> {
	env::var("DRILL_QDRANT_URL").ok()
}

pub async fn with_test_db<F, Fut, T>(base_dsn: &str, f: F) -> Result<T>
where
	F: FnOnce(&TestDatabase) -> Fut,
	Fut: Future<Output = Result<T>>,
{
	let db = TestDatabase::new(base_dsn).await?;
	let result = f(&db).await;

	if let Err(err) = db.cleanup().await {
		eprintln!("Test database cleanup warning: {err}.");

		if result.is_ok() {
			return Err(err);
		}
	}

	result
}

/// Inserts catalog rows. Expects the schema to exist already.
pub async fn seed_problems(pool: &PgPool, problems: &[Problem]) -> Result<()> {
	for problem in problems {
		let embedding = problem.embedding.as_deref().map(encode_embedding);
		let submissions = i64::try_from(problem.popularity).map_err(|_| {
			Error::Message(format!(
				"Problem {} popularity {} does not fit a BIGINT.",
				problem.id, problem.popularity
			))
		})?;

		sqlx::query(
			"\
INSERT INTO problems (problem_id, title, difficulty, tags, submissions, created_at, embedding)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
		)
		.bind(problem.id)
		.bind(problem.title.as_str())
		.bind(problem.difficulty.as_str())
		.bind(&problem.tags)
		.bind(submissions)
		.bind(problem.created_at)
		.bind(embedding)
		.execute(pool)
		.await?;
	}

	Ok(())
}

pub async fn seed_profile(pool: &PgPool, profile: &UserProfile) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO user_profiles (user_id, last_solved_ids, preferred_tags)
VALUES ($1, $2, $3)",
	)
	.bind(profile.user_id)
	.bind(&profile.last_solved)
	.bind(&profile.preferred_tags)
	.execute(pool)
	.await?;

	Ok(())
}

/// Creates `collection` and stores `vectors[i]` under point id `i`.
pub async fn seed_qdrant_collection(
	qdrant_url: &str,
	collection: &str,
	vector_name: &str,
	vectors: &[Vec<f32>],
) -> Result<()> {
	let client = Qdrant::from_url(qdrant_url).build()?;
	let dimensions = vectors.first().map(Vec::len).unwrap_or(1) as u64;
	let mut vectors_config = VectorsConfigBuilder::default();

	vectors_config
		.add_named_vector_params(vector_name, VectorParamsBuilder::new(dimensions, Distance::Euclid));
	client
		.create_collection(
			CreateCollectionBuilder::new(collection.to_string()).vectors_config(vectors_config),
		)
		.await?;

	let points = vectors
		.iter()
		.enumerate()
		.map(|(position, vector)| {
			let mut named = HashMap::new();

			named.insert(vector_name.to_string(), Vector::from(vector.clone()));

			PointStruct::new(position as u64, named, Payload::new())
		})
		.collect::<Vec<_>>();

	client.upsert_points(UpsertPointsBuilder::new(collection.to_string(), points).wait(true)).await?;

	Ok(())
}

pub fn encode_embedding(values: &[f32]) -> Vec<u8> {
	values.iter().flat_map(|value| value.to_le_bytes()).collect()
}

async fn connect_admin(
	base_options: &PgConnectOptions,
) -> Result<(PgConnectOptions, PgConnection)> {
	let mut last_err = None;

	for database in ADMIN_DATABASES {
		let options = base_options.clone().database(database);

		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => {
				last_err = Some(err);
			},
		}
	}

	Err(Error::Message(format!("Failed to connect to an admin database: {last_err:?}.")))
}

async fn drop_database(name: &str, admin_options: &PgConnectOptions) -> Result<()> {
	let mut conn = PgConnection::connect_with(admin_options).await.map_err(|err| {
		Error::Message(format!("Failed to connect to admin database for cleanup: {err}."))
	})?;
	let _ = sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.fetch_all(&mut conn)
	.await;

	sqlx::query(format!(r#"DROP DATABASE IF EXISTS "{name}""#).as_str())
		.execute(&mut conn)
		.await
		.map_err(|err| Error::Message(format!("Failed to drop test database: {err}.")))?;

	Ok(())
}

async fn cleanup_qdrant_collections(collections: &[String]) -> Result<()> {
	if collections.is_empty() {
		return Ok(());
	}

	let Some(qdrant_url) = env_qdrant_url() else {
		eprintln!("Skipping Qdrant cleanup; set DRILL_QDRANT_URL to delete test collections.");

		return Ok(());
	};
	let client = Qdrant::from_url(&qdrant_url).build()?;

	for collection in collections {
		if client.collection_exists(collection.clone()).await? {
			client.delete_collection(collection.clone()).await?;
		}
	}

	Ok(())
}
