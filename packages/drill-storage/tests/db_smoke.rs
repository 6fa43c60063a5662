use drill_config::Postgres;
use drill_domain::UserProfile;
use drill_storage::{db::Db, queries};
use drill_testkit::{TestDatabase, fixtures};

#[tokio::test]
#[ignore = "Requires external Postgres. Set DRILL_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(base_dsn) = drill_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set DRILL_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(4).await.expect("Failed to ensure schema.");
	db.ensure_schema(4).await.expect("Schema bootstrap must be idempotent.");

	let count: i64 = sqlx::query_scalar(
		"SELECT count(*) FROM information_schema.tables WHERE table_name IN ('problems', 'user_profiles')",
	)
	.fetch_one(&db.pool)
	.await
	.expect("Failed to query schema tables.");

	assert_eq!(count, 2);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DRILL_PG_DSN to run."]
async fn problems_load_in_id_order_with_embeddings() {
	let Some(base_dsn) = drill_testkit::env_dsn() else {
		eprintln!("Skipping problems_load_in_id_order_with_embeddings; set DRILL_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(2).await.expect("Failed to ensure schema.");
	drill_testkit::seed_problems(
		&db.pool,
		&[
			fixtures::embedded(30, "Hard", &["graph"], vec![0.0, 1.0]),
			fixtures::problem(10, "easy", &["dp", "greedy"]),
			fixtures::embedded(20, "medium", &["dp"], vec![1.0, 0.5]),
		],
	)
	.await
	.expect("Failed to seed problems.");

	let rows = queries::fetch_problems(&db).await.expect("Failed to fetch problems.");
	let ids: Vec<i64> = rows.iter().map(|row| row.problem_id).collect();

	assert_eq!(ids, vec![10, 20, 30]);
	assert!(rows[0].embedding.is_none());
	assert_eq!(rows[1].embedding.as_deref(), Some(drill_testkit::encode_embedding(&[1.0, 0.5]).as_slice()));
	assert_eq!(rows[0].tags, vec!["dp".to_string(), "greedy".to_string()]);

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DRILL_PG_DSN to run."]
async fn embedding_length_is_checked_by_schema() {
	let Some(base_dsn) = drill_testkit::env_dsn() else {
		eprintln!("Skipping embedding_length_is_checked_by_schema; set DRILL_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(3).await.expect("Failed to ensure schema.");

	let result = drill_testkit::seed_problems(
		&db.pool,
		&[fixtures::embedded(1, "easy", &["dp"], vec![1.0, 0.0])],
	)
	.await;

	assert!(result.is_err(), "A 2-dimensional embedding must violate a 3-dimensional schema.");

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set DRILL_PG_DSN to run."]
async fn user_profile_round_trips_history_order() {
	let Some(base_dsn) = drill_testkit::env_dsn() else {
		eprintln!("Skipping user_profile_round_trips_history_order; set DRILL_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(2).await.expect("Failed to ensure schema.");

	let profile = UserProfile {
		user_id: 42,
		last_solved: vec![7, 3, 11],
		preferred_tags: vec!["graph".to_string()],
	};

	drill_testkit::seed_profile(&db.pool, &profile).await.expect("Failed to seed profile.");

	let row = queries::fetch_user_profile(&db, 42)
		.await
		.expect("Failed to fetch profile.")
		.expect("Profile must exist.");

	assert_eq!(row.last_solved_ids, vec![7, 3, 11]);
	assert_eq!(row.preferred_tags, vec!["graph".to_string()]);
	assert!(queries::fetch_user_profile(&db, 43).await.expect("Query succeeds.").is_none());

	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
