use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use drill_config::{Config, DEFAULT_CANDIDATE_POOL, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with_index(backend: &str, with_path: bool, with_qdrant: bool) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");
	let index = root
		.get_mut("index")
		.and_then(Value::as_table_mut)
		.expect("Template config must include [index].");

	index.insert("backend".to_string(), Value::String(backend.to_string()));

	if !with_path {
		index.remove("path");
	}
	if !with_qdrant {
		index.remove("qdrant");
	}

	toml::to_string(&value).expect("Failed to render template config.")
}

fn sample_toml_with_default_difficulty(payload: &str, difficulty: &str) -> String {
	let mut value: Value = toml::from_str(payload).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");
	let recommend = root
		.get_mut("recommend")
		.and_then(Value::as_table_mut)
		.expect("Template config must include [recommend].");

	recommend.insert("default_difficulty".to_string(), Value::String(difficulty.to_string()));

	toml::to_string(&value).expect("Failed to render template config.")
}

fn sample_toml_without_recommend() -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");

	root.remove("recommend");

	toml::to_string(&value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("drill_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads() {
	let path = write_temp_config(SAMPLE_CONFIG_TEMPLATE_TOML.to_string());
	let result = drill_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected sample config to load.");

	assert_eq!(cfg.index.backend, "flat");
	assert_eq!(cfg.index.vector_dim, 384);
	assert_eq!(cfg.recommend.candidate_pool_size, 10);
	assert_eq!(cfg.recommend.top_k, 20);
	assert_eq!(cfg.recommend.default_difficulty, "easy");
}

#[test]
fn recommend_section_defaults_when_missing() {
	let path = write_temp_config(sample_toml_without_recommend());
	let result = drill_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected config without [recommend] to load.");

	assert_eq!(cfg.recommend.candidate_pool_size, DEFAULT_CANDIDATE_POOL);
	assert_eq!(cfg.recommend.top_k, 20);
	assert_eq!(cfg.recommend.default_difficulty, "easy");
}

#[test]
fn backend_and_difficulty_are_normalized() {
	let payload =
		sample_toml_with_default_difficulty(&sample_toml_with_index(" Qdrant ", true, true), "MEDIUM");
	let path = write_temp_config(payload);
	let result = drill_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Expected normalized config to load.");

	assert_eq!(cfg.index.backend, "qdrant");
	assert_eq!(cfg.recommend.default_difficulty, "medium");
}

#[test]
fn unknown_backend_is_rejected() {
	let path = write_temp_config(sample_toml_with_index("faiss", true, true));
	let result = drill_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected backend validation error.");

	assert!(
		err.to_string().contains("index.backend must be one of flat or qdrant."),
		"Unexpected error: {err}"
	);
}

#[test]
fn flat_backend_requires_path() {
	let path = write_temp_config(sample_toml_with_index("flat", false, false));
	let result = drill_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected index.path validation error.");

	assert!(
		err.to_string().contains("index.path is required when index.backend is flat."),
		"Unexpected error: {err}"
	);
}

#[test]
fn qdrant_backend_requires_qdrant_section() {
	let path = write_temp_config(sample_toml_with_index("qdrant", false, false));
	let result = drill_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected index.qdrant validation error.");

	assert!(
		err.to_string().contains("index.qdrant is required when index.backend is qdrant."),
		"Unexpected error: {err}"
	);
}

#[test]
fn qdrant_collection_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.index.backend = "qdrant".to_string();

	if let Some(qdrant) = cfg.index.qdrant.as_mut() {
		qdrant.collection = "  ".to_string();
	}

	let err = drill_config::validate(&cfg).expect_err("Expected collection validation error.");

	assert!(
		err.to_string().contains("index.qdrant.collection must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn vector_dim_must_be_positive() {
	let mut cfg = base_config();

	cfg.index.vector_dim = 0;

	let err = drill_config::validate(&cfg).expect_err("Expected vector_dim validation error.");

	assert!(
		err.to_string().contains("index.vector_dim must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn candidate_pool_size_must_be_positive() {
	let mut cfg = base_config();

	cfg.recommend.candidate_pool_size = 0;

	let err = drill_config::validate(&cfg).expect_err("Expected pool size validation error.");

	assert!(
		err.to_string().contains("recommend.candidate_pool_size must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn default_difficulty_must_be_known() {
	let mut cfg = base_config();

	cfg.recommend.default_difficulty = "expert".to_string();

	let err = drill_config::validate(&cfg).expect_err("Expected difficulty validation error.");

	assert!(
		err.to_string()
			.contains("recommend.default_difficulty must be one of easy, medium, or hard."),
		"Unexpected error: {err}"
	);
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("drill_config_test_missing_file.toml");

	let err = drill_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
}
