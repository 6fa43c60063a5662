use std::{io, path::PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use drill_service::{RecommendRequest, RecommendService};
use drill_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = drill_cli::VERSION,
	rename_all = "kebab",
	styles = drill_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Recommend problems for a user from their solve history.
	User {
		#[arg(long, value_name = "ID")]
		user_id: i64,
		/// Defaults to recommend.default_difficulty.
		#[arg(long, value_name = "LEVEL")]
		difficulty: Option<String>,
		/// Defaults to recommend.top_k.
		#[arg(long, value_name = "N")]
		top_k: Option<usize>,
	},
	/// Rank the catalog by overlap with the given tags.
	Tags {
		#[arg(long = "tag", value_name = "TAG", required = true)]
		tags: Vec<String>,
		#[arg(long, value_name = "N", default_value_t = 20)]
		limit: usize,
	},
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = drill_config::load(&args.config)?;

	init_tracing(&config);

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema(config.index.vector_dim).await?;

	match args.command {
		Command::User { user_id, difficulty, top_k } => {
			let index = drill_service::open_index(&config.index).await?;
			let service = RecommendService::new(config, db, index);
			let response =
				service.recommend_for_user(RecommendRequest { user_id, difficulty, top_k }).await?;

			tracing::info!(
				user_id,
				source = ?response.source,
				count = response.problem_ids.len(),
				"Recommendation ready."
			);
			println!("{}", serde_json::to_string_pretty(&response)?);
		},
		Command::Tags { tags, limit } => {
			let service = RecommendService::new(config, db, None);
			let problem_ids = service.rank_tags(&tags, limit).await?;

			println!("{}", serde_json::to_string_pretty(&problem_ids)?);
		},
	}

	Ok(())
}

fn init_tracing(config: &drill_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}
