use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = drill_recommend::Args::parse();

	drill_recommend::run(args).await
}
