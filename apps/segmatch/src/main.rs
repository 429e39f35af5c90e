use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = segmatch::Args::parse();

	segmatch::run(args).await
}
