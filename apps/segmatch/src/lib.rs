use std::{fs, path::PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand};
use color_eyre::eyre;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use segmatch_domain::audience::{AudienceDocument, SegmentDescription};
use segmatch_service::{SearchMode, SearchPolicy, SearchRequest, SegmentService};

#[derive(Debug, Parser)]
#[command(
	version = segmatch_cli::VERSION,
	rename_all = "kebab",
	styles = segmatch_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Find catalogue segments for one free-text description.
	Search(SearchArgs),
	/// Find segments for every description in an audience file.
	Campaign(CampaignArgs),
}

#[derive(Debug, ClapArgs)]
pub struct PolicyArgs {
	/// first_match, top_k, or ranked. Defaults to search.mode.
	#[arg(long, value_name = "MODE")]
	pub mode: Option<String>,
	#[arg(long, value_name = "SCORE")]
	pub threshold: Option<f32>,
	#[arg(long, value_name = "N")]
	pub top_k: Option<usize>,
	/// Metadata pre-filter as a JSON object, e.g. '{"BrandName": "Acme"}'.
	#[arg(long, value_name = "JSON")]
	pub filter: Option<String>,
}

#[derive(Debug, ClapArgs)]
pub struct SearchArgs {
	#[arg(long, short = 'q')]
	pub query: String,
	/// Print segments as report rows keyed by display names.
	#[arg(long)]
	pub display: bool,
	#[command(flatten)]
	pub policy: PolicyArgs,
}

#[derive(Debug, ClapArgs)]
pub struct CampaignArgs {
	#[arg(long, short = 'a', value_name = "FILE")]
	pub audience: PathBuf,
	/// Print only each segment's description and brand.
	#[arg(long, conflicts_with = "research_inputs")]
	pub summary: bool,
	/// Print the flat list of matched segment texts and brands.
	#[arg(long)]
	pub research_inputs: bool,
	#[command(flatten)]
	pub policy: PolicyArgs,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = segmatch_config::load(&args.config)?;

	init_tracing(&config)?;

	tracing::info!(config = %args.config.display(), "Configuration loaded.");

	let service = SegmentService::new(config)?;
	let output = match &args.command {
		Command::Search(search) => {
			let policy = resolve_policy(&service.cfg.search, &search.policy)?;
			let filter = parse_filter(search.policy.filter.as_deref())?;
			let req = SearchRequest::new(search.query.clone(), policy).with_filter(filter);
			let result = service.search(&req).await?;

			if search.display {
				let rows: Vec<_> =
					result.segments.iter().map(|segment| segment.display_row()).collect();

				serde_json::json!({
					"description": result.description,
					"outcome": result.outcome,
					"segments": rows,
					"usage": result.usage,
				})
			} else {
				serde_json::to_value(&result)?
			}
		},
		Command::Campaign(campaign) => {
			let policy = resolve_policy(&service.cfg.search, &campaign.policy)?;
			let filter = parse_filter(campaign.policy.filter.as_deref())?;
			let raw = fs::read_to_string(&campaign.audience)?;
			let doc: AudienceDocument<SegmentDescription> = serde_json::from_str(&raw)?;
			let results = service.run_campaign(&doc.audience, &policy, &filter).await;
			let assembled = segmatch_service::assemble(&doc.audience, &results);

			if campaign.research_inputs {
				serde_json::to_value(segmatch_service::research_inputs(&assembled))?
			} else if campaign.summary {
				serde_json::to_value(AudienceDocument {
					audience: segmatch_service::summarize(&assembled),
				})?
			} else {
				serde_json::to_value(AudienceDocument { audience: assembled })?
			}
		},
	};

	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}

/// The configured search policy with command-line overrides applied.
pub fn resolve_policy(
	search: &segmatch_config::Search,
	args: &PolicyArgs,
) -> color_eyre::Result<SearchPolicy> {
	let mut policy = SearchPolicy::from_config(search)?;

	if let Some(raw) = &args.mode {
		let mode = SearchMode::parse(raw)
			.ok_or_else(|| eyre::eyre!("Unknown mode {raw}. Use first_match, top_k, or ranked."))?;

		policy = policy.with_mode(mode);
	}
	if let Some(threshold) = args.threshold {
		policy.relevance_threshold = threshold;
		policy.secondary_relevance_threshold =
			policy.secondary_relevance_threshold.min(threshold);
	}
	if let Some(top_k) = args.top_k {
		policy.top_k = top_k;
	}

	Ok(policy)
}

pub fn parse_filter(raw: Option<&str>) -> color_eyre::Result<Map<String, Value>> {
	let Some(raw) = raw else {
		return Ok(Map::new());
	};

	let value: Value = serde_json::from_str(raw)?;

	match value {
		Value::Object(filter) => Ok(filter),
		_ => Err(eyre::eyre!("--filter must be a JSON object.")),
	}
}

fn init_tracing(config: &segmatch_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	Ok(())
}
