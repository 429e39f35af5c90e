use clap::Parser;
use serde_json::json;

use segmatch::{Args, Command, PolicyArgs, parse_filter, resolve_policy};
use segmatch_service::SearchMode;

fn search_config() -> segmatch_config::Search {
	segmatch_config::Search {
		mode: "first_match".to_string(),
		relevance_threshold: 0.9,
		secondary_relevance_threshold: 0.85,
		top_k: 3,
		secondary_top_k: 3,
		fallback_k: 0,
		max_rerank_workers: 100,
		max_candidates: 200,
		campaign_workers: 5,
		judge_timeout_ms: 30_000,
		rank_limit: 100,
		cost_per_million_tokens: 0.5,
	}
}

fn no_overrides() -> PolicyArgs {
	PolicyArgs { mode: None, threshold: None, top_k: None, filter: None }
}

#[test]
fn parses_search_command() {
	let args = Args::try_parse_from([
		"segmatch",
		"--config",
		"segmatch.toml",
		"search",
		"--query",
		"vegan households",
		"--mode",
		"top_k",
		"--top-k",
		"5",
	])
	.expect("Arguments must parse.");
	let Command::Search(search) = args.command else {
		panic!("Expected the search command.");
	};

	assert_eq!(search.query, "vegan households");
	assert_eq!(search.policy.mode.as_deref(), Some("top_k"));
	assert_eq!(search.policy.top_k, Some(5));
}

#[test]
fn summary_and_research_inputs_conflict() {
	let parsed = Args::try_parse_from([
		"segmatch",
		"-c",
		"segmatch.toml",
		"campaign",
		"--audience",
		"audience.json",
		"--summary",
		"--research-inputs",
	]);

	assert!(parsed.is_err());
}

#[test]
fn overrides_apply_on_top_of_config() {
	let args = PolicyArgs {
		mode: Some("Ranked".to_string()),
		threshold: Some(0.8),
		top_k: Some(7),
		filter: None,
	};
	let policy = resolve_policy(&search_config(), &args).expect("Policy must resolve.");

	assert_eq!(policy.mode, SearchMode::Ranked);
	assert_eq!(policy.relevance_threshold, 0.8);
	assert_eq!(policy.secondary_relevance_threshold, 0.8);
	assert_eq!(policy.top_k, 7);

	let defaults = resolve_policy(&search_config(), &no_overrides()).expect("Policy must resolve.");

	assert_eq!(defaults.mode, SearchMode::FirstMatch);
	assert_eq!(defaults.secondary_relevance_threshold, 0.85);
}

#[test]
fn unknown_mode_is_rejected() {
	let args = PolicyArgs { mode: Some("best".to_string()), ..no_overrides() };

	assert!(resolve_policy(&search_config(), &args).is_err());
}

#[test]
fn filter_must_be_an_object() {
	let filter = parse_filter(Some(r#"{"BrandName": "Acme"}"#)).expect("Filter must parse.");

	assert_eq!(filter.get("BrandName"), Some(&json!("Acme")));
	assert!(parse_filter(None).expect("Missing filter is empty.").is_empty());
	assert!(parse_filter(Some("[1, 2]")).is_err());
}
