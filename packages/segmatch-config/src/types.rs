use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	pub index: Index,
	pub search: Search,
	#[serde(default)]
	pub retry: Retry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub judge: JudgeProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JudgeProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	#[serde(default)]
	pub temperature: f32,
	#[serde(default = "default_judge_max_tokens")]
	pub max_tokens: u32,
	/// Upper bound of the rating the judge prompt asks for. Either 10 or 100.
	#[serde(default = "default_score_scale")]
	pub score_scale: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Index {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
	/// Number of nearest neighbours requested per query.
	pub candidate_k: u32,
	#[serde(default)]
	pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	/// One of first_match, top_k, or ranked.
	pub mode: String,
	pub relevance_threshold: f32,
	pub secondary_relevance_threshold: f32,
	pub top_k: u32,
	#[serde(default = "default_secondary_top_k")]
	pub secondary_top_k: u32,
	#[serde(default)]
	pub fallback_k: u32,
	pub max_rerank_workers: u32,
	/// Ceiling on how many filtered candidates are sent to the judge.
	pub max_candidates: u32,
	#[serde(default = "default_campaign_workers")]
	pub campaign_workers: u32,
	#[serde(default = "default_judge_timeout_ms")]
	pub judge_timeout_ms: u64,
	#[serde(default = "default_rank_limit")]
	pub rank_limit: u32,
	#[serde(default = "default_cost_per_million_tokens")]
	pub cost_per_million_tokens: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Retry {
	pub judge: RetryPolicyConfig,
	pub embedding: RetryPolicyConfig,
	pub index: RetryPolicyConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryPolicyConfig {
	pub max_attempts: u32,
	pub initial_backoff_ms: u64,
	pub max_backoff_ms: u64,
	pub multiplier: f64,
}
impl Default for RetryPolicyConfig {
	fn default() -> Self {
		Self { max_attempts: 5, initial_backoff_ms: 4_000, max_backoff_ms: 60_000, multiplier: 2.0 }
	}
}

fn default_judge_max_tokens() -> u32 {
	100
}

fn default_score_scale() -> u32 {
	10
}

fn default_secondary_top_k() -> u32 {
	3
}

fn default_campaign_workers() -> u32 {
	5
}

fn default_judge_timeout_ms() -> u64 {
	30_000
}

fn default_rank_limit() -> u32 {
	100
}

fn default_cost_per_million_tokens() -> f64 {
	0.5
}
