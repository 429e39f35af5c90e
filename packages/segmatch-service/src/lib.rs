pub mod assemble;
pub mod campaign;
pub mod scoring;
pub mod search;

mod error;

pub use assemble::{
	AssembledAudience, AssembledLeaf, ResearchInput, SegmentSummary, SummaryLeaf, SummarySegment,
	assemble, research_inputs, summarize,
};
pub use campaign::CampaignResults;
pub use error::{Error, Result};
pub use scoring::{ScoreReport, Scorer, Selection, SelectionTier};
pub use search::{SearchMode, SearchOutcome, SearchPolicy, SearchRequest, SearchResult};
pub use segmatch_providers::RetryPolicy;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::{Map, Value};

use segmatch_config::{Config, EmbeddingProviderConfig, JudgeProviderConfig};
use segmatch_domain::{candidate::IndexMatch, filter::GeoFilter};
use segmatch_providers::{embedding, judge};
use segmatch_storage::qdrant::QdrantIndex;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait VectorIndex
where
	Self: Send + Sync,
{
	fn query<'a>(
		&'a self,
		vector: Vec<f32>,
		top_k: u32,
		filter: &'a Map<String, Value>,
	) -> BoxFuture<'a, Result<Vec<IndexMatch>>>;
}

pub trait RelevanceJudge
where
	Self: Send + Sync,
{
	/// Returns the judge's raw reply; parsing into a score is the scorer's job.
	fn judge<'a>(
		&'a self,
		cfg: &'a JudgeProviderConfig,
		query: &'a str,
		candidate_text: &'a str,
	) -> BoxFuture<'a, Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub index: Arc<dyn VectorIndex>,
	pub judge: Arc<dyn RelevanceJudge>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		index: Arc<dyn VectorIndex>,
		judge: Arc<dyn RelevanceJudge>,
	) -> Self {
		Self { embedding, index, judge }
	}

	/// OpenAI-compatible HTTP providers and a Qdrant index, as configured.
	pub fn from_config(cfg: &Config) -> Result<Self> {
		let http = Arc::new(HttpProviders {
			embedding: segmatch_providers::build_client(cfg.providers.embedding.timeout_ms)?,
			judge: segmatch_providers::build_client(cfg.providers.judge.timeout_ms)?,
		});
		let index = Arc::new(QdrantIndex::new(&cfg.index)?);

		Ok(Self { embedding: http.clone(), index, judge: http })
	}
}

/// Retry schedules for each kind of remote call.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicies {
	pub judge: RetryPolicy,
	pub embedding: RetryPolicy,
	pub index: RetryPolicy,
}
impl RetryPolicies {
	pub fn from_config(cfg: &Config) -> Self {
		Self {
			judge: RetryPolicy::from_config(&cfg.retry.judge),
			embedding: RetryPolicy::from_config(&cfg.retry.embedding),
			index: RetryPolicy::from_config(&cfg.retry.index),
		}
	}

	/// One attempt per call and no sleeping.
	pub fn none() -> Self {
		Self { judge: RetryPolicy::none(), embedding: RetryPolicy::none(), index: RetryPolicy::none() }
	}
}

pub struct SegmentService {
	pub cfg: Config,
	pub providers: Providers,
	pub retry: RetryPolicies,
	geo: Arc<GeoFilter>,
}
impl SegmentService {
	pub fn new(cfg: Config) -> Result<Self> {
		let providers = Providers::from_config(&cfg)?;

		Self::with_providers(cfg, providers)
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Result<Self> {
		let geo = GeoFilter::non_us().map_err(|err| Error::Config {
			message: format!("Location filter failed to compile: {err}."),
		})?;
		let retry = RetryPolicies::from_config(&cfg);

		Ok(Self { cfg, providers, retry, geo: Arc::new(geo) })
	}

	/// Replaces the retry schedules, for callers that need tighter or looser envelopes.
	pub fn with_retry(mut self, retry: RetryPolicies) -> Self {
		self.retry = retry;

		self
	}

	/// Replaces the location filter.
	pub fn with_geo_filter(mut self, geo: GeoFilter) -> Self {
		self.geo = Arc::new(geo);

		self
	}

	pub(crate) fn geo(&self) -> &GeoFilter {
		&self.geo
	}
}

struct HttpProviders {
	embedding: reqwest::Client,
	judge: reqwest::Client,
}
impl EmbeddingProvider for HttpProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(&self.embedding, cfg, texts).await?) })
	}
}
impl RelevanceJudge for HttpProviders {
	fn judge<'a>(
		&'a self,
		cfg: &'a JudgeProviderConfig,
		query: &'a str,
		candidate_text: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(judge::judge(&self.judge, cfg, query, candidate_text).await?) })
	}
}

impl VectorIndex for QdrantIndex {
	fn query<'a>(
		&'a self,
		vector: Vec<f32>,
		top_k: u32,
		filter: &'a Map<String, Value>,
	) -> BoxFuture<'a, Result<Vec<IndexMatch>>> {
		Box::pin(async move { Ok(QdrantIndex::query(self, vector, top_k, filter).await?) })
	}
}
