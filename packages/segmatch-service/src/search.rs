use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use segmatch_domain::{
	candidate::{self, SegmentCandidate},
	filter, ordering,
};

use crate::{
	Error, Result, SegmentService,
	scoring::{self, ScoreReport, Scorer, SelectionTier},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
	/// Stop at the first candidate that clears the relevance threshold.
	FirstMatch,
	/// Score everything and keep a two-tier top-K set.
	TopK,
	/// Score everything and keep the best `rank_limit` regardless of threshold.
	Ranked,
}
impl SearchMode {
	pub fn parse(raw: &str) -> Option<Self> {
		match raw.trim().to_ascii_lowercase().as_str() {
			"first_match" => Some(Self::FirstMatch),
			"top_k" => Some(Self::TopK),
			"ranked" => Some(Self::Ranked),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::FirstMatch => "first_match",
			Self::TopK => "top_k",
			Self::Ranked => "ranked",
		}
	}
}

/// Per-request scoring parameters. Defaults come from `[search]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPolicy {
	pub mode: SearchMode,
	pub relevance_threshold: f32,
	pub secondary_relevance_threshold: f32,
	pub top_k: usize,
	pub secondary_top_k: usize,
	pub fallback_k: usize,
	pub max_rerank_workers: usize,
	pub max_candidates: usize,
	pub rank_limit: usize,
	pub judge_timeout: Duration,
}
impl SearchPolicy {
	pub fn from_config(cfg: &segmatch_config::Search) -> Result<Self> {
		let mode = SearchMode::parse(&cfg.mode).ok_or_else(|| Error::Config {
			message: format!("Unknown search.mode {}.", cfg.mode),
		})?;

		Ok(Self {
			mode,
			relevance_threshold: cfg.relevance_threshold,
			secondary_relevance_threshold: cfg.secondary_relevance_threshold,
			top_k: cfg.top_k as usize,
			secondary_top_k: cfg.secondary_top_k as usize,
			fallback_k: cfg.fallback_k as usize,
			max_rerank_workers: cfg.max_rerank_workers as usize,
			max_candidates: cfg.max_candidates as usize,
			rank_limit: cfg.rank_limit as usize,
			judge_timeout: Duration::from_millis(cfg.judge_timeout_ms),
		})
	}

	pub fn with_mode(mut self, mode: SearchMode) -> Self {
		self.mode = mode;

		self
	}

	fn validate(&self) -> Result<()> {
		let in_range = |value: f32| value.is_finite() && (0.0..=1.0).contains(&value);

		if !in_range(self.relevance_threshold) || !in_range(self.secondary_relevance_threshold) {
			return Err(Error::InvalidRequest {
				message: "Relevance thresholds must be within 0.0-1.0.".to_string(),
			});
		}
		if self.secondary_relevance_threshold > self.relevance_threshold {
			return Err(Error::InvalidRequest {
				message: "Secondary threshold must not exceed the primary threshold.".to_string(),
			});
		}
		if self.top_k == 0 || self.max_rerank_workers == 0 || self.max_candidates == 0 {
			return Err(Error::InvalidRequest {
				message: "top_k, max_rerank_workers, and max_candidates must be positive."
					.to_string(),
			});
		}

		Ok(())
	}
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
	pub query: String,
	/// Exact-match metadata pre-filter applied by the vector index.
	pub filter: Map<String, Value>,
	pub policy: SearchPolicy,
}
impl SearchRequest {
	pub fn new(query: impl Into<String>, policy: SearchPolicy) -> Self {
		Self { query: query.into(), filter: Map::new(), policy }
	}

	pub fn with_filter(mut self, filter: Map<String, Value>) -> Self {
		self.filter = filter;

		self
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
	Matched { searched: usize },
	Fallback { searched: usize },
	NoMatch { searched: usize },
	Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
	pub description: String,
	pub outcome: SearchOutcome,
	pub segments: Vec<SegmentCandidate>,
	pub usage: ScoreReport,
}
impl SearchResult {
	pub fn failed(description: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			description: description.into(),
			outcome: SearchOutcome::Failed { message: message.into() },
			segments: Vec::new(),
			usage: ScoreReport::default(),
		}
	}

	fn no_match(description: &str, searched: usize, usage: ScoreReport) -> Self {
		Self {
			description: description.to_string(),
			outcome: SearchOutcome::NoMatch { searched },
			segments: Vec::new(),
			usage,
		}
	}
}

impl SegmentService {
	/// Embeds the query, retrieves and filters candidates, then scores them per the policy.
	pub async fn search(&self, req: &SearchRequest) -> Result<SearchResult> {
		let query = req.query.trim();

		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "Query must not be empty.".to_string() });
		}

		req.policy.validate()?;

		let mut candidates = self.retrieve(query, &req.filter).await?;

		if candidates.is_empty() {
			tracing::info!(query, "No candidates left after filtering.");

			return Ok(SearchResult::no_match(&req.query, 0, ScoreReport::default()));
		}

		let policy = &req.policy;

		// Filtering leaves candidates cheapest first; the judge budget goes to the nearest ones.
		candidates.sort_by(ordering::cmp_by_similarity);
		candidates.truncate(policy.max_candidates);

		let scorer = Scorer::new(
			self.providers.judge.clone(),
			self.cfg.providers.judge.clone(),
			self.retry.judge,
			policy.judge_timeout,
			policy.max_rerank_workers,
		)?
		.with_cost_per_million_tokens(self.cfg.search.cost_per_million_tokens);

		let result = match policy.mode {
			SearchMode::FirstMatch => {
				let found =
					scorer.first_match(query, candidates, policy.relevance_threshold).await;

				match found.winner {
					Some(winner) => SearchResult {
						description: req.query.clone(),
						outcome: SearchOutcome::Matched { searched: found.searched },
						segments: vec![winner],
						usage: found.report,
					},
					None => SearchResult::no_match(&req.query, found.searched, found.report),
				}
			},
			SearchMode::TopK => {
				let batch = scorer.score_all(query, candidates).await;
				let searched = batch.candidates.len();
				let selection = scoring::select_top_k(&batch.candidates, policy);
				let outcome = match selection.tier {
					SelectionTier::Primary => SearchOutcome::Matched { searched },
					SelectionTier::Secondary | SelectionTier::Fallback =>
						SearchOutcome::Fallback { searched },
					SelectionTier::Empty => SearchOutcome::NoMatch { searched },
				};

				SearchResult {
					description: req.query.clone(),
					outcome,
					segments: selection.segments,
					usage: batch.report,
				}
			},
			SearchMode::Ranked => {
				let batch = scorer.score_all(query, candidates).await;
				let searched = batch.candidates.len();
				let segments = scoring::select_ranked(&batch.candidates, policy.rank_limit);
				let outcome = if segments.is_empty() {
					SearchOutcome::NoMatch { searched }
				} else {
					SearchOutcome::Matched { searched }
				};

				SearchResult { description: req.query.clone(), outcome, segments, usage: batch.report }
			},
		};

		tracing::info!(
			query,
			mode = policy.mode.as_str(),
			outcome = ?result.outcome,
			returned = result.segments.len(),
			"Search finished."
		);

		Ok(result)
	}

	/// Embeds `query`, queries the index, and returns normalized candidates that pass the
	/// location and duplicate filters, cheapest first.
	pub async fn retrieve(
		&self,
		query: &str,
		filter: &Map<String, Value>,
	) -> Result<Vec<SegmentCandidate>> {
		let embedding_cfg = &self.cfg.providers.embedding;
		let texts = vec![query.to_string()];
		let vectors = self
			.retry
			.embedding
			.run(
				"embedding",
				|| self.providers.embedding.embed(embedding_cfg, &texts),
				Error::is_transient,
			)
			.await?;
		let Some(vector) = vectors.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
				transient: false,
			});
		};

		if vector.len() != self.cfg.index.vector_dim as usize {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
				transient: false,
			});
		}

		let candidate_k = self.cfg.index.candidate_k;
		let matches = self
			.retry
			.index
			.run(
				"index",
				|| self.providers.index.query(vector.clone(), candidate_k, filter),
				Error::is_transient,
			)
			.await?;
		let outcome = filter::filter_candidates(self.geo(), candidate::normalize_matches(&matches));

		for rejection in &outcome.rejected {
			tracing::debug!(
				segment_id = %rejection.segment_id,
				location = %rejection.location,
				"Dropped segment mentioning a non-US location."
			);
		}

		tracing::info!(
			retrieved = matches.len(),
			kept = outcome.kept.len(),
			rejected = outcome.rejected.len(),
			duplicates = outcome.duplicates,
			"Candidates filtered."
		);

		Ok(outcome.kept)
	}
}
