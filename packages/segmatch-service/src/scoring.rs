//! Concurrent relevance scoring against the judge model.
//!
//! Every batch runs on its own `JoinSet`, gated by a semaphore sized to the batch's worker
//! count. Results are consumed in completion order; the final order is always re-derived by an
//! explicit sort.

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{sync::Semaphore, task::JoinSet};
use tokio_util::sync::CancellationToken;

use segmatch_config::JudgeProviderConfig;
use segmatch_domain::{
	candidate::SegmentCandidate,
	ordering,
	relevance::{self, ScoreParser, ScoreScale},
};
use segmatch_providers::RetryPolicy;

use crate::{Error, RelevanceJudge, Result, search::SearchPolicy};

const MAX_LOGGED_RESPONSE_CHARS: usize = 50;

/// Judge usage for one or more batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreReport {
	pub calls: u64,
	pub estimated_tokens: u64,
	pub estimated_cost: f64,
}
impl ScoreReport {
	pub fn merge(&mut self, other: &Self) {
		self.calls += other.calls;
		self.estimated_tokens += other.estimated_tokens;
		self.estimated_cost += other.estimated_cost;
	}

	fn record(&mut self, tokens: u64, cost_per_million_tokens: f64) {
		self.calls += 1;
		self.estimated_tokens += tokens;
		self.estimated_cost = self.estimated_tokens as f64 / 1_000_000.0 * cost_per_million_tokens;
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionTier {
	/// At least one candidate cleared the primary threshold.
	Primary,
	/// Only candidates above the secondary threshold were found.
	Secondary,
	/// Nothing cleared either threshold; the first `fallback_k` candidates were kept.
	Fallback,
	Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
	pub tier: SelectionTier,
	pub segments: Vec<SegmentCandidate>,
}

#[derive(Debug, Clone)]
pub struct FirstMatch {
	pub winner: Option<SegmentCandidate>,
	/// Number of judge results consumed before stopping.
	pub searched: usize,
	pub report: ScoreReport,
}

#[derive(Debug, Clone)]
pub struct ScoredBatch {
	/// Scored candidates in submission order. Candidates whose task failed are absent.
	pub candidates: Vec<SegmentCandidate>,
	pub report: ScoreReport,
}

#[derive(Clone)]
pub struct Scorer {
	judge: Arc<dyn RelevanceJudge>,
	cfg: Arc<JudgeProviderConfig>,
	retry: RetryPolicy,
	timeout: Duration,
	scale: ScoreScale,
	parser: ScoreParser,
	workers: usize,
	cost_per_million_tokens: f64,
}
impl Scorer {
	pub fn new(
		judge: Arc<dyn RelevanceJudge>,
		cfg: JudgeProviderConfig,
		retry: RetryPolicy,
		timeout: Duration,
		workers: usize,
	) -> Result<Self> {
		let scale = ScoreScale::from_max(cfg.score_scale).ok_or_else(|| Error::Config {
			message: "providers.judge.score_scale must be 10 or 100.".to_string(),
		})?;
		let parser = ScoreParser::new().map_err(|err| Error::Config {
			message: format!("Score pattern failed to compile: {err}."),
		})?;

		Ok(Self {
			judge,
			cfg: Arc::new(cfg),
			retry,
			timeout,
			scale,
			parser,
			workers: workers.max(1),
			cost_per_million_tokens: 0.0,
		})
	}

	pub fn with_cost_per_million_tokens(mut self, cost: f64) -> Self {
		self.cost_per_million_tokens = cost;

		self
	}

	/// Submits candidates in the given order and stops at the first one reaching `threshold`.
	///
	/// Once a winner is seen, tasks still waiting for a worker give up without calling the judge
	/// and running tasks are aborted; their results are never observed.
	pub async fn first_match(
		&self,
		query: &str,
		candidates: Vec<SegmentCandidate>,
		threshold: f32,
	) -> FirstMatch {
		let cancel = CancellationToken::new();
		let mut set = self.spawn_batch(query, candidates, &cancel);
		let mut searched = 0;
		let mut report = ScoreReport::default();
		let mut winner = None;

		while let Some(joined) = set.join_next().await {
			match joined {
				Ok(Some(scored)) => {
					searched += 1;

					report.record(scored.tokens, self.cost_per_million_tokens);

					if scored.candidate.relevance_score.is_some_and(|score| score >= threshold) {
						cancel.cancel();
						set.abort_all();

						winner = Some(scored.candidate);

						break;
					}
				},
				Ok(None) => {},
				Err(err) if err.is_cancelled() => {},
				Err(err) => tracing::error!(error = %err, "Scoring task failed."),
			}
		}

		log_usage(&report, searched);

		FirstMatch { winner, searched, report }
	}

	/// Scores every candidate and returns them in submission order.
	pub async fn score_all(&self, query: &str, candidates: Vec<SegmentCandidate>) -> ScoredBatch {
		let total = candidates.len();
		let cancel = CancellationToken::new();
		let mut set = self.spawn_batch(query, candidates, &cancel);
		let mut slots: Vec<Option<SegmentCandidate>> = vec![None; total];
		let mut report = ScoreReport::default();

		while let Some(joined) = set.join_next().await {
			match joined {
				Ok(Some(scored)) => {
					report.record(scored.tokens, self.cost_per_million_tokens);

					slots[scored.index] = Some(scored.candidate);
				},
				Ok(None) => {},
				Err(err) => tracing::error!(error = %err, "Scoring task failed."),
			}
		}

		let candidates: Vec<SegmentCandidate> = slots.into_iter().flatten().collect();

		log_usage(&report, candidates.len());

		ScoredBatch { candidates, report }
	}

	fn spawn_batch(
		&self,
		query: &str,
		candidates: Vec<SegmentCandidate>,
		cancel: &CancellationToken,
	) -> JoinSet<Option<ScoredCandidate>> {
		let ctx = Arc::new(JudgeContext {
			judge: self.judge.clone(),
			cfg: self.cfg.clone(),
			query: query.to_string(),
			retry: self.retry,
			timeout: self.timeout,
			scale: self.scale,
			parser: self.parser.clone(),
		});
		let semaphore = Arc::new(Semaphore::new(self.workers));
		let mut set = JoinSet::new();

		for (index, candidate) in candidates.into_iter().enumerate() {
			let ctx = ctx.clone();
			let semaphore = semaphore.clone();
			let cancel = cancel.clone();

			set.spawn(async move {
				let _permit = tokio::select! {
					biased;
					_ = cancel.cancelled() => return None,
					permit = semaphore.acquire_owned() => permit.ok()?,
				};
				let text = candidate.description();
				let tokens = relevance::estimate_judge_tokens(&ctx.query, &text);
				let score = tokio::select! {
					biased;
					_ = cancel.cancelled() => return None,
					score = ctx.score(&text) => score,
				};

				Some(ScoredCandidate { index, candidate: candidate.with_relevance(score), tokens })
			});
		}

		set
	}
}

/// Picks the top-K result set from scored candidates.
///
/// Candidates at or above the secondary threshold are ranked together, so when the primary
/// tier is short it is topped up from the secondary tier, up to `top_k`. With no primary hit,
/// the secondary tier alone is kept, capped at `min(secondary_top_k, top_k)`. With neither, the
/// `fallback_k` candidates nearest the query are returned, regardless of relevance.
pub fn select_top_k(scored: &[SegmentCandidate], policy: &SearchPolicy) -> Selection {
	let mut ranked: Vec<SegmentCandidate> = scored
		.iter()
		.filter(|candidate| meets(candidate, policy.secondary_relevance_threshold))
		.cloned()
		.collect();

	ranked.sort_by(ordering::cmp_by_relevance);

	if ranked.iter().any(|candidate| meets(candidate, policy.relevance_threshold)) {
		ranked.truncate(policy.top_k);

		return Selection { tier: SelectionTier::Primary, segments: ranked };
	}
	if !ranked.is_empty() {
		ranked.truncate(policy.secondary_top_k.min(policy.top_k));

		return Selection { tier: SelectionTier::Secondary, segments: ranked };
	}
	if policy.fallback_k > 0 && !scored.is_empty() {
		let mut segments = scored.to_vec();

		segments.sort_by(ordering::cmp_by_similarity);
		segments.truncate(policy.fallback_k);

		return Selection { tier: SelectionTier::Fallback, segments };
	}

	Selection { tier: SelectionTier::Empty, segments: Vec::new() }
}

/// Every scored candidate in presentation order, cut to `limit`.
pub fn select_ranked(scored: &[SegmentCandidate], limit: usize) -> Vec<SegmentCandidate> {
	let mut ranked = scored.to_vec();

	ranked.sort_by(ordering::cmp_by_relevance);
	ranked.truncate(limit);

	ranked
}

struct ScoredCandidate {
	index: usize,
	candidate: SegmentCandidate,
	tokens: u64,
}

struct JudgeContext {
	judge: Arc<dyn RelevanceJudge>,
	cfg: Arc<JudgeProviderConfig>,
	query: String,
	retry: RetryPolicy,
	timeout: Duration,
	scale: ScoreScale,
	parser: ScoreParser,
}
impl JudgeContext {
	/// Relevance in `[0, 1]`. Failures and unparseable replies score 0.
	async fn score(&self, candidate_text: &str) -> f32 {
		let timeout_ms = self.timeout.as_millis() as u64;
		let result = self
			.retry
			.run(
				"judge",
				|| async {
					match tokio::time::timeout(
						self.timeout,
						self.judge.judge(&self.cfg, &self.query, candidate_text),
					)
					.await
					{
						Ok(result) => result,
						Err(_) => Err(Error::Timeout { timeout_ms }),
					}
				},
				Error::is_transient,
			)
			.await;

		match result {
			Ok(response) => match self.parser.parse(&response, self.scale) {
				Some(score) => score,
				None => {
					let preview: String =
						response.chars().take(MAX_LOGGED_RESPONSE_CHARS).collect();

					tracing::warn!(response = %preview, "Judge reply has no numeric score.");

					0.0
				},
			},
			Err(err) => {
				tracing::warn!(error = %err, "Judge call failed. Scoring candidate as 0.");

				0.0
			},
		}
	}
}

fn meets(candidate: &SegmentCandidate, threshold: f32) -> bool {
	candidate.relevance_score.is_some_and(|score| score >= threshold)
}

fn log_usage(report: &ScoreReport, scored: usize) {
	tracing::info!(
		scored,
		calls = report.calls,
		estimated_tokens = report.estimated_tokens,
		estimated_cost = report.estimated_cost,
		"Judge batch finished."
	);
}

#[cfg(test)]
mod tests {
	use std::{
		collections::BTreeMap,
		sync::atomic::{AtomicUsize, Ordering as AtomicOrdering},
	};

	use serde_json::json;

	use super::*;
	use crate::search::SearchMode;

	fn scored(id: &str, relevance: f32, price: Option<f64>) -> SegmentCandidate {
		let mut metadata = BTreeMap::new();

		if let Some(price) = price {
			metadata.insert("CPMRateInAdvertiserCurrency_Amount".to_string(), json!(price));
		}

		SegmentCandidate {
			id: id.to_string(),
			vector_score: 0.5,
			metadata,
			relevance_score: Some(relevance),
		}
	}

	fn policy(primary: f32, secondary: f32) -> SearchPolicy {
		SearchPolicy {
			mode: SearchMode::TopK,
			relevance_threshold: primary,
			secondary_relevance_threshold: secondary,
			top_k: 3,
			secondary_top_k: 3,
			fallback_k: 0,
			max_rerank_workers: 4,
			max_candidates: 50,
			rank_limit: 100,
			judge_timeout: Duration::from_secs(1),
		}
	}

	fn ids(selection: &Selection) -> Vec<&str> {
		selection.segments.iter().map(|candidate| candidate.id.as_str()).collect()
	}

	#[test]
	fn primary_tier_is_topped_up_from_secondary() {
		let scored = vec![
			scored("a", 0.95, None),
			scored("b", 0.40, None),
			scored("c", 0.92, None),
			scored("d", 0.88, None),
			scored("e", 0.10, None),
		];
		let selection = select_top_k(&scored, &policy(0.9, 0.85));

		assert_eq!(selection.tier, SelectionTier::Primary);
		assert_eq!(ids(&selection), vec!["a", "c", "d"]);
	}

	#[test]
	fn secondary_tier_used_when_primary_is_empty() {
		let scored = vec![
			scored("a", 0.86, None),
			scored("b", 0.2, None),
			scored("c", 0.87, None),
		];
		let selection = select_top_k(&scored, &policy(0.9, 0.85));

		assert_eq!(selection.tier, SelectionTier::Secondary);
		assert_eq!(ids(&selection), vec!["c", "a"]);
	}

	#[test]
	fn secondary_tier_respects_its_own_cap() {
		let scored: Vec<_> =
			(0..5).map(|i| scored(&format!("s{i}"), 0.86 + i as f32 * 0.001, None)).collect();
		let mut narrow = policy(0.9, 0.85);

		narrow.secondary_top_k = 2;

		assert_eq!(select_top_k(&scored, &narrow).segments.len(), 2);
	}

	#[test]
	fn fallback_keeps_input_order() {
		let scored = vec![scored("a", 0.1, None), scored("b", 0.3, None), scored("c", 0.2, None)];
		let mut with_fallback = policy(0.9, 0.85);

		with_fallback.fallback_k = 2;

		let selection = select_top_k(&scored, &with_fallback);

		assert_eq!(selection.tier, SelectionTier::Fallback);
		assert_eq!(ids(&selection), vec!["a", "b"]);
		assert_eq!(select_top_k(&scored, &policy(0.9, 0.85)).tier, SelectionTier::Empty);
	}

	#[test]
	fn ties_break_on_price() {
		let scored = vec![
			scored("pricey", 0.95, Some(3.0)),
			scored("unpriced", 0.95, None),
			scored("cheap", 0.95, Some(1.0)),
		];
		let selection = select_top_k(&scored, &policy(0.9, 0.85));

		assert_eq!(ids(&selection), vec!["cheap", "pricey", "unpriced"]);
	}

	#[test]
	fn raising_the_threshold_never_grows_the_result() {
		let scores = [0.99, 0.97, 0.95, 0.93, 0.91, 0.89, 0.87, 0.86, 0.5, 0.1];
		let scored: Vec<_> =
			scores.iter().enumerate().map(|(i, s)| scored(&format!("c{i}"), *s, None)).collect();
		let mut previous = usize::MAX;

		for step in 0..=15 {
			let threshold = 0.85 + step as f32 * 0.01;
			let size = select_top_k(&scored, &policy(threshold, 0.85)).segments.len();

			assert!(size <= previous, "size grew at threshold {threshold}");

			previous = size;
		}
	}

	#[test]
	fn ranked_selection_ignores_thresholds() {
		let scored = vec![scored("a", 0.1, None), scored("b", 0.3, None), scored("c", 0.2, None)];
		let ranked = select_ranked(&scored, 2);
		let ids: Vec<&str> = ranked.iter().map(|candidate| candidate.id.as_str()).collect();

		assert_eq!(ids, vec!["b", "c"]);
	}

	#[test]
	fn report_accumulates_cost() {
		let mut report = ScoreReport::default();

		report.record(400_000, 0.5);
		report.record(600_000, 0.5);

		assert_eq!(report.calls, 2);
		assert_eq!(report.estimated_tokens, 1_000_000);
		assert!((report.estimated_cost - 0.5).abs() < 1e-9);
	}

	#[test]
	fn fallback_takes_nearest_candidates_not_cheapest() {
		let mut nearest = scored("nearest", 0.0, Some(9.0));
		let mut mid = scored("mid", 0.0, Some(2.0));
		let mut far = scored("far", 0.0, Some(1.0));

		nearest.vector_score = 0.99;
		mid.vector_score = 0.70;
		far.vector_score = 0.10;

		let mut with_fallback = policy(0.9, 0.85);

		with_fallback.fallback_k = 1;

		let selection = select_top_k(&[far, mid, nearest], &with_fallback);

		assert_eq!(selection.tier, SelectionTier::Fallback);
		assert_eq!(ids(&selection), vec!["nearest"]);
	}

	struct CountingJudge {
		calls: AtomicUsize,
	}
	impl RelevanceJudge for CountingJudge {
		fn judge<'a>(
			&'a self,
			_cfg: &'a JudgeProviderConfig,
			_query: &'a str,
			_candidate_text: &'a str,
		) -> crate::BoxFuture<'a, Result<String>> {
			self.calls.fetch_add(1, AtomicOrdering::SeqCst);

			Box::pin(async { Ok("90".to_string()) })
		}
	}

	fn judge_config() -> JudgeProviderConfig {
		serde_json::from_value(json!({
			"provider_id": "stub",
			"api_base": "http://127.0.0.1:1",
			"api_key": "test-key",
			"path": "/chat/completions",
			"model": "stub-judge",
			"temperature": 0.0,
			"max_tokens": 10,
			"score_scale": 100,
			"timeout_ms": 1000
		}))
		.expect("judge config must parse")
	}

	#[tokio::test]
	async fn cancelled_batch_never_reaches_the_judge() {
		let judge = Arc::new(CountingJudge { calls: AtomicUsize::new(0) });
		let scorer = Scorer::new(
			judge.clone(),
			judge_config(),
			RetryPolicy::none(),
			Duration::from_secs(1),
			1,
		)
		.expect("scorer must build");
		let cancel = CancellationToken::new();

		cancel.cancel();

		let candidates = vec![scored("a", 0.0, None), scored("b", 0.0, None)];
		let mut set = scorer.spawn_batch("vegan", candidates, &cancel);
		let mut scored_count = 0;

		while let Some(joined) = set.join_next().await {
			if joined.expect("task must not panic").is_some() {
				scored_count += 1;
			}
		}

		assert_eq!(scored_count, 0);
		assert_eq!(judge.calls.load(AtomicOrdering::SeqCst), 0);
	}
}
