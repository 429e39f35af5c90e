use std::collections::HashMap;

use futures::{StreamExt, stream};
use serde_json::{Map, Value};

use segmatch_domain::audience::{Audience, AudienceTree, LeafPath};

use crate::{
	SegmentService,
	scoring::ScoreReport,
	search::{SearchPolicy, SearchRequest, SearchResult},
};

/// One search result per audience leaf, in the same shape as the input tree.
pub type CampaignResults = AudienceTree<SearchResult>;

impl SegmentService {
	/// Searches every leaf description of `audience`, at most `campaign_workers` at a time.
	///
	/// A failed search is recorded as a failed leaf with no segments; the other leaves still run.
	pub async fn run_campaign(
		&self,
		audience: &Audience,
		policy: &SearchPolicy,
		filter: &Map<String, Value>,
	) -> CampaignResults {
		let workers = (self.cfg.search.campaign_workers as usize).max(1);
		let leaves = audience.leaves();
		let total = leaves.len();

		tracing::info!(leaves = total, workers, mode = policy.mode.as_str(), "Campaign started.");

		let mut results: HashMap<LeafPath, SearchResult> = stream::iter(leaves)
			.map(|(path, leaf)| async move {
				let req = SearchRequest::new(leaf.description.clone(), policy.clone())
					.with_filter(filter.clone());
				let result = match self.search(&req).await {
					Ok(result) => result,
					Err(err) => {
						tracing::error!(
							error = %err,
							side = path.side.as_str(),
							category = path.category,
							position = path.position,
							"Search failed for audience description."
						);

						SearchResult::failed(leaf.description.clone(), err.to_string())
					},
				};

				(path, result)
			})
			.buffer_unordered(workers)
			.collect()
			.await;
		let mut usage = ScoreReport::default();

		for result in results.values() {
			usage.merge(&result.usage);
		}

		tracing::info!(
			leaves = total,
			calls = usage.calls,
			estimated_tokens = usage.estimated_tokens,
			estimated_cost = usage.estimated_cost,
			"Campaign finished."
		);

		audience.map_leaves(|path, leaf| {
			results
				.remove(&path)
				.unwrap_or_else(|| SearchResult::failed(leaf.description.clone(), "Search did not run."))
		})
	}
}
