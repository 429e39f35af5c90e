//! Reshapes campaign results for downstream consumers.

use serde::{Deserialize, Serialize};

use segmatch_domain::{
	audience::{Audience, AudienceTree},
	candidate::SegmentCandidate,
};

use crate::campaign::CampaignResults;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSummary {
	pub segment_id: String,
	pub name: String,
	pub brand: String,
	pub description: String,
}
impl From<&SegmentCandidate> for SegmentSummary {
	fn from(candidate: &SegmentCandidate) -> Self {
		Self {
			segment_id: candidate.id.clone(),
			name: candidate.name(),
			brand: candidate.brand(),
			description: candidate.description(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledLeaf {
	pub description: String,
	pub segments: Vec<SegmentSummary>,
}

pub type AssembledAudience = AudienceTree<AssembledLeaf>;

/// One matched segment as methodology research consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchInput {
	pub segment_text: String,
	pub brand: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySegment {
	#[serde(rename = "raw_string")]
	pub description: String,
	#[serde(rename = "BrandName")]
	pub brand: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLeaf {
	pub description: String,
	pub segments: Vec<SummarySegment>,
}

/// Rebuilds the audience tree with the projected segments found for each leaf.
///
/// Leaves without a result keep their description and get no segments.
pub fn assemble(audience: &Audience, results: &CampaignResults) -> AssembledAudience {
	audience.map_leaves(|path, leaf| {
		let segments: Vec<SegmentSummary> = results
			.side(path.side)
			.get(path.category)
			.and_then(|group| group.descriptions.get(path.position))
			.map(|result| result.segments.iter().map(SegmentSummary::from).collect())
			.unwrap_or_default();

		AssembledLeaf { description: leaf.description.clone(), segments }
	})
}

/// Every assembled segment, included before excluded, in tree order.
pub fn research_inputs(assembled: &AssembledAudience) -> Vec<ResearchInput> {
	assembled
		.leaves()
		.into_iter()
		.flat_map(|(_, leaf)| &leaf.segments)
		.map(|segment| ResearchInput {
			segment_text: segment.description.clone(),
			brand: segment.brand.clone(),
		})
		.collect()
}

/// Keeps only each segment's description text and brand.
pub fn summarize(assembled: &AssembledAudience) -> AudienceTree<SummaryLeaf> {
	assembled.map_leaves(|_, leaf| SummaryLeaf {
		description: leaf.description.clone(),
		segments: leaf
			.segments
			.iter()
			.map(|segment| SummarySegment {
				description: segment.description.clone(),
				brand: segment.brand.clone(),
			})
			.collect(),
	})
}
