use std::cmp::Ordering;

use crate::candidate::SegmentCandidate;

/// Presentation order: relevance descending, then cheaper first, then larger audience first.
/// Unscored candidates sort after scored ones.
pub fn cmp_by_relevance(a: &SegmentCandidate, b: &SegmentCandidate) -> Ordering {
	cmp_option_desc(a.relevance_score, b.relevance_score).then_with(|| cmp_tie_breaks(a, b))
}

/// Judge submission order: vector similarity descending, then the same
/// price and audience-size tie-breaks.
pub fn cmp_by_similarity(a: &SegmentCandidate, b: &SegmentCandidate) -> Ordering {
	cmp_f32_desc(a.vector_score, b.vector_score).then_with(|| cmp_tie_breaks(a, b))
}

/// Ascending price with missing prices last.
pub fn cmp_by_price(a: &SegmentCandidate, b: &SegmentCandidate) -> Ordering {
	match (a.price(), b.price()) {
		(Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}

fn cmp_tie_breaks(a: &SegmentCandidate, b: &SegmentCandidate) -> Ordering {
	cmp_by_price(a, b).then_with(|| match (a.audience_size(), b.audience_size()) {
		(Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	})
}

fn cmp_option_desc(a: Option<f32>, b: Option<f32>) -> Ordering {
	match (a, b) {
		(Some(a), Some(b)) => cmp_f32_desc(a, b),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}
