use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::{candidate::SegmentCandidate, locations, ordering};

const PATTERN_SIZE_LIMIT: usize = 32 * (1 << 20);

/// Rejects candidates whose text mentions a location from a fixed list.
#[derive(Debug, Clone)]
pub struct GeoFilter {
	pattern: Regex,
}
impl GeoFilter {
	pub fn new<'a, I>(locations: I) -> Result<Self, regex::Error>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut names: Vec<&str> = locations
			.into_iter()
			.map(str::trim)
			.filter(|name| !name.is_empty())
			.collect::<HashSet<_>>()
			.into_iter()
			.collect();

		// Longest first so the reported match is the most specific name.
		names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

		let alternation =
			names.iter().map(|name| regex::escape(name)).collect::<Vec<_>>().join("|");
		let pattern = RegexBuilder::new(&format!(r"\b(?:{alternation})\b"))
			.case_insensitive(true)
			.size_limit(PATTERN_SIZE_LIMIT)
			.build()?;

		Ok(Self { pattern })
	}

	/// Filter over the built-in non-US location list.
	pub fn non_us() -> Result<Self, regex::Error> {
		Self::new(locations::non_us_locations())
	}

	/// The first location mentioned in the candidate's name, description, brand, or id.
	pub fn matched_location(&self, candidate: &SegmentCandidate) -> Option<String> {
		let haystack = [candidate.name(), candidate.description(), candidate.brand()]
			.into_iter()
			.chain(std::iter::once(candidate.id.clone()))
			.collect::<Vec<_>>()
			.join(" ");

		self.pattern.find(&haystack).map(|found| found.as_str().to_string())
	}

	pub fn is_match(&self, candidate: &SegmentCandidate) -> bool {
		self.matched_location(candidate).is_some()
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeoRejection {
	pub segment_id: String,
	pub location: String,
}

#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
	pub kept: Vec<SegmentCandidate>,
	pub rejected: Vec<GeoRejection>,
	pub duplicates: usize,
}

/// Drops candidates that mention a filtered location, orders survivors by ascending price, and
/// removes duplicates so that the cheapest copy of each segment is kept.
pub fn filter_candidates(geo: &GeoFilter, candidates: Vec<SegmentCandidate>) -> FilterOutcome {
	let mut rejected = Vec::new();
	let mut kept = Vec::with_capacity(candidates.len());

	for candidate in candidates {
		match geo.matched_location(&candidate) {
			Some(location) => rejected.push(GeoRejection { segment_id: candidate.id, location }),
			None => kept.push(candidate),
		}
	}

	kept.sort_by(ordering::cmp_by_price);

	let before = kept.len();
	let kept = dedupe(kept);
	let duplicates = before - kept.len();

	FilterOutcome { kept, rejected, duplicates }
}

/// Keeps the first candidate for each (description, name) pair, preserving input order.
pub fn dedupe(candidates: Vec<SegmentCandidate>) -> Vec<SegmentCandidate> {
	let mut seen = HashSet::new();

	candidates
		.into_iter()
		.filter(|candidate| seen.insert((candidate.description(), candidate.name())))
		.collect()
}
