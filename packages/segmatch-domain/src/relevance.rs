use regex::Regex;
use serde::{Deserialize, Serialize};

const FIRST_NUMBER: &str = r"\d+(?:\.\d+)?";

/// The upper bound of the rating a judge prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreScale {
	Ten,
	Hundred,
}
impl ScoreScale {
	pub fn from_max(max: u32) -> Option<Self> {
		match max {
			10 => Some(Self::Ten),
			100 => Some(Self::Hundred),
			_ => None,
		}
	}

	pub fn max(self) -> u32 {
		match self {
			Self::Ten => 10,
			Self::Hundred => 100,
		}
	}
}

/// Builds the single-turn judge prompt comparing a desired segment with a catalogue segment.
pub fn judge_prompt(query: &str, candidate_text: &str, scale: ScoreScale) -> String {
	let max = scale.max();

	format!(
		"On a scale of 0 to {max}, how similar is the actual segment to the desired segment?\n\n\
Desired segment: \"{query}\"\n\n\
Actual segment: \"{candidate_text}\"\n\n\
Provide only a numeric score between 0 and {max}, where 0 is not relevant at all and {max} is \
extremely relevant.\n\
If an actual segment has a non-us location mentioned in it, give it a 0.\n"
	)
}

/// Reads the first number in a judge response and maps it onto `[0, 1]`.
#[derive(Debug, Clone)]
pub struct ScoreParser {
	first_number: Regex,
}
impl ScoreParser {
	pub fn new() -> Result<Self, regex::Error> {
		Ok(Self { first_number: Regex::new(FIRST_NUMBER)? })
	}

	/// Returns `None` when the response has no digits at all.
	pub fn parse(&self, response: &str, scale: ScoreScale) -> Option<f32> {
		let found = self.first_number.find(response)?;
		let raw: f32 = found.as_str().parse().ok()?;

		Some((raw / scale.max() as f32).clamp(0.0, 1.0))
	}
}

/// Rough input-token estimate for one judge call: whitespace words of both texts.
pub fn estimate_judge_tokens(query: &str, candidate_text: &str) -> u64 {
	(query.split_whitespace().count() + candidate_text.split_whitespace().count()) as u64
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse_relevance_score(response: &str, scale: ScoreScale) -> Option<f32> {
		ScoreParser::new().expect("pattern must compile").parse(response, scale)
	}

	#[test]
	fn parses_first_number_on_ten_scale() {
		let score = parse_relevance_score(
			"I think this is pretty relevant, maybe an 8 out of 10",
			ScoreScale::Ten,
		);

		assert_eq!(score, Some(0.8));
	}

	#[test]
	fn parses_decimals_on_hundred_scale() {
		assert_eq!(parse_relevance_score("Score: 92.5", ScoreScale::Hundred), Some(0.925));
		assert_eq!(parse_relevance_score("88", ScoreScale::Hundred), Some(0.88));
	}

	#[test]
	fn clamps_out_of_range_ratings() {
		assert_eq!(parse_relevance_score("150", ScoreScale::Hundred), Some(1.0));
		assert_eq!(parse_relevance_score("-3", ScoreScale::Ten), Some(0.3));
	}

	#[test]
	fn no_digits_means_no_score() {
		assert_eq!(parse_relevance_score("Not relevant at all.", ScoreScale::Ten), None);
		assert_eq!(parse_relevance_score("", ScoreScale::Hundred), None);
	}

	#[test]
	fn prompt_mentions_both_segments_and_scale() {
		let prompt = judge_prompt("vegan households", "Diet > Vegan", ScoreScale::Hundred);

		assert!(prompt.contains("On a scale of 0 to 100"));
		assert!(prompt.contains("Desired segment: \"vegan households\""));
		assert!(prompt.contains("Actual segment: \"Diet > Vegan\""));
	}

	#[test]
	fn scale_round_trips_through_max() {
		assert_eq!(ScoreScale::from_max(100).map(ScoreScale::max), Some(100));
		assert_eq!(ScoreScale::from_max(7), None);
	}
}
