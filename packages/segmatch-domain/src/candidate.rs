use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields;

const KEY_SEPARATOR: &str = "_";

/// One raw nearest-neighbour hit as returned by the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMatch {
	pub id: String,
	pub score: f32,
	#[serde(default)]
	pub metadata: Option<Map<String, Value>>,
}

/// A catalogue segment matched for a query, with flattened scalar metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentCandidate {
	pub id: String,
	pub vector_score: f32,
	pub metadata: BTreeMap<String, Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub relevance_score: Option<f32>,
}
impl SegmentCandidate {
	pub fn from_match(raw: &IndexMatch) -> Self {
		let metadata = raw.metadata.as_ref().map(flatten_metadata).unwrap_or_default();

		Self { id: raw.id.clone(), vector_score: raw.score, metadata, relevance_score: None }
	}

	/// Field value rendered as text. Missing and null fields read as an empty string.
	pub fn text(&self, field: &str) -> String {
		match self.metadata.get(field) {
			Some(Value::String(text)) => text.clone(),
			Some(Value::Null) | None => String::new(),
			Some(other) => other.to_string(),
		}
	}

	pub fn name(&self) -> String {
		self.text(fields::NAME)
	}

	pub fn description(&self) -> String {
		self.text(fields::DESCRIPTION)
	}

	pub fn brand(&self) -> String {
		self.text(fields::BRAND)
	}

	/// CPM price, when the catalogue entry carries a numeric one.
	pub fn price(&self) -> Option<f64> {
		self.number(fields::PRICE)
	}

	pub fn audience_size(&self) -> Option<f64> {
		self.number(fields::AUDIENCE_SIZE)
	}

	/// Metadata under display names, with the id as `Segment ID`.
	pub fn display_row(&self) -> BTreeMap<String, Value> {
		let mut row = fields::display_metadata(&self.metadata);

		row.insert(fields::DISPLAY_ID.to_string(), Value::String(self.id.clone()));

		row
	}

	pub fn with_relevance(mut self, score: f32) -> Self {
		self.relevance_score = Some(score);

		self
	}

	fn number(&self, field: &str) -> Option<f64> {
		let value = match self.metadata.get(field)? {
			Value::Number(number) => number.as_f64(),
			Value::String(text) => text.trim().parse::<f64>().ok(),
			_ => None,
		};

		value.filter(|value| value.is_finite())
	}
}

pub fn normalize_matches(matches: &[IndexMatch]) -> Vec<SegmentCandidate> {
	matches.iter().map(SegmentCandidate::from_match).collect()
}

/// Flattens nested metadata into scalar fields.
///
/// Nested objects are joined with `_`. Arrays are kept as a single JSON-encoded string. A second
/// pass re-parses string values; those holding a JSON object are expanded under their own key and
/// the original string is dropped. Anything else, including malformed JSON, is kept verbatim.
pub fn flatten_metadata(metadata: &Map<String, Value>) -> BTreeMap<String, Value> {
	let mut flat = Vec::new();

	flatten_into(&mut flat, metadata, None);

	let mut out = BTreeMap::new();

	for (key, value) in flat {
		let embedded = match &value {
			Value::String(text) => match serde_json::from_str::<Value>(text) {
				Ok(Value::Object(object)) => Some(object),
				_ => None,
			},
			_ => None,
		};

		match embedded {
			Some(object) => {
				let mut nested = Vec::new();

				flatten_into(&mut nested, &object, Some(&key));
				out.extend(nested);
			},
			None => {
				out.insert(key, value);
			},
		}
	}

	out
}

fn flatten_into(out: &mut Vec<(String, Value)>, map: &Map<String, Value>, parent: Option<&str>) {
	for (key, value) in map {
		let full_key = match parent {
			Some(parent) => format!("{parent}{KEY_SEPARATOR}{key}"),
			None => key.clone(),
		};

		match value {
			Value::Object(nested) => flatten_into(out, nested, Some(&full_key)),
			Value::Array(_) => out.push((full_key, Value::String(value.to_string()))),
			scalar => out.push((full_key, scalar.clone())),
		}
	}
}
