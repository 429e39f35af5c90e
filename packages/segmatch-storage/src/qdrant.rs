use std::collections::HashMap;

use qdrant_client::qdrant::{
	Condition, Filter, PointId, Query, QueryPointsBuilder, ScoredPoint, Value as QdrantValue,
	point_id::PointIdOptions, value::Kind,
};
use serde_json::{Map, Number, Value};

use segmatch_domain::candidate::IndexMatch;

use crate::{Error, Result};

/// Payload keys checked, in order, for a segment identifier before falling back to the point id.
const PAYLOAD_ID_KEYS: [&str; 2] = ["id", "segment_id"];

pub struct QdrantIndex {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantIndex {
	pub fn new(cfg: &segmatch_config::Index) -> Result<Self> {
		let mut builder = qdrant_client::Qdrant::from_url(&cfg.url);

		if let Some(api_key) = &cfg.api_key {
			builder = builder.api_key(api_key.clone());
		}

		let client = builder.build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Nearest-neighbour query returning up to `top_k` matches with their full metadata.
	pub async fn query(
		&self,
		vector: Vec<f32>,
		top_k: u32,
		filter: &Map<String, Value>,
	) -> Result<Vec<IndexMatch>> {
		if vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Query vector has {} dimensions; the index expects {}.",
				vector.len(),
				self.vector_dim
			)));
		}

		let mut search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector))
			.limit(top_k as u64)
			.with_payload(true);

		if let Some(filter) = build_filter(filter)? {
			search = search.filter(filter);
		}

		let response = self.client.query(search).await?;

		tracing::debug!(
			collection = %self.collection,
			returned = response.result.len(),
			"Index query completed."
		);

		Ok(response.result.into_iter().map(scored_point_to_match).collect())
	}
}

/// Translates a metadata filter into a Qdrant filter.
///
/// Each entry is either a scalar or list (exact match), or an object with one of
/// `$eq`, `$in`, `$ne`, `$nin`.
pub fn build_filter(filter: &Map<String, Value>) -> Result<Option<Filter>> {
	if filter.is_empty() {
		return Ok(None);
	}

	let mut must = Vec::new();
	let mut must_not = Vec::new();

	for (key, value) in filter {
		match value {
			Value::Object(ops) => {
				for (op, operand) in ops {
					let condition = match_condition(key, operand)?;

					match op.as_str() {
						"$eq" | "$in" => must.push(condition),
						"$ne" | "$nin" => must_not.push(condition),
						_ => {
							return Err(Error::InvalidArgument(format!(
								"Unsupported filter operator {op} on {key}."
							)));
						},
					}
				}
			},
			_ => must.push(match_condition(key, value)?),
		}
	}

	Ok(Some(Filter { must, must_not, ..Default::default() }))
}

fn match_condition(key: &str, value: &Value) -> Result<Condition> {
	let condition = match value {
		Value::String(text) => Condition::matches(key, text.clone()),
		Value::Bool(flag) => Condition::matches(key, *flag),
		Value::Number(number) => match number.as_i64() {
			Some(int) => Condition::matches(key, int),
			None => {
				return Err(Error::InvalidArgument(format!(
					"Filter on {key} must use an integer, not {number}."
				)));
			},
		},
		Value::Array(items) if items.iter().all(Value::is_string) => Condition::matches(
			key,
			items.iter().filter_map(|item| item.as_str().map(str::to_string)).collect::<Vec<_>>(),
		),
		Value::Array(items) if items.iter().all(Value::is_i64) => Condition::matches(
			key,
			items.iter().filter_map(Value::as_i64).collect::<Vec<_>>(),
		),
		_ => {
			return Err(Error::InvalidArgument(format!(
				"Filter on {key} must be a string, boolean, integer, or a list of one of those."
			)));
		},
	};

	Ok(condition)
}

fn scored_point_to_match(point: ScoredPoint) -> IndexMatch {
	let metadata = payload_to_json(&point.payload);
	let id = PAYLOAD_ID_KEYS
		.iter()
		.find_map(|key| metadata.get(*key).and_then(scalar_text))
		.or_else(|| point.id.as_ref().and_then(point_id_text))
		.unwrap_or_default();

	IndexMatch { id, score: point.score, metadata: Some(metadata) }
}

fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::String(text) if !text.is_empty() => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

fn point_id_text(point_id: &PointId) -> Option<String> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Num(num)) => Some(num.to_string()),
		Some(PointIdOptions::Uuid(id)) => Some(id.clone()),
		None => None,
	}
}

pub fn payload_to_json(payload: &HashMap<String, QdrantValue>) -> Map<String, Value> {
	payload.iter().map(|(key, value)| (key.clone(), value_to_json(value))).collect()
}

fn value_to_json(value: &QdrantValue) -> Value {
	match &value.kind {
		None | Some(Kind::NullValue(_)) => Value::Null,
		Some(Kind::BoolValue(flag)) => Value::Bool(*flag),
		Some(Kind::IntegerValue(int)) => Value::Number((*int).into()),
		Some(Kind::DoubleValue(double)) =>
			Number::from_f64(*double).map(Value::Number).unwrap_or(Value::Null),
		Some(Kind::StringValue(text)) => Value::String(text.clone()),
		Some(Kind::ListValue(list)) => Value::Array(list.values.iter().map(value_to_json).collect()),
		Some(Kind::StructValue(object)) => Value::Object(payload_to_json(&object.fields)),
	}
}

#[cfg(test)]
mod tests {
	use qdrant_client::qdrant::{ListValue, Struct};
	use serde_json::json;

	use super::*;

	fn qv(kind: Kind) -> QdrantValue {
		QdrantValue { kind: Some(kind) }
	}

	#[test]
	fn empty_filter_is_omitted() {
		assert!(build_filter(&Map::new()).expect("empty filter must build").is_none());
	}

	#[test]
	fn splits_positive_and_negative_conditions() {
		let filter = json!({
			"BrandName": "Acme",
			"Category": { "$in": ["Pets", "Food"] },
			"Tier": { "$ne": 3 },
			"Active": true,
		});
		let built = build_filter(filter.as_object().expect("object"))
			.expect("filter must build")
			.expect("filter must be present");

		assert_eq!(built.must.len(), 3);
		assert_eq!(built.must_not.len(), 1);
	}

	#[test]
	fn rejects_unsupported_filters() {
		let float = json!({ "Price": 1.5 });
		let op = json!({ "Price": { "$gt": 1 } });
		let mixed = json!({ "Tags": ["a", 1] });

		for filter in [float, op, mixed] {
			let err = build_filter(filter.as_object().expect("object"))
				.expect_err("filter must be rejected");

			assert!(matches!(err, Error::InvalidArgument(_)));
		}
	}

	#[test]
	fn converts_nested_payloads() {
		let mut inner = HashMap::new();

		inner.insert("Amount".to_string(), qv(Kind::DoubleValue(1.25)));

		let mut payload = HashMap::new();

		payload.insert("Name".to_string(), qv(Kind::StringValue("Pet Owners".to_string())));
		payload.insert("UniqueUserCount".to_string(), qv(Kind::IntegerValue(1200)));
		payload.insert(
			"CPMRateInAdvertiserCurrency".to_string(),
			qv(Kind::StructValue(Struct { fields: inner })),
		);
		payload.insert(
			"Tags".to_string(),
			qv(Kind::ListValue(ListValue {
				values: vec![qv(Kind::StringValue("a".to_string())), qv(Kind::BoolValue(true))],
			})),
		);
		payload.insert("Empty".to_string(), qv(Kind::NullValue(0)));

		let json = Value::Object(payload_to_json(&payload));

		assert_eq!(
			json,
			json!({
				"Name": "Pet Owners",
				"UniqueUserCount": 1200,
				"CPMRateInAdvertiserCurrency": { "Amount": 1.25 },
				"Tags": ["a", true],
				"Empty": null,
			})
		);
	}

	#[test]
	fn prefers_payload_id_over_point_id() {
		let mut payload = HashMap::new();

		payload.insert("segment_id".to_string(), qv(Kind::StringValue("seg-42".to_string())));

		let point = ScoredPoint {
			id: Some(PointId { point_id_options: Some(PointIdOptions::Num(7)) }),
			payload,
			score: 0.42,
			..Default::default()
		};
		let found = scored_point_to_match(point);

		assert_eq!(found.id, "seg-42");
		assert_eq!(found.score, 0.42);

		let anonymous = ScoredPoint {
			id: Some(PointId { point_id_options: Some(PointIdOptions::Num(7)) }),
			score: 0.1,
			..Default::default()
		};

		assert_eq!(scored_point_to_match(anonymous).id, "7");
	}
}
