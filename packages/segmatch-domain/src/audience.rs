//! The included/excluded audience tree produced by upstream planning.
//!
//! On the wire a tree looks like
//! `{"Audience": {"included": {"<category>": [..]}, "excluded": {"<category>": [..]}}}`.
//! Category order is kept exactly as it appears in the input.

use std::{fmt, marker::PhantomData};

use serde::{
	Deserialize, Deserializer, Serialize, Serializer,
	de::{MapAccess, Visitor},
	ser::SerializeMap,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudienceSide {
	Included,
	Excluded,
}
impl AudienceSide {
	pub const ALL: [Self; 2] = [Self::Included, Self::Excluded];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Included => "included",
			Self::Excluded => "excluded",
		}
	}
}

/// Position of one leaf: side, category index, and index within the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LeafPath {
	pub side: AudienceSide,
	pub category: usize,
	pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDescription {
	pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<T> {
	pub name: String,
	pub descriptions: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct AudienceTree<T> {
	#[serde(default, with = "category_map")]
	pub included: Vec<CategoryGroup<T>>,
	#[serde(default, with = "category_map")]
	pub excluded: Vec<CategoryGroup<T>>,
}
impl<T> AudienceTree<T> {
	pub fn side(&self, side: AudienceSide) -> &[CategoryGroup<T>] {
		match side {
			AudienceSide::Included => &self.included,
			AudienceSide::Excluded => &self.excluded,
		}
	}

	/// Every leaf, included before excluded, categories and entries in input order.
	pub fn leaves(&self) -> Vec<(LeafPath, &T)> {
		let mut out = Vec::with_capacity(self.leaf_count());

		for side in AudienceSide::ALL {
			for (category, group) in self.side(side).iter().enumerate() {
				for (position, leaf) in group.descriptions.iter().enumerate() {
					out.push((LeafPath { side, category, position }, leaf));
				}
			}
		}

		out
	}

	pub fn leaf_count(&self) -> usize {
		self.included.iter().chain(&self.excluded).map(|group| group.descriptions.len()).sum()
	}

	/// Rebuilds the same shape with every leaf replaced by `f(path, leaf)`.
	pub fn map_leaves<U, F>(&self, mut f: F) -> AudienceTree<U>
	where
		F: FnMut(LeafPath, &T) -> U,
	{
		let mut map_side = |side: AudienceSide| {
			self.side(side)
				.iter()
				.enumerate()
				.map(|(category, group)| CategoryGroup {
					name: group.name.clone(),
					descriptions: group
						.descriptions
						.iter()
						.enumerate()
						.map(|(position, leaf)| f(LeafPath { side, category, position }, leaf))
						.collect(),
				})
				.collect::<Vec<_>>()
		};
		let included = map_side(AudienceSide::Included);
		let excluded = map_side(AudienceSide::Excluded);

		AudienceTree { included, excluded }
	}
}

pub type Audience = AudienceTree<SegmentDescription>;

/// Top-level `{"Audience": ..}` wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: Deserialize<'de>"))]
pub struct AudienceDocument<T> {
	#[serde(rename = "Audience")]
	pub audience: AudienceTree<T>,
}

mod category_map {
	use super::*;

	pub fn serialize<S, T>(groups: &Vec<CategoryGroup<T>>, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
		T: Serialize,
	{
		let mut map = serializer.serialize_map(Some(groups.len()))?;

		for group in groups {
			map.serialize_entry(&group.name, &group.descriptions)?;
		}

		map.end()
	}

	pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<CategoryGroup<T>>, D::Error>
	where
		D: Deserializer<'de>,
		T: Deserialize<'de>,
	{
		deserializer.deserialize_map(CategoryMapVisitor(PhantomData))
	}

	struct CategoryMapVisitor<T>(PhantomData<T>);
	impl<'de, T> Visitor<'de> for CategoryMapVisitor<T>
	where
		T: Deserialize<'de>,
	{
		type Value = Vec<CategoryGroup<T>>;

		fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			f.write_str("a map of category names to lists")
		}

		fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
		where
			A: MapAccess<'de>,
		{
			let mut groups = Vec::with_capacity(access.size_hint().unwrap_or(0));

			while let Some((name, descriptions)) = access.next_entry::<String, Vec<T>>()? {
				groups.push(CategoryGroup { name, descriptions });
			}

			Ok(groups)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = r#"{
		"Audience": {
			"included": {
				"Lifestyle": [
					{ "description": "vegan households" },
					{ "description": "budget-conscious grocery shoppers" }
				],
				"Demographics": [{ "description": "parents of toddlers" }]
			},
			"excluded": {
				"Competitors": [{ "description": "meat subscription box buyers" }]
			}
		}
	}"#;

	#[test]
	fn keeps_category_input_order() {
		let doc: AudienceDocument<SegmentDescription> =
			serde_json::from_str(SAMPLE).expect("sample must parse");
		let names: Vec<&str> =
			doc.audience.included.iter().map(|group| group.name.as_str()).collect();

		assert_eq!(names, vec!["Lifestyle", "Demographics"]);
		assert_eq!(doc.audience.leaf_count(), 4);
	}

	#[test]
	fn leaves_visit_included_first() {
		let doc: AudienceDocument<SegmentDescription> =
			serde_json::from_str(SAMPLE).expect("sample must parse");
		let leaves: Vec<(LeafPath, &str)> = doc
			.audience
			.leaves()
			.into_iter()
			.map(|(path, leaf)| (path, leaf.description.as_str()))
			.collect();

		assert_eq!(leaves.len(), 4);
		assert_eq!(leaves[0].1, "vegan households");
		assert_eq!(leaves[2].0, LeafPath { side: AudienceSide::Included, category: 1, position: 0 });
		assert_eq!(leaves[3].0.side, AudienceSide::Excluded);
	}

	#[test]
	fn map_leaves_preserves_shape() {
		let doc: AudienceDocument<SegmentDescription> =
			serde_json::from_str(SAMPLE).expect("sample must parse");
		let lengths = doc.audience.map_leaves(|_, leaf| leaf.description.len());

		assert_eq!(lengths.included[0].descriptions, vec![16, 33]);
		assert_eq!(lengths.excluded[0].name, "Competitors");
	}

	#[test]
	fn missing_side_defaults_to_empty() {
		let doc: AudienceDocument<SegmentDescription> =
			serde_json::from_str(r#"{"Audience": {"included": {}}}"#).expect("must parse");

		assert!(doc.audience.excluded.is_empty());
		assert_eq!(doc.audience.leaf_count(), 0);
	}

	#[test]
	fn serializes_back_to_category_maps() {
		let doc: AudienceDocument<SegmentDescription> =
			serde_json::from_str(SAMPLE).expect("sample must parse");
		let value = serde_json::to_value(&doc).expect("must serialize");

		assert_eq!(
			value["Audience"]["excluded"]["Competitors"][0]["description"],
			"meat subscription box buyers"
		);
	}
}
