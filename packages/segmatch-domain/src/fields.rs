//! Canonical catalogue field names as they appear after metadata flattening.

use std::collections::BTreeMap;

use serde_json::Value;

pub const NAME: &str = "Name";
pub const DESCRIPTION: &str = "raw_string";
pub const BRAND: &str = "BrandName";
pub const PRICE: &str = "CPMRateInAdvertiserCurrency_Amount";
pub const AUDIENCE_SIZE: &str = "UniqueUserCount";

pub const DISPLAY_ID: &str = "Segment ID";

/// Human-readable column names used by reports and exports.
pub const DISPLAY_NAMES: [(&str, &str); 5] = [
	(NAME, "Segment Name"),
	(BRAND, "Brand Name"),
	(DESCRIPTION, "Segment Description"),
	(AUDIENCE_SIZE, "Unique User Count"),
	(PRICE, "CPM Rate"),
];

pub fn display_name(field: &str) -> Option<&'static str> {
	DISPLAY_NAMES.iter().find(|(canonical, _)| *canonical == field).map(|(_, display)| *display)
}

/// Renames canonical keys to their display names. Unknown keys pass through unchanged.
pub fn display_metadata(metadata: &BTreeMap<String, Value>) -> BTreeMap<String, Value> {
	metadata
		.iter()
		.map(|(key, value)| {
			let key = display_name(key).map(str::to_string).unwrap_or_else(|| key.clone());

			(key, value.clone())
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renames_known_fields_only() {
		let mut metadata = BTreeMap::new();

		metadata.insert(NAME.to_string(), Value::from("Vegan Shoppers"));
		metadata.insert("Provider".to_string(), Value::from("acme"));

		let display = display_metadata(&metadata);

		assert_eq!(display.get("Segment Name"), Some(&Value::from("Vegan Shoppers")));
		assert_eq!(display.get("Provider"), Some(&Value::from("acme")));
		assert!(!display.contains_key(NAME));
	}
}
