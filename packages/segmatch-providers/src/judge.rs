use reqwest::Client;
use serde_json::Value;

use segmatch_domain::relevance::{self, ScoreScale};

use crate::{Error, Result};

/// Asks the judge model how well `candidate_text` matches `query` and returns its raw reply.
///
/// The caller owns score parsing so that a malformed reply can degrade to zero relevance.
pub async fn judge(
	client: &Client,
	cfg: &segmatch_config::JudgeProviderConfig,
	query: &str,
	candidate_text: &str,
) -> Result<String> {
	let scale = ScoreScale::from_max(cfg.score_scale).ok_or_else(|| Error::InvalidConfig {
		message: "Judge score_scale must be 10 or 100.".to_string(),
	})?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let prompt = relevance::judge_prompt(query, candidate_text, scale);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"max_tokens": cfg.max_tokens,
		"messages": [{ "role": "user", "content": prompt }],
	});
	let headers = crate::auth_headers(&cfg.api_key, &cfg.default_headers)?;
	let json = crate::post_json(client, &url, headers, &body).await?;

	parse_judge_response(json)
}

fn parse_judge_response(json: Value) -> Result<String> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(|content| content.trim().to_string())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Judge response is missing message content.".to_string(),
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_trimmed_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "role": "assistant", "content": "  9\n" } }
			]
		});

		assert_eq!(parse_judge_response(json).expect("parse failed"), "9");
	}

	#[test]
	fn missing_content_is_invalid() {
		let json = serde_json::json!({ "choices": [] });
		let err = parse_judge_response(json).expect_err("expected invalid response");

		assert!(matches!(err, Error::InvalidResponse { .. }));
	}
}
