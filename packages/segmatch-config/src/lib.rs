mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Index, JudgeProviderConfig, Providers, Retry,
	RetryPolicyConfig, Search, Service,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.index.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match index.vector_dim.".to_string(),
		});
	}
	if !matches!(cfg.providers.judge.score_scale, 10 | 100) {
		return Err(Error::Validation {
			message: "providers.judge.score_scale must be 10 or 100.".to_string(),
		});
	}
	if cfg.providers.judge.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.judge.max_tokens must be greater than zero.".to_string(),
		});
	}
	if cfg.index.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "index.collection must be non-empty.".to_string(),
		});
	}
	if cfg.index.candidate_k == 0 {
		return Err(Error::Validation {
			message: "index.candidate_k must be greater than zero.".to_string(),
		});
	}

	let mode = cfg.search.mode.as_str();

	if !matches!(mode, "first_match" | "top_k" | "ranked") {
		return Err(Error::Validation {
			message: "search.mode must be one of first_match, top_k, or ranked.".to_string(),
		});
	}

	for (label, value) in [
		("search.relevance_threshold", cfg.search.relevance_threshold),
		("search.secondary_relevance_threshold", cfg.search.secondary_relevance_threshold),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	if cfg.search.secondary_relevance_threshold > cfg.search.relevance_threshold {
		return Err(Error::Validation {
			message: "search.secondary_relevance_threshold must not exceed search.relevance_threshold."
				.to_string(),
		});
	}

	for (label, value) in [
		("search.top_k", cfg.search.top_k),
		("search.max_rerank_workers", cfg.search.max_rerank_workers),
		("search.max_candidates", cfg.search.max_candidates),
		("search.campaign_workers", cfg.search.campaign_workers),
		("search.rank_limit", cfg.search.rank_limit),
	] {
		if value == 0 {
			return Err(Error::Validation { message: format!("{label} must be greater than zero.") });
		}
	}

	if cfg.search.judge_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "search.judge_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.search.cost_per_million_tokens.is_finite() || cfg.search.cost_per_million_tokens < 0.0
	{
		return Err(Error::Validation {
			message: "search.cost_per_million_tokens must be a finite number, zero or greater."
				.to_string(),
		});
	}

	for (label, policy) in [
		("retry.judge", &cfg.retry.judge),
		("retry.embedding", &cfg.retry.embedding),
		("retry.index", &cfg.retry.index),
	] {
		validate_retry(label, policy)?;
	}

	for (label, key) in
		[("embedding", &cfg.providers.embedding.api_key), ("judge", &cfg.providers.judge.api_key)]
	{
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	Ok(())
}

fn validate_retry(label: &str, policy: &RetryPolicyConfig) -> Result<()> {
	if policy.max_attempts == 0 {
		return Err(Error::Validation {
			message: format!("{label}.max_attempts must be greater than zero."),
		});
	}
	if policy.initial_backoff_ms > policy.max_backoff_ms {
		return Err(Error::Validation {
			message: format!("{label}.initial_backoff_ms must not exceed {label}.max_backoff_ms."),
		});
	}
	if !policy.multiplier.is_finite() || policy.multiplier < 1.0 {
		return Err(Error::Validation {
			message: format!("{label}.multiplier must be a finite number of at least 1.0."),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.index.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.index.api_key = None;
	}

	cfg.search.mode = cfg.search.mode.trim().to_ascii_lowercase();
}
