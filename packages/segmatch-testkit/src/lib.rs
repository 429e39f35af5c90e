mod error;

pub use error::{Error, Result};

use std::{
	collections::{HashMap, HashSet},
	sync::{
		Mutex,
		atomic::{AtomicU32, AtomicUsize, Ordering},
	},
	time::Duration,
};

use serde_json::{Map, Value};

use segmatch_config::{Config, EmbeddingProviderConfig, JudgeProviderConfig};
use segmatch_domain::{
	audience::{Audience, AudienceDocument},
	candidate::IndexMatch,
};
use segmatch_service::{BoxFuture, EmbeddingProvider, RelevanceJudge, VectorIndex};

const CONFIG_TEMPLATE: &str = r#"
[service]
log_level = "debug"

[providers.embedding]
provider_id = "stub"
api_base    = "http://127.0.0.1:1"
api_key     = "test-key"
path        = "/embeddings"
model       = "stub-embedding"
dimensions  = 4
timeout_ms  = 1000

[providers.judge]
provider_id = "stub"
api_base    = "http://127.0.0.1:1"
api_key     = "test-key"
path        = "/chat/completions"
model       = "stub-judge"
score_scale = 100
timeout_ms  = 1000

[index]
url         = "http://127.0.0.1:6334"
collection  = "segments_test"
vector_dim  = 4
candidate_k = 50

[search]
mode                          = "top_k"
relevance_threshold           = 0.9
secondary_relevance_threshold = 0.85
top_k                         = 3
max_rerank_workers            = 8
max_candidates                = 50
judge_timeout_ms              = 2000
"#;

/// A valid configuration wired for the stub providers in this crate.
pub fn test_config() -> Result<Config> {
	let cfg: Config = toml::from_str(CONFIG_TEMPLATE)?;

	segmatch_config::validate(&cfg)?;

	Ok(cfg)
}

pub fn audience_fixture(raw: &str) -> Result<Audience> {
	let doc: AudienceDocument<segmatch_domain::audience::SegmentDescription> =
		serde_json::from_str(raw)
			.map_err(|err| Error::Message(format!("Failed to parse audience fixture: {err}.")))?;

	Ok(doc.audience)
}

/// An index hit carrying the canonical catalogue fields.
pub fn segment_match(
	id: &str,
	score: f32,
	name: &str,
	description: &str,
	brand: &str,
	price: Option<f64>,
) -> IndexMatch {
	let mut metadata = Map::new();

	metadata.insert("Name".to_string(), Value::from(name));
	metadata.insert("raw_string".to_string(), Value::from(description));
	metadata.insert("BrandName".to_string(), Value::from(brand));

	if let Some(price) = price {
		metadata.insert(
			"CPMRateInAdvertiserCurrency".to_string(),
			serde_json::json!({ "Amount": price, "CurrencyCode": "USD" }),
		);
	}

	IndexMatch { id: id.to_string(), score, metadata: Some(metadata) }
}

/// Returns the same vector for every text, except texts marked as failing.
#[derive(Default)]
pub struct FixedEmbedding {
	failing: HashSet<String>,
	calls: AtomicUsize,
}
impl FixedEmbedding {
	pub fn new() -> Self {
		Self::default()
	}

	/// Embedding `text` fails with a non-transient provider error.
	pub fn failing_on(mut self, text: &str) -> Self {
		self.failing.insert(text.to_string());

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl EmbeddingProvider for FixedEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, segmatch_service::Result<Vec<Vec<f32>>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let dim = (cfg.dimensions as usize).max(1);

		Box::pin(async move {
			if let Some(text) = texts.iter().find(|text| self.failing.contains(*text)) {
				return Err(segmatch_service::Error::Provider {
					message: format!("Embedding rejected input {text:?}."),
					transient: false,
				});
			}

			Ok(vec![vec![0.5; dim]; texts.len()])
		})
	}
}

/// Serves a fixed list of matches, honouring `top_k` and exact-match filters.
pub struct InMemoryIndex {
	matches: Vec<IndexMatch>,
	transient_failures: AtomicU32,
	calls: AtomicUsize,
}
impl InMemoryIndex {
	pub fn new(matches: Vec<IndexMatch>) -> Self {
		Self { matches, transient_failures: AtomicU32::new(0), calls: AtomicUsize::new(0) }
	}

	/// The first `count` queries fail with a transient error.
	pub fn with_transient_failures(self, count: u32) -> Self {
		self.transient_failures.store(count, Ordering::SeqCst);

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}
impl VectorIndex for InMemoryIndex {
	fn query<'a>(
		&'a self,
		_vector: Vec<f32>,
		top_k: u32,
		filter: &'a Map<String, Value>,
	) -> BoxFuture<'a, segmatch_service::Result<Vec<IndexMatch>>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			let failing = self
				.transient_failures
				.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
				.is_ok();

			if failing {
				return Err(segmatch_service::Error::Index {
					message: "Index temporarily unavailable.".to_string(),
					transient: true,
				});
			}

			Ok(self
				.matches
				.iter()
				.filter(|candidate| matches_filter(candidate, filter))
				.take(top_k as usize)
				.cloned()
				.collect())
		})
	}
}

#[derive(Debug, Clone)]
struct Script {
	reply: String,
	delay: Duration,
	transient_failures: u32,
	broken: bool,
}

/// Judge stub keyed by candidate text, with per-candidate delays and failures.
pub struct ScriptedJudge {
	scripts: HashMap<String, Script>,
	default_reply: String,
	failures_left: Mutex<HashMap<String, u32>>,
	calls: AtomicUsize,
	completed: AtomicUsize,
}
impl ScriptedJudge {
	/// Candidates without a script get `default_reply` immediately.
	pub fn new(default_reply: &str) -> Self {
		Self {
			scripts: HashMap::new(),
			default_reply: default_reply.to_string(),
			failures_left: Mutex::new(HashMap::new()),
			calls: AtomicUsize::new(0),
			completed: AtomicUsize::new(0),
		}
	}

	pub fn reply(self, candidate_text: &str, reply: &str) -> Self {
		self.delayed(candidate_text, reply, Duration::ZERO)
	}

	pub fn delayed(mut self, candidate_text: &str, reply: &str, delay: Duration) -> Self {
		self.scripts.insert(
			candidate_text.to_string(),
			Script { reply: reply.to_string(), delay, transient_failures: 0, broken: false },
		);

		self
	}

	/// The first `failures` calls for `candidate_text` fail transiently, then `reply` is returned.
	pub fn flaky(mut self, candidate_text: &str, reply: &str, failures: u32) -> Self {
		self.scripts.insert(
			candidate_text.to_string(),
			Script {
				reply: reply.to_string(),
				delay: Duration::ZERO,
				transient_failures: failures,
				broken: false,
			},
		);
		self.failures_left
			.get_mut()
			.unwrap_or_else(|err| err.into_inner())
			.insert(candidate_text.to_string(), failures);

		self
	}

	/// Every call for `candidate_text` fails with a non-transient error.
	pub fn broken(mut self, candidate_text: &str) -> Self {
		self.scripts.insert(
			candidate_text.to_string(),
			Script {
				reply: String::new(),
				delay: Duration::ZERO,
				transient_failures: 0,
				broken: true,
			},
		);

		self
	}

	/// Judge calls started, including retries and calls that never finished.
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Judge calls that ran to completion and returned a reply.
	pub fn completed(&self) -> usize {
		self.completed.load(Ordering::SeqCst)
	}

	fn take_failure(&self, candidate_text: &str) -> bool {
		let mut left = self.failures_left.lock().unwrap_or_else(|err| err.into_inner());

		match left.get_mut(candidate_text) {
			Some(count) if *count > 0 => {
				*count -= 1;

				true
			},
			_ => false,
		}
	}
}
impl RelevanceJudge for ScriptedJudge {
	fn judge<'a>(
		&'a self,
		_cfg: &'a JudgeProviderConfig,
		_query: &'a str,
		candidate_text: &'a str,
	) -> BoxFuture<'a, segmatch_service::Result<String>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		Box::pin(async move {
			let script = self.scripts.get(candidate_text).cloned().unwrap_or(Script {
				reply: self.default_reply.clone(),
				delay: Duration::ZERO,
				transient_failures: 0,
				broken: false,
			});

			if !script.delay.is_zero() {
				tokio::time::sleep(script.delay).await;
			}
			if script.broken {
				return Err(segmatch_service::Error::Provider {
					message: "Judge rejected the request.".to_string(),
					transient: false,
				});
			}
			if script.transient_failures > 0 && self.take_failure(candidate_text) {
				return Err(segmatch_service::Error::Provider {
					message: "Judge is rate limited.".to_string(),
					transient: true,
				});
			}

			self.completed.fetch_add(1, Ordering::SeqCst);

			Ok(script.reply)
		})
	}
}

fn matches_filter(candidate: &IndexMatch, filter: &Map<String, Value>) -> bool {
	filter.iter().all(|(key, expected)| {
		candidate.metadata.as_ref().and_then(|metadata| metadata.get(key)) == Some(expected)
	})
}
