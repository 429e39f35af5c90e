pub mod embedding;
pub mod judge;
pub mod retry;

mod error;

pub use error::{Error, Result};
pub use retry::RetryPolicy;

use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// HTTP client shared by every call to one provider.
pub fn build_client(timeout_ms: u64) -> Result<Client> {
	Ok(Client::builder().timeout(Duration::from_millis(timeout_ms)).build()?)
}

async fn post_json(client: &Client, url: &str, headers: HeaderMap, body: &Value) -> Result<Value> {
	let res = client.post(url).headers(headers).json(body).send().await?;
	let status = res.status();

	if error::is_transient_status(status) {
		let text = res.text().await.unwrap_or_default();

		return Err(Error::Transient { message: format!("{status}: {}", truncate(&text, 200)) });
	}

	Ok(res.error_for_status()?.json().await?)
}

pub(crate) fn truncate(text: &str, max_chars: usize) -> &str {
	match text.char_indices().nth(max_chars) {
		Some((idx, _)) => &text[..idx],
		None => text,
	}
}
