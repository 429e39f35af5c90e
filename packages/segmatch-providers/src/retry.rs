use std::{future::Future, time::Duration};

/// Exponential backoff schedule for a remote call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
	pub max_attempts: u32,
	pub initial_backoff: Duration,
	pub max_backoff: Duration,
	pub multiplier: f64,
}
impl RetryPolicy {
	pub fn from_config(cfg: &segmatch_config::RetryPolicyConfig) -> Self {
		Self {
			max_attempts: cfg.max_attempts.max(1),
			initial_backoff: Duration::from_millis(cfg.initial_backoff_ms),
			max_backoff: Duration::from_millis(cfg.max_backoff_ms),
			multiplier: cfg.multiplier.max(1.0),
		}
	}

	/// A single attempt and no sleeping.
	pub fn none() -> Self {
		Self {
			max_attempts: 1,
			initial_backoff: Duration::ZERO,
			max_backoff: Duration::ZERO,
			multiplier: 1.0,
		}
	}

	/// Delay before retry number `attempt`, counting from 1.
	pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
		let exp = attempt.max(1).saturating_sub(1).min(32) as i32;
		let base = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exp);
		let capped = base.min(self.max_backoff.as_secs_f64());

		Duration::try_from_secs_f64(capped).unwrap_or(self.max_backoff)
	}

	/// Runs `op` until it succeeds, the error is not retryable, or attempts run out.
	pub async fn run<T, E, F, Fut, R>(&self, label: &str, mut op: F, retryable: R) -> Result<T, E>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<T, E>>,
		R: Fn(&E) -> bool,
		E: std::fmt::Display,
	{
		let mut attempt = 1;

		loop {
			match op().await {
				Ok(value) => return Ok(value),
				Err(err) if attempt < self.max_attempts && retryable(&err) => {
					let backoff = self.backoff_for_attempt(attempt);

					tracing::warn!(
						error = %err,
						call = label,
						attempt,
						backoff_ms = backoff.as_millis() as u64,
						"Retrying provider call."
					);
					tokio::time::sleep(backoff).await;

					attempt += 1;
				},
				Err(err) => return Err(err),
			}
		}
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self::from_config(&segmatch_config::RetryPolicyConfig::default())
	}
}
