pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Configuration error: {message}")]
	Config { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String, transient: bool },
	#[error("Index error: {message}")]
	Index { message: String, transient: bool },
	#[error("Call timed out after {timeout_ms} ms.")]
	Timeout { timeout_ms: u64 },
}
impl Error {
	/// Whether another attempt of the same call may succeed.
	pub fn is_transient(&self) -> bool {
		match self {
			Self::Provider { transient, .. } | Self::Index { transient, .. } => *transient,
			Self::Timeout { .. } => true,
			Self::InvalidRequest { .. } | Self::Config { .. } => false,
		}
	}
}

impl From<segmatch_providers::Error> for Error {
	fn from(err: segmatch_providers::Error) -> Self {
		match err {
			segmatch_providers::Error::InvalidConfig { message } => Self::Config { message },
			other => Self::Provider { transient: other.is_transient(), message: other.to_string() },
		}
	}
}

impl From<segmatch_storage::Error> for Error {
	fn from(err: segmatch_storage::Error) -> Self {
		match err {
			segmatch_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			other => Self::Index { transient: other.is_transient(), message: other.to_string() },
		}
	}
}

impl From<segmatch_config::Error> for Error {
	fn from(err: segmatch_config::Error) -> Self {
		Self::Config { message: err.to_string() }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn provider_errors_keep_their_retry_class() {
		let transient = Error::from(segmatch_providers::Error::Transient {
			message: "HTTP 503".to_string(),
		});
		let config = Error::from(segmatch_providers::Error::InvalidConfig {
			message: "bad header".to_string(),
		});

		assert!(transient.is_transient());
		assert!(matches!(config, Error::Config { .. }));
		assert!(!config.is_transient());
		assert!(Error::Timeout { timeout_ms: 50 }.is_transient());
	}
}
