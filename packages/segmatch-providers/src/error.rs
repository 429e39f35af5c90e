pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
	/// Rate limiting, server-side failures, and other faults worth retrying.
	#[error("Transient provider failure: {message}")]
	Transient { message: String },
}
impl Error {
	pub fn is_transient(&self) -> bool {
		match self {
			Self::Reqwest(err) => {
				err.is_timeout()
					|| err.is_connect()
					|| err.status().map(is_transient_status).unwrap_or(false)
			},
			Self::Transient { .. } => true,
			_ => false,
		}
	}
}

pub(crate) fn is_transient_status(status: reqwest::StatusCode) -> bool {
	status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
