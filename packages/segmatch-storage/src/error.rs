// gRPC status codes worth another attempt: UNKNOWN, DEADLINE_EXCEEDED, RESOURCE_EXHAUSTED,
// ABORTED, INTERNAL, UNAVAILABLE.
const TRANSIENT_GRPC_CODES: [i32; 6] = [2, 4, 8, 10, 13, 14];

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error(transparent)]
	Qdrant(#[from] Box<qdrant_client::QdrantError>),
}
impl Error {
	pub fn is_transient(&self) -> bool {
		match self {
			Self::InvalidArgument(_) => false,
			Self::Qdrant(err) => match err.as_ref() {
				qdrant_client::QdrantError::ResponseError { status } =>
					TRANSIENT_GRPC_CODES.contains(&(status.code() as i32)),
				qdrant_client::QdrantError::ResourceExhaustedError { .. } => true,
				_ => false,
			},
		}
	}
}
impl From<qdrant_client::QdrantError> for Error {
	fn from(err: qdrant_client::QdrantError) -> Self {
		Self::Qdrant(Box::new(err))
	}
}
