pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0}")]
	Message(String),

	#[error(transparent)]
	Toml(#[from] toml::de::Error),

	#[error(transparent)]
	Config(#[from] segmatch_config::Error),
}
