pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Index unavailable: {message}")]
	IndexUnavailable { message: String },
	#[error("Embedding incompatible with index: {message}")]
	EmbeddingIncompatible { message: String },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Qdrant error: {message}")]
	Qdrant { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<drill_storage::Error> for Error {
	fn from(err: drill_storage::Error) -> Self {
		match err {
			drill_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			drill_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			drill_storage::Error::NotFound(message) => Self::NotFound { message },
			err @ (drill_storage::Error::Io { .. } | drill_storage::Error::Json { .. }) =>
				Self::Storage { message: err.to_string() },
			drill_storage::Error::Qdrant(inner) => Self::Qdrant { message: inner.to_string() },
		}
	}
}
