//! Error handling shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = MarkovError> = std::result::Result<T, E>;

/// Failures raised while building, training, or persisting a chain.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// A caller-supplied value was rejected before anything was mutated.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),
	/// The input stream failed mid-training.
	#[error("encountered problem while scanning words: {0}")]
	ScanFailure(#[source] std::io::Error),
	/// Filesystem IO error with optional context path.
	#[error("io error while processing {path:?}: {source}")]
	Io {
		/// Underlying IO error returned by the standard library.
		source: std::io::Error,
		/// Target path associated with the IO failure if available.
		path: Option<PathBuf>,
	},
	/// Snapshot encoding or decoding failure.
	#[error("serialization error: {0}")]
	Serialization(String),
}

impl From<serde_json::Error> for MarkovError {
	fn from(err: serde_json::Error) -> Self {
		Self::Serialization(err.to_string())
	}
}

impl From<postcard::Error> for MarkovError {
	fn from(err: postcard::Error) -> Self {
		Self::Serialization(err.to_string())
	}
}

impl MarkovError {
	/// Helper constructor that attaches an optional path when wrapping IO errors.
	pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
		Self::Io { source, path }
	}

	/// Shorthand for [`MarkovError::InvalidArgument`].
	pub(crate) fn invalid(msg: impl Into<String>) -> Self {
		Self::InvalidArgument(msg.into())
	}
}
