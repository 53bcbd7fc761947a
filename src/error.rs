//! Crate-level error types for stores, configuration, and transports.
//!
//! The OTP requester never surfaces these to its caller; they exist so each collaborator
//! can report what went wrong and the requester can fold every failure into `None`.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token storage failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem, such as an HTTP client that cannot be built.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Configuration failures raised while loading settings or building clients.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Configuration document is not valid JSON or has the wrong shape.
	#[error("Configuration document is invalid at `{path}`.")]
	Parse {
		/// JSON path of the offending value.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
	/// Configuration file could not be read.
	#[error("Configuration file could not be read.")]
	Io(#[from] std::io::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<serde_path_to_error::Error<serde_json::Error>> for ConfigError {
	fn from(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
		let path = e.path().to_string();

		Self::Parse { path, source: e.into_inner() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures; each one means no response was obtained.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the OTP service.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Target URL could not be parsed.
	#[error("OTP service URL `{url}` is invalid.")]
	InvalidUrl {
		/// Raw URL as read from configuration.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body could not be encoded.
	#[error("Request body could not be encoded.")]
	Encode(#[from] crate::convert::ConvertError),
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the OTP service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
