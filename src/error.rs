//! Adapter-level error types shared by the token cache, profile stages, and transports.

// self
use crate::_prelude::*;

/// Adapter-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical adapter error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Provider response did not match the expected shape.
	#[error(transparent)]
	MalformedResponse(#[from] MalformedResponseError),

	/// Provider answered with a non-zero `errcode` or a non-`ok` `errmsg`.
	#[error("Provider rejected the request: {message}.")]
	UpstreamRejected {
		/// Provider `errcode`, when the response carried one.
		code: Option<i64>,
		/// Provider error text (or the raw body for token endpoint failures).
		message: String,
	},
	/// Member lookup reported a disabled or unlinked account.
	#[error("Account status {status} is not authorized to sign in.")]
	AccountNotAuthorized {
		/// Status value observed on the member record.
		status: i64,
	},
	/// Returned `state` does not match the one issued with the authorization URL.
	#[error("Authorization state mismatch.")]
	StateMismatch,
}
impl Error {
	pub(crate) fn rejected(code: Option<i64>, message: impl Into<String>) -> Self {
		Self::UpstreamRejected { code, message: message.into() }
	}
}

/// Configuration and validation failures raised before any request leaves the process.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// JSON request body could not be encoded.
	#[error("Request body could not be encoded.")]
	RequestEncode(#[source] serde_json::Error),
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
	/// No provider is registered under the requested name.
	#[error("No provider is registered as `{name}`.")]
	UnknownProvider {
		/// Requested provider name.
		name: String,
	},
	/// Provider configuration lacks a client (corp) identifier.
	#[error("Provider `{provider}` has no client id configured.")]
	MissingClientId {
		/// Provider identifier string.
		provider: String,
	},
	/// Provider configuration lacks a client (corp) secret.
	#[error("Provider `{provider}` has no client secret configured.")]
	MissingClientSecret {
		/// Provider identifier string.
		provider: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint label of the failing call.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the provider.")]
	Io(#[from] std::io::Error),
	/// Transport reported a failure without a typed error.
	#[error("HTTP client error occurred while calling the {endpoint} endpoint: {message}.")]
	Other {
		/// Endpoint label of the failing call.
		endpoint: &'static str,
		/// Transport-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}

/// Response bodies that could not be mapped onto the typed provider payloads.
#[derive(Debug, ThisError)]
pub enum MalformedResponseError {
	/// Body is not JSON or a field has the wrong type.
	#[error("The {endpoint} endpoint returned malformed JSON.")]
	Json {
		/// Endpoint label of the failing call.
		endpoint: &'static str,
		/// Structured parsing failure including the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// A required field is absent or empty.
	#[error("The {endpoint} endpoint response is missing `{field}`.")]
	MissingField {
		/// Endpoint label of the failing call.
		endpoint: &'static str,
		/// Name of the missing field.
		field: &'static str,
	},
	/// A field is present but carries an unusable value.
	#[error("The {endpoint} endpoint returned an invalid `{field}`: {reason}.")]
	InvalidField {
		/// Endpoint label of the failing call.
		endpoint: &'static str,
		/// Name of the invalid field.
		field: &'static str,
		/// Why the value was rejected.
		reason: &'static str,
	},
}
