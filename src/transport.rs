//! Request dispatch and transport error mapping for provider API calls.

// crates.io
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpRequest,
	http::{Method, Request, header::CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, MalformedResponseError, TransportError},
	http::{ProviderHttpClient, ResponseMetadata, ResponseMetadataSlot},
	obs::FlowKind,
};

/// Maps HTTP transport failures into adapter [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into an adapter error.
	fn map_transport_error(
		&self,
		flow: FlowKind,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		flow: FlowKind,
		_meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) if inner.is_builder() =>
				ConfigError::from(*inner).into(),
			HttpClientError::Reqwest(inner) => TransportError::network(flow.as_str(), *inner).into(),
			other => map_generic_transport_error(flow, other),
		}
	}
}

/// Fallback mapping shared by mappers for the transport-agnostic [`HttpClientError`] variants.
pub fn map_generic_transport_error<E>(flow: FlowKind, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(flow.as_str(), *inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) =>
			TransportError::Other { endpoint: flow.as_str(), message }.into(),
		other => TransportError::Other { endpoint: flow.as_str(), message: other.to_string() }
			.into(),
	}
}

/// Raw provider reply: HTTP status plus the unmodified body.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// Provider endpoint that produced the reply.
	pub flow: FlowKind,
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Parses the body into `T`, reporting the failing JSON path as
	/// [`MalformedResponseError::Json`].
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de).map_err(|source| {
			MalformedResponseError::Json {
				endpoint: self.flow.as_str(),
				source,
				status: Some(self.status),
			}
			.into()
		})
	}

	/// Lossy UTF-8 view of the body, used as diagnostic context.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Builds a `GET` request for `url`.
pub(crate) fn get(url: &Url) -> Result<HttpRequest> {
	build(Method::GET, url, Vec::new())
}

/// Builds a `POST` request for `url` carrying `body` as JSON.
pub(crate) fn post_json<B>(url: &Url, body: &B) -> Result<HttpRequest>
where
	B: Serialize,
{
	let payload = serde_json::to_vec(body).map_err(ConfigError::RequestEncode)?;

	build(Method::POST, url, payload)
}

fn build(method: Method, url: &Url, body: Vec<u8>) -> Result<HttpRequest> {
	Request::builder()
		.method(method)
		.uri(url.as_str())
		.header(CONTENT_TYPE, "application/json")
		.body(body)
		.map_err(|e| ConfigError::from(e).into())
}

/// Dispatches `request` through `client`, mapping transport failures with `mapper`.
pub(crate) async fn send<C, M>(
	client: &C,
	mapper: &M,
	flow: FlowKind,
	request: HttpRequest,
) -> Result<ApiResponse>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	let meta = ResponseMetadataSlot::default();
	let handle = client.with_metadata(meta.clone());
	let response = handle
		.call(request)
		.await
		.map_err(|err| mapper.map_transport_error(flow, meta.take().as_ref(), err))?;

	Ok(ApiResponse { flow, status: response.status().as_u16(), body: response.into_body() })
}
