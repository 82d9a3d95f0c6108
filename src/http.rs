//! Transport primitives for provider API calls.
//!
//! [`ProviderHttpClient`] is the adapter's only dependency on an HTTP stack. Requests and
//! responses use the `oauth2` crate's `http`-based types so custom transports stay
//! framework-agnostic. Implementations call [`ResponseMetadataSlot::take`] before dispatching
//! and [`ResponseMetadataSlot::store`] once a status is known, letting transport error mappers
//! attach consistent metadata to failures.

pub use oauth2;

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use oauth2::{AsyncHttpClient, HttpClientError};
#[cfg(feature = "reqwest")] use oauth2::{HttpRequest, HttpResponse};
// self
use crate::_prelude::*;

/// Abstraction over HTTP transports capable of executing provider API calls while publishing
/// response metadata.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// provider instance, and the handles they return must own whatever state is required so
/// request futures remain `Send`.
pub trait ProviderHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// [`AsyncHttpClient`] handle tied to a [`ResponseMetadataSlot`].
	type Handle: for<'c> AsyncHttpClient<
			'c,
			Error = HttpClientError<Self::TransportError>,
			Future: 'c + Send,
		>
		+ 'static
		+ Send
		+ Sync;

	/// Builds an [`AsyncHttpClient`] handle that records outcomes in `slot`.
	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle;
}

/// Captures metadata from the most recent HTTP response for downstream error mapping.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the provider, if available.
	pub status: Option<u16>,
}

/// Thread-safe slot for sharing [`ResponseMetadata`] between transport and error layers.
#[derive(Clone, Debug, Default)]
pub struct ResponseMetadataSlot(Arc<Mutex<Option<ResponseMetadata>>>);
impl ResponseMetadataSlot {
	/// Stores new metadata for the current request.
	pub fn store(&self, meta: ResponseMetadata) {
		*self.0.lock() = Some(meta);
	}

	/// Returns the captured metadata, if any, consuming it from the slot.
	pub fn take(&self) -> Option<ResponseMetadata> {
		self.0.lock().take()
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ProviderHttpClient for ReqwestHttpClient {
	type Handle = InstrumentedHandle;
	type TransportError = ReqwestError;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		InstrumentedHandle { client: self.0.clone(), slot }
	}
}

/// Handle returned by [`ReqwestHttpClient`] that records the response status.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct InstrumentedHandle {
	client: ReqwestClient,
	slot: ResponseMetadataSlot,
}
#[cfg(feature = "reqwest")]
impl<'c> AsyncHttpClient<'c> for InstrumentedHandle {
	type Error = HttpClientError<ReqwestError>;
	type Future =
		Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		let client = self.client.clone();
		let slot = self.slot.clone();

		Box::pin(async move {
			slot.take();

			let response =
				client.execute(request.try_into().map_err(Box::new)?).await.map_err(Box::new)?;
			let status = response.status();
			let headers = response.headers().to_owned();

			slot.store(ResponseMetadata { status: Some(status.as_u16()) });

			let mut response_new =
				HttpResponse::new(response.bytes().await.map_err(Box::new)?.to_vec());

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn metadata_slot_take_clears_value() {
		let slot = ResponseMetadataSlot::default();

		slot.store(ResponseMetadata { status: Some(200) });

		assert_eq!(slot.take().and_then(|meta| meta.status), Some(200));
		assert!(slot.take().is_none());
	}
}
