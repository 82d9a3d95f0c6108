//! WeCom (WeChat Work) provider adapter.
//!
//! [`WecomProvider`] owns the HTTP transport, the provider descriptor, host credentials, and a
//! per-instance application-token cache. Operations live in submodules as `impl` blocks:
//! `app_token` (cached `gettoken`), `authorize` (login URL + code exchange), and `profile`
//! (user info, ticket enrichment, member lookup, and the canonical-user merge).

pub mod api;
pub mod app_token;
pub mod authorize;
pub mod profile;

pub use api::*;
pub use authorize::*;

// self
use crate::{
	_prelude::*,
	auth::{AccessCredential, CanonicalUser},
	http::ProviderHttpClient,
	obs::FlowLabels,
	provider::{AuthProvider, ProviderConfig, ProviderDescriptor, ProviderFuture},
	transport::TransportErrorMapper,
	wecom::app_token::AppTokenCache,
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestHttpClient, transport::ReqwestTransportErrorMapper};

/// Extra-parameter key carrying the self-built application's agent id.
pub const AGENT_ID_KEY: &str = "AgentID";

#[cfg(feature = "reqwest")]
/// Provider specialized for the crate's default reqwest transport stack.
pub type ReqwestWecomProvider = WecomProvider<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// WeCom SSO provider bound to one corp application.
///
/// Clones share the transport and the application-token cache, so one corp application only
/// ever holds one live token no matter how many handles the host keeps. Replacing credentials
/// through the `with_*` builders detaches the instance onto a fresh cache; changes made through
/// [`AuthProvider::config_mut`] are caught because cached tokens are bound to the credentials
/// they were issued for.
pub struct WecomProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound provider request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Provider descriptor that defines endpoints and quirks.
	pub descriptor: ProviderDescriptor,
	/// Host-supplied credentials and extra parameters.
	pub config: ProviderConfig,
	app_token: Arc<AppTokenCache>,
}
impl<C, M> WecomProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a provider that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			transport_mapper: mapper.into(),
			descriptor,
			config: ProviderConfig::default(),
			app_token: Default::default(),
		}
	}

	/// Replaces the whole host configuration and starts a fresh token cache.
	pub fn with_config(mut self, config: ProviderConfig) -> Self {
		self.config = config;
		self.app_token = Default::default();

		self
	}

	/// Sets the corp id used as `appid` and `corpid` and starts a fresh token cache.
	pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
		self.config.set_client_id(client_id);
		self.app_token = Default::default();

		self
	}

	/// Sets the corp secret used to obtain application tokens and starts a fresh token cache.
	pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
		self.config.set_client_secret(secret);
		self.app_token = Default::default();

		self
	}

	/// Sets the agent id that unlocks the privileged scope.
	pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
		self.config.set_extra(AGENT_ID_KEY, agent_id);

		self
	}

	/// Configured agent id, if any.
	pub fn agent_id(&self) -> Option<&str> {
		self.config.extra(AGENT_ID_KEY)
	}

	pub(crate) fn flow_labels(&self) -> FlowLabels<'_> {
		FlowLabels { provider: &self.descriptor.id, corp: &self.config.client_id }
	}
}
#[cfg(feature = "reqwest")]
impl WecomProvider<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates an unconfigured provider for the public WeCom endpoints.
	///
	/// This is the registry's no-argument constructor; apply credentials afterwards through
	/// [`AuthProvider::config_mut`] or the `with_*` helpers.
	pub fn new() -> Result<Self> {
		let descriptor = ProviderDescriptor::wecom().map_err(ConfigError::from)?;

		Ok(Self::with_descriptor(descriptor))
	}

	/// Creates an unconfigured provider for a custom descriptor using the default transport.
	pub fn with_descriptor(descriptor: ProviderDescriptor) -> Self {
		Self::with_http_client(
			descriptor,
			ReqwestHttpClient::default(),
			Arc::new(ReqwestTransportErrorMapper),
		)
	}
}
impl<C, M> Clone for WecomProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			descriptor: self.descriptor.clone(),
			config: self.config.clone(),
			app_token: self.app_token.clone(),
		}
	}
}
impl<C, M> Debug for WecomProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("WecomProvider")
			.field("descriptor", &self.descriptor)
			.field("client_id", &self.config.client_id)
			.field("client_secret_set", &self.config.client_secret.is_some())
			.field("agent_id", &self.agent_id())
			.finish()
	}
}
impl<C, M> AuthProvider for WecomProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	fn config(&self) -> &ProviderConfig {
		&self.config
	}

	fn config_mut(&mut self) -> &mut ProviderConfig {
		&mut self.config
	}

	fn build_authorization_url(&self, state: &str) -> Url {
		WecomProvider::build_authorization_url(self, state)
	}

	fn exchange_code<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, AccessCredential> {
		let credential = WecomProvider::exchange_code(self, code);

		Box::pin(async move { Ok(credential) })
	}

	fn fetch_raw_user<'a>(
		&'a self,
		credential: &'a AccessCredential,
	) -> ProviderFuture<'a, Vec<u8>> {
		Box::pin(WecomProvider::fetch_raw_user(self, credential))
	}

	fn fetch_authenticated_user<'a>(
		&'a self,
		credential: &'a AccessCredential,
	) -> ProviderFuture<'a, CanonicalUser> {
		Box::pin(WecomProvider::fetch_authenticated_user(self, credential))
	}
}
