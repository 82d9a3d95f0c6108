//! Name-keyed provider registry and the object-safe provider contract the host framework calls.

// self
use crate::{
	_prelude::*,
	auth::{AccessCredential, CanonicalUser, ProviderId},
	error::ConfigError,
	provider::{ProviderConfig, ProviderDescriptor},
};

/// Boxed future returned by [`AuthProvider`] operations.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// No-argument constructor stored in the registry.
pub type ProviderFactory = Arc<dyn Fn() -> Result<Box<dyn AuthProvider>> + Send + Sync>;

/// Operations the host authentication framework performs against any provider.
///
/// Implementations are created through [`ProviderRegistry::create`] with endpoints already
/// configured; credentials arrive later via [`AuthProvider::config_mut`].
pub trait AuthProvider: Send + Sync {
	/// Descriptor carrying the provider's endpoints and quirks.
	fn descriptor(&self) -> &ProviderDescriptor;

	/// Current credentials and extra parameters.
	fn config(&self) -> &ProviderConfig;

	/// Mutable access for the host's generic setters.
	fn config_mut(&mut self) -> &mut ProviderConfig;

	/// Registry name of the provider.
	fn name(&self) -> &str {
		&self.descriptor().id
	}

	/// Human-readable provider name.
	fn display_name(&self) -> &str {
		&self.descriptor().display_name
	}

	/// Builds the URL the user's browser is redirected to.
	fn build_authorization_url(&self, state: &str) -> Url;

	/// Turns the front-channel authorization code into an access credential.
	fn exchange_code<'a>(&'a self, code: &'a str) -> ProviderFuture<'a, AccessCredential>;

	/// Fetches the provider's raw user payload for `credential`.
	fn fetch_raw_user<'a>(&'a self, credential: &'a AccessCredential)
	-> ProviderFuture<'a, Vec<u8>>;

	/// Fetches and normalizes the signed-in user.
	fn fetch_authenticated_user<'a>(
		&'a self,
		credential: &'a AccessCredential,
	) -> ProviderFuture<'a, CanonicalUser>;
}

/// Thread-safe map from provider name to constructor.
#[derive(Default)]
pub struct ProviderRegistry {
	factories: RwLock<BTreeMap<ProviderId, ProviderFactory>>,
}
impl ProviderRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry with the crate's built-in providers (`wecom`).
	#[cfg(feature = "reqwest")]
	pub fn with_builtin() -> Result<Self> {
		let registry = Self::new();
		let id = ProviderId::new(ProviderDescriptor::WECOM)
			.map_err(|_| ConfigError::UnknownProvider { name: ProviderDescriptor::WECOM.into() })?;

		registry.register(id, || {
			crate::wecom::ReqwestWecomProvider::new().map(|p| Box::new(p) as Box<dyn AuthProvider>)
		});

		Ok(registry)
	}

	/// Registers `factory` under `id`, returning the factory it replaced.
	pub fn register<F>(&self, id: ProviderId, factory: F) -> Option<ProviderFactory>
	where
		F: 'static + Fn() -> Result<Box<dyn AuthProvider>> + Send + Sync,
	{
		self.factories.write().insert(id, Arc::new(factory))
	}

	/// Instantiates the provider registered under `name`.
	pub fn create(&self, name: &str) -> Result<Box<dyn AuthProvider>> {
		let factory = self
			.factories
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| ConfigError::UnknownProvider { name: name.into() })?;

		factory()
	}

	/// Returns true when `name` is registered.
	pub fn contains(&self, name: &str) -> bool {
		self.factories.read().contains_key(name)
	}

	/// Registered provider names in sorted order.
	pub fn names(&self) -> Vec<ProviderId> {
		self.factories.read().keys().cloned().collect()
	}
}
impl Debug for ProviderRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderRegistry").field("names", &self.names()).finish()
	}
}
