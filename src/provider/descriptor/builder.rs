// self
use crate::{
	_prelude::*,
	auth::ProviderId,
	provider::{ProviderDescriptor, ProviderEndpoints, ProviderQuirks},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// A required endpoint was never set.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// Endpoints must use HTTPS unless they point at a loopback host.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A static or derived URL failed to parse.
	#[error("Invalid endpoint URL: {url}.")]
	InvalidUrl {
		/// URL that failed to parse.
		url: String,
	},
	/// A provider identifier failed validation.
	#[error("Invalid provider identifier: {id}.")]
	InvalidId {
		/// Rejected identifier.
		id: String,
	},
	/// Quirk values must be non-empty and free of whitespace.
	#[error("Quirk `{field}` must be a non-empty token without whitespace.")]
	InvalidQuirk {
		/// Offending quirk field.
		field: &'static str,
	},
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
	/// Identifier for the descriptor being constructed.
	pub id: ProviderId,
	/// Human-readable name (defaults to the identifier).
	pub display_name: Option<String>,
	/// SSO login page.
	pub authorization_endpoint: Option<Url>,
	/// Application token endpoint.
	pub app_token_endpoint: Option<Url>,
	/// User info endpoint.
	pub user_info_endpoint: Option<Url>,
	/// User detail endpoint.
	pub user_detail_endpoint: Option<Url>,
	/// Member lookup endpoint.
	pub member_endpoint: Option<Url>,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptorBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: ProviderId) -> Self {
		Self {
			id,
			display_name: None,
			authorization_endpoint: None,
			app_token_endpoint: None,
			user_info_endpoint: None,
			user_detail_endpoint: None,
			member_endpoint: None,
			quirks: ProviderQuirks::default(),
		}
	}

	/// Sets the display name.
	pub fn display_name(mut self, name: impl Into<String>) -> Self {
		self.display_name = Some(name.into());

		self
	}

	/// Sets the SSO login page.
	pub fn authorization_endpoint(mut self, url: Url) -> Self {
		self.authorization_endpoint = Some(url);

		self
	}

	/// Sets the application token endpoint.
	pub fn app_token_endpoint(mut self, url: Url) -> Self {
		self.app_token_endpoint = Some(url);

		self
	}

	/// Sets the user info endpoint.
	pub fn user_info_endpoint(mut self, url: Url) -> Self {
		self.user_info_endpoint = Some(url);

		self
	}

	/// Sets the user detail endpoint.
	pub fn user_detail_endpoint(mut self, url: Url) -> Self {
		self.user_detail_endpoint = Some(url);

		self
	}

	/// Sets the member lookup endpoint.
	pub fn member_endpoint(mut self, url: Url) -> Self {
		self.member_endpoint = Some(url);

		self
	}

	/// Overrides the provider quirks.
	pub fn quirks(mut self, quirks: ProviderQuirks) -> Self {
		self.quirks = quirks;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let endpoints = ProviderEndpoints {
			authorization: require("authorization", self.authorization_endpoint)?,
			app_token: require("app_token", self.app_token_endpoint)?,
			user_info: require("user_info", self.user_info_endpoint)?,
			user_detail: require("user_detail", self.user_detail_endpoint)?,
			member: require("member", self.member_endpoint)?,
		};
		let display_name = self.display_name.unwrap_or_else(|| self.id.to_string());
		let descriptor =
			ProviderDescriptor { id: self.id, display_name, endpoints, quirks: self.quirks };

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ProviderDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		let endpoints = &self.endpoints;

		validate_endpoint("authorization", &endpoints.authorization)?;
		validate_endpoint("app_token", &endpoints.app_token)?;
		validate_endpoint("user_info", &endpoints.user_info)?;
		validate_endpoint("user_detail", &endpoints.user_detail)?;
		validate_endpoint("member", &endpoints.member)?;
		validate_quirk("login_type", &self.quirks.login_type)?;
		validate_quirk("base_scope", &self.quirks.base_scope)?;
		validate_quirk("privileged_scope", &self.quirks.privileged_scope)?;

		Ok(())
	}
}

fn require(endpoint: &'static str, url: Option<Url>) -> Result<Url, ProviderDescriptorError> {
	url.ok_or(ProviderDescriptorError::MissingEndpoint { endpoint })
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if is_loopback(url) => Ok(()),
		_ => Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}

fn is_loopback(url: &Url) -> bool {
	match url.host() {
		Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
		Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
		Some(url::Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
		None => false,
	}
}

fn validate_quirk(field: &'static str, value: &str) -> Result<(), ProviderDescriptorError> {
	if value.is_empty() || value.chars().any(char::is_whitespace) {
		Err(ProviderDescriptorError::InvalidQuirk { field })
	} else {
		Ok(())
	}
}
