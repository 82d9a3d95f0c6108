//! Host-supplied provider configuration applied after construction.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Generic base-provider settings (credentials, extra parameters, scopes).
///
/// Providers are created by the registry with hard-coded endpoints and no credentials; the host
/// application then applies this configuration through the setters or deserializes it from its
/// own config files.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
	/// OAuth client identifier (the WeCom corp id).
	pub client_id: String,
	/// OAuth client secret (the WeCom corp secret); never written back out.
	#[serde(skip_serializing)]
	pub client_secret: Option<TokenSecret>,
	/// Provider-specific extra parameters (e.g. `AgentID`).
	pub extra: BTreeMap<String, String>,
	/// Requested scopes; WeCom derives its scope from `AgentID` instead.
	pub scopes: Vec<String>,
}
impl ProviderConfig {
	/// Replaces the client identifier.
	pub fn set_client_id(&mut self, client_id: impl Into<String>) {
		self.client_id = client_id.into();
	}

	/// Replaces the client secret.
	pub fn set_client_secret(&mut self, secret: impl Into<String>) {
		self.client_secret = Some(TokenSecret::new(secret));
	}

	/// Inserts or replaces one extra parameter.
	pub fn set_extra(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.extra.insert(key.into(), value.into());
	}

	/// Replaces the requested scopes.
	pub fn set_scopes<I, S>(&mut self, scopes: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();
	}

	/// Returns a non-empty extra parameter.
	pub fn extra(&self, key: &str) -> Option<&str> {
		self.extra.get(key).map(String::as_str).filter(|value| !value.is_empty())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn deserializes_partial_host_config() {
		let config: ProviderConfig = serde_json::from_str(
			r#"{"client_id":"ww-corp","client_secret":"s3cret","extra":{"AgentID":"1000002"}}"#,
		)
		.expect("Host config should deserialize.");

		assert_eq!(config.client_id, "ww-corp");
		assert_eq!(config.client_secret.as_ref().map(TokenSecret::expose), Some("s3cret"));
		assert_eq!(config.extra("AgentID"), Some("1000002"));
		assert!(config.scopes.is_empty());
	}

	#[test]
	fn serialized_config_omits_the_secret() {
		let mut config = ProviderConfig::default();

		config.set_client_id("ww-corp");
		config.set_client_secret("s3cret");

		let json = serde_json::to_string(&config).expect("Config should serialize.");

		assert!(json.contains("ww-corp"));
		assert!(!json.contains("s3cret"));
		assert!(!json.contains("client_secret"));
	}

	#[test]
	fn empty_extras_are_treated_as_absent() {
		let mut config = ProviderConfig::default();

		config.set_extra("AgentID", "");

		assert_eq!(config.extra("AgentID"), None);
	}
}
