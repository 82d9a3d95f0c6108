//! Provider descriptor data structures shared by every provider call.

/// Builder API for assembling provider descriptors.
pub mod builder;
/// Provider-specific quirk toggles.
pub mod quirks;

pub use builder::*;
pub use quirks::*;

// self
use crate::{_prelude::*, auth::ProviderId};

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
	/// Browser-facing SSO login page.
	pub authorization: Url,
	/// Application token endpoint (`cgi-bin/gettoken`).
	pub app_token: Url,
	/// User info by authorization code (`cgi-bin/auth/getuserinfo`).
	pub user_info: Url,
	/// Ticket-based user detail (`cgi-bin/auth/getuserdetail`).
	pub user_detail: Url,
	/// Member directory lookup (`cgi-bin/user/get`).
	pub member: Url,
}

/// Immutable provider descriptor consumed by provider calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// Registry name of the provider.
	pub id: ProviderId,
	/// Human-readable provider name shown on login pages.
	pub display_name: String,
	/// Endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
	/// Provider-specific quirks.
	pub quirks: ProviderQuirks,
}
impl ProviderDescriptor {
	/// Registry name of the built-in WeCom provider.
	pub const WECOM: &'static str = "wecom";

	/// Creates a new builder for the provided identifier.
	pub fn builder(id: ProviderId) -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::new(id)
	}

	/// Production WeCom descriptor with the public `qyapi.weixin.qq.com` endpoints.
	pub fn wecom() -> Result<Self, ProviderDescriptorError> {
		let id = ProviderId::new(Self::WECOM)
			.map_err(|_| ProviderDescriptorError::InvalidId { id: Self::WECOM.into() })?;

		Self::builder(id)
			.display_name("企业微信")
			.authorization_endpoint(parse_static("https://login.work.weixin.qq.com/wwlogin/sso/login")?)
			.app_token_endpoint(parse_static("https://qyapi.weixin.qq.com/cgi-bin/gettoken")?)
			.user_info_endpoint(parse_static("https://qyapi.weixin.qq.com/cgi-bin/auth/getuserinfo")?)
			.user_detail_endpoint(parse_static(
				"https://qyapi.weixin.qq.com/cgi-bin/auth/getuserdetail",
			)?)
			.member_endpoint(parse_static("https://qyapi.weixin.qq.com/cgi-bin/user/get")?)
			.build()
	}

	/// Same descriptor with every API endpoint rebased onto `base` (authorization included).
	///
	/// Endpoint paths are appended to the base path, so `https://proxy.internal/wecom/` maps
	/// `gettoken` to `https://proxy.internal/wecom/cgi-bin/gettoken`. A base path without a
	/// trailing `/` loses its last segment, as with any relative URL reference.
	pub fn rebased(&self, base: &Url) -> Result<Self, ProviderDescriptorError> {
		let rebase = |url: &Url| {
			base.join(url.path().trim_start_matches('/'))
				.map_err(|_| ProviderDescriptorError::InvalidUrl { url: base.to_string() })
		};

		Self::builder(self.id.clone())
			.display_name(self.display_name.clone())
			.authorization_endpoint(rebase(&self.endpoints.authorization)?)
			.app_token_endpoint(rebase(&self.endpoints.app_token)?)
			.user_info_endpoint(rebase(&self.endpoints.user_info)?)
			.user_detail_endpoint(rebase(&self.endpoints.user_detail)?)
			.member_endpoint(rebase(&self.endpoints.member)?)
			.quirks(self.quirks.clone())
			.build()
	}
}

fn parse_static(url: &'static str) -> Result<Url, ProviderDescriptorError> {
	Url::parse(url).map_err(|_| ProviderDescriptorError::InvalidUrl { url: url.into() })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn wecom_preset_uses_public_endpoints() {
		let descriptor = ProviderDescriptor::wecom().expect("WeCom preset should be valid.");

		assert_eq!(&*descriptor.id, "wecom");
		assert_eq!(descriptor.display_name, "企业微信");
		assert_eq!(
			descriptor.endpoints.authorization.as_str(),
			"https://login.work.weixin.qq.com/wwlogin/sso/login"
		);
		assert_eq!(
			descriptor.endpoints.member.as_str(),
			"https://qyapi.weixin.qq.com/cgi-bin/user/get"
		);
		assert!(!descriptor.quirks.pkce_required);
	}

	#[test]
	fn rebase_keeps_paths() {
		let descriptor = ProviderDescriptor::wecom().expect("WeCom preset should be valid.");
		let base = Url::parse("http://127.0.0.1:8080/").expect("Base URL should parse.");
		let rebased = descriptor.rebased(&base).expect("Loopback rebase should be accepted.");

		assert_eq!(rebased.endpoints.app_token.as_str(), "http://127.0.0.1:8080/cgi-bin/gettoken");
		assert_eq!(rebased.endpoints.authorization.as_str(), "http://127.0.0.1:8080/wwlogin/sso/login");
		assert_eq!(rebased.quirks, descriptor.quirks);
	}

	#[test]
	fn rebase_appends_to_base_path() {
		let descriptor = ProviderDescriptor::wecom().expect("WeCom preset should be valid.");
		let base = Url::parse("https://proxy.internal/wecom/").expect("Base URL should parse.");
		let rebased = descriptor.rebased(&base).expect("HTTPS rebase should be accepted.");

		assert_eq!(
			rebased.endpoints.app_token.as_str(),
			"https://proxy.internal/wecom/cgi-bin/gettoken"
		);
		assert_eq!(
			rebased.endpoints.user_detail.as_str(),
			"https://proxy.internal/wecom/cgi-bin/auth/getuserdetail"
		);
	}
}
