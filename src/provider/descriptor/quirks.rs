// self
use crate::_prelude::*;

/// Provider-specific quirks that influence URL construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderQuirks {
	/// Indicates whether PKCE must be supplied; WeCom does not support it.
	pub pkce_required: bool,
	/// `login_type` parameter sent to the SSO login page.
	pub login_type: String,
	/// Scope requested when no agent id is configured.
	pub base_scope: String,
	/// Scope requested together with an agent id.
	pub privileged_scope: String,
}
impl Default for ProviderQuirks {
	fn default() -> Self {
		Self {
			pkce_required: false,
			login_type: "CorpApp".into(),
			base_scope: "snsapi_base".into(),
			privileged_scope: "snsapi_privateinfo".into(),
		}
	}
}
