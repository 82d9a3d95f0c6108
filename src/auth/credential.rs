//! Access credential produced by the code exchange.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Ephemeral credential scoped to one authentication attempt.
///
/// WeCom has no upstream code-for-token step: the authorization code from the front-channel
/// redirect doubles as the bearer value for the profile lookup, so `access_token` holds the
/// code verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessCredential {
	/// Value forwarded to the user-info endpoint as `code`.
	pub access_token: TokenSecret,
}
impl AccessCredential {
	/// Wraps an authorization code without validating it.
	pub fn from_code(code: impl Into<String>) -> Self {
		Self { access_token: TokenSecret::new(code) }
	}
}
