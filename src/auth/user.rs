//! Canonical user record handed back to the host authentication framework.

// self
use crate::_prelude::*;

/// Normalized identity produced by one successful authentication attempt.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalUser {
	/// Stable identifier (provider `openid` when present, else `username`).
	pub id: String,
	/// Provider member identifier (`userid`).
	pub username: String,
	/// Display name from the member directory.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Preferred email address.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Avatar URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar_url: Option<String>,
	/// Remaining provider attributes, keyed by their upstream names.
	#[serde(default)]
	pub raw: JsonMap<String, JsonValue>,
}
impl CanonicalUser {
	/// Seeds a record that only knows the member identifier.
	pub fn with_username(username: impl Into<String>) -> Self {
		Self { username: username.into(), ..Default::default() }
	}
}
