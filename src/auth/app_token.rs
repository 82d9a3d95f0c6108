//! Short-lived application token that authorizes the adapter's provider API calls.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Application-level token issued by the provider's `gettoken` endpoint.
///
/// The token authorizes the adapter itself, not the signing-in user, and is attached as the
/// `access_token` query parameter of every management API call.
#[derive(Clone)]
pub struct ApplicationToken {
	/// Token value; callers must avoid logging it.
	pub value: TokenSecret,
	/// Instant the token was obtained.
	pub issued_at: OffsetDateTime,
	/// Instant the provider declared as expiry.
	pub expires_at: OffsetDateTime,
}
impl ApplicationToken {
	/// Tokens are treated as stale this long before the provider-declared expiry.
	pub const SAFETY_MARGIN: Duration = Duration::seconds(10);

	/// Creates a token issued at `issued_at` that lives for `expires_in`.
	pub fn new(
		value: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Self {
		Self { value: TokenSecret::new(value), issued_at, expires_at: issued_at + expires_in }
	}

	/// Returns true while `now` is still before `expires_at - SAFETY_MARGIN`.
	pub fn is_fresh_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at - Self::SAFETY_MARGIN
	}

	/// Remaining lifetime relative to `now`, clamped at zero.
	pub fn remaining_at(&self, now: OffsetDateTime) -> Duration {
		let remaining = self.expires_at - now;

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}
}
impl Debug for ApplicationToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApplicationToken")
			.field("value", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
