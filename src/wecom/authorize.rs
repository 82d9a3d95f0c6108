//! Front-channel authorization URL and the code exchange.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	auth::AccessCredential,
	http::ProviderHttpClient,
	transport::TransportErrorMapper,
	wecom::WecomProvider,
};

const STATE_LEN: usize = 32;

/// Authorization URL paired with the `state` it was issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationRequest {
	/// Opaque value echoed back by the provider on redirect.
	pub state: String,
	/// URL the browser should be sent to.
	pub url: Url,
}
impl AuthorizationRequest {
	/// Ensures the state returned with the redirect matches the issued one.
	pub fn validate_state(&self, returned: &str) -> Result<()> {
		if self.state == returned { Ok(()) } else { Err(Error::StateMismatch) }
	}
}

impl<C, M> WecomProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Builds the login URL for `state`.
	///
	/// Without an agent id the base scope is requested; with one the privileged scope and
	/// `agentid` are added so the user-info reply carries a ticket. Output depends only on the
	/// configuration and `state`.
	pub fn build_authorization_url(&self, state: &str) -> Url {
		let quirks = &self.descriptor.quirks;
		let mut url = self.descriptor.endpoints.authorization.clone();

		{
			let mut pairs = url.query_pairs_mut();

			pairs
				.append_pair("response_type", "code")
				.append_pair("appid", &self.config.client_id)
				.append_pair("state", state)
				.append_pair("login_type", &quirks.login_type);

			match self.agent_id() {
				Some(agent_id) => {
					pairs
						.append_pair("scope", &quirks.privileged_scope)
						.append_pair("agentid", agent_id);
				},
				None => {
					pairs.append_pair("scope", &quirks.base_scope);
				},
			}
		}

		url
	}

	/// Generates a random `state` and builds the matching authorization URL.
	pub fn start_authorization(&self) -> AuthorizationRequest {
		let state = rand::rng()
			.sample_iter(Alphanumeric)
			.take(STATE_LEN)
			.map(char::from)
			.collect::<String>();
		let url = self.build_authorization_url(&state);

		AuthorizationRequest { state, url }
	}

	/// Wraps the authorization code as the attempt's access credential.
	///
	/// No network call is made; the code is validated by the user-info lookup.
	pub fn exchange_code(&self, code: &str) -> AccessCredential {
		AccessCredential::from_code(code)
	}
}
