//! Cached application token with a singleflight refresh.
//!
//! The cache lock is held across the `gettoken` round-trip, so concurrent callers that find the
//! token stale wait for the first refresh and then reuse its result instead of stampeding the
//! endpoint. Each cached token remembers the corp credentials it was issued for; a token
//! issued for other credentials is never handed out.

// self
use crate::{
	_prelude::*,
	auth::{ApplicationToken, TokenSecret},
	error::{ConfigError, MalformedResponseError},
	http::ProviderHttpClient,
	obs::{self, FlowKind},
	transport::{self, TransportErrorMapper},
	wecom::{AppTokenPayload, WecomProvider},
};

/// Per-provider slot holding the current application token.
#[derive(Debug, Default)]
pub(crate) struct AppTokenCache(AsyncMutex<Option<CachedAppToken>>);

#[derive(Debug)]
struct CachedAppToken {
	corp_id: String,
	corp_secret: TokenSecret,
	token: ApplicationToken,
}
impl CachedAppToken {
	fn usable_for(&self, corp_id: &str, corp_secret: &TokenSecret, now: OffsetDateTime) -> bool {
		self.corp_id == corp_id && &self.corp_secret == corp_secret && self.token.is_fresh_at(now)
	}
}

impl<C, M> WecomProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Returns a fresh application token, fetching a new one when the cached token is missing,
	/// within [`ApplicationToken::SAFETY_MARGIN`] of expiry, or issued for other corp
	/// credentials.
	///
	/// A failed refresh leaves the cache untouched.
	pub async fn application_token(&self) -> Result<TokenSecret> {
		let (corp_id, corp_secret) = self.corp_credentials()?;
		let mut slot = self.app_token.0.lock().await;

		if let Some(current) = slot
			.as_ref()
			.filter(|cached| cached.usable_for(corp_id, corp_secret, OffsetDateTime::now_utc()))
		{
			return Ok(current.token.value.clone());
		}

		let token = obs::observe(
			self.flow_labels(),
			FlowKind::AppToken,
			"application_token",
			self.fetch_application_token(corp_id, corp_secret),
		)
		.await?;
		let value = token.value.clone();

		*slot = Some(CachedAppToken {
			corp_id: corp_id.to_owned(),
			corp_secret: corp_secret.clone(),
			token,
		});

		Ok(value)
	}

	/// Drops the cached application token so the next call fetches a new one.
	pub async fn invalidate_application_token(&self) {
		self.app_token.0.lock().await.take();
	}

	async fn fetch_application_token(
		&self,
		corp_id: &str,
		corp_secret: &TokenSecret,
	) -> Result<ApplicationToken> {
		let mut url = self.descriptor.endpoints.app_token.clone();

		url.query_pairs_mut()
			.append_pair("corpid", corp_id)
			.append_pair("corpsecret", corp_secret.expose());

		let response = transport::send(
			self.http_client.as_ref(),
			self.transport_mapper.as_ref(),
			FlowKind::AppToken,
			transport::get(&url)?,
		)
		.await?;
		let payload = response.json::<AppTokenPayload>()?;

		if payload.errcode != 0 {
			return Err(Error::rejected(Some(payload.errcode), response.text()));
		}

		let endpoint = FlowKind::AppToken.as_str();
		let value = payload
			.access_token
			.filter(|value| !value.is_empty())
			.ok_or(MalformedResponseError::MissingField { endpoint, field: "access_token" })?;
		let expires_in = payload
			.expires_in
			.ok_or(MalformedResponseError::MissingField { endpoint, field: "expires_in" })?;

		if expires_in <= 0 {
			return Err(MalformedResponseError::InvalidField {
				endpoint,
				field: "expires_in",
				reason: "must be positive",
			}
			.into());
		}

		#[cfg(feature = "tracing")]
		::tracing::debug!(
			provider = %self.descriptor.id,
			corp = corp_id,
			expires_in,
			"application token refreshed"
		);

		Ok(ApplicationToken::new(value, OffsetDateTime::now_utc(), Duration::seconds(expires_in)))
	}

	fn corp_credentials(&self) -> Result<(&str, &TokenSecret)> {
		let provider = || self.descriptor.id.to_string();

		if self.config.client_id.is_empty() {
			return Err(ConfigError::MissingClientId { provider: provider() }.into());
		}

		let secret = self
			.config
			.client_secret
			.as_ref()
			.filter(|secret| !secret.is_empty())
			.ok_or_else(|| ConfigError::MissingClientSecret { provider: provider() })?;

		Ok((&self.config.client_id, secret))
	}
}
