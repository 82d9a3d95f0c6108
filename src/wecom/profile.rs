//! User lookups and the canonical-user merge.
//!
//! An authentication attempt runs user info, then (when a ticket was issued) user detail, then
//! the member lookup. Any failure aborts the remaining stages and no partial user is returned.

// self
use crate::{
	_prelude::*,
	auth::{AccessCredential, CanonicalUser},
	http::ProviderHttpClient,
	obs::{self, FlowKind},
	transport::{self, ApiResponse, TransportErrorMapper},
	wecom::{DepartmentRecord, EnrichedProfile, RawProfileResponse, WecomProvider},
};

impl<C, M> WecomProvider<C, M>
where
	C: ?Sized + ProviderHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Looks up the user behind `credential` and returns the unparsed reply body.
	pub async fn fetch_raw_user(&self, credential: &AccessCredential) -> Result<Vec<u8>> {
		obs::observe(self.flow_labels(), FlowKind::UserInfo, "fetch_raw_user", async {
			Ok(self.request_user_info(credential).await?.body)
		})
		.await
	}

	/// Redeems a user ticket for the privileged profile.
	pub async fn fetch_user_detail(&self, ticket: &str) -> Result<EnrichedProfile> {
		obs::observe(self.flow_labels(), FlowKind::UserDetail, "fetch_user_detail", async {
			let token = self.application_token().await?;
			let mut url = self.descriptor.endpoints.user_detail.clone();

			url.query_pairs_mut().append_pair("access_token", token.expose());

			let request =
				transport::post_json(&url, &serde_json::json!({ "user_ticket": ticket }))?;
			let response = self.dispatch(FlowKind::UserDetail, request).await?;

			EnrichedProfile::from_response(&response)
		})
		.await
	}

	/// Reads the member directory record of `user_id`.
	///
	/// Accounts whose status is not active fail with [`Error::AccountNotAuthorized`].
	pub async fn fetch_department(&self, user_id: &str) -> Result<DepartmentRecord> {
		obs::observe(self.flow_labels(), FlowKind::Member, "fetch_department", async {
			let token = self.application_token().await?;
			let mut url = self.descriptor.endpoints.member.clone();

			url.query_pairs_mut()
				.append_pair("access_token", token.expose())
				.append_pair("userid", user_id);

			let response = self.dispatch(FlowKind::Member, transport::get(&url)?).await?;
			let record = DepartmentRecord::from_response(&response)?;

			if !record.is_active() {
				return Err(Error::AccountNotAuthorized { status: record.status });
			}

			Ok(record)
		})
		.await
	}

	/// Runs the whole lookup chain and merges the results into one [`CanonicalUser`].
	pub async fn fetch_authenticated_user(
		&self,
		credential: &AccessCredential,
	) -> Result<CanonicalUser> {
		let labels = self.flow_labels();

		obs::observe(labels, FlowKind::Authenticate, "fetch_authenticated_user", async {
			let response = self.request_user_info(credential).await?;
			let profile = RawProfileResponse::from_response(&response)?;
			let mut user = match profile.ticket() {
				Some(ticket) => self.fetch_user_detail(ticket).await?.into_user(),
				None => CanonicalUser::with_username(&profile.user_id),
			};
			let member = self.fetch_department(&profile.user_id).await?;

			if !member.name.is_empty() {
				user.name = Some(member.name);
			}

			user.id = profile.open_id().map(str::to_owned).unwrap_or_else(|| user.username.clone());

			#[cfg(feature = "tracing")]
			::tracing::debug!(
				provider = %self.descriptor.id,
				username = %user.username,
				enriched = profile.ticket().is_some(),
				"user authenticated"
			);

			Ok(user)
		})
		.await
	}

	async fn request_user_info(&self, credential: &AccessCredential) -> Result<ApiResponse> {
		let token = self.application_token().await?;
		let mut url = self.descriptor.endpoints.user_info.clone();

		url.query_pairs_mut()
			.append_pair("access_token", token.expose())
			.append_pair("code", credential.access_token.expose());

		self.dispatch(FlowKind::UserInfo, transport::get(&url)?).await
	}

	async fn dispatch(
		&self,
		flow: FlowKind,
		request: oauth2::HttpRequest,
	) -> Result<ApiResponse> {
		transport::send(self.http_client.as_ref(), self.transport_mapper.as_ref(), flow, request)
			.await
	}
}
