//! Walks through one WeCom sign-in against a mocked provider: issue the login URL, exchange the
//! redirect code, and resolve the canonical user with ticket-based enrichment.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use wecom_sso::{
	http::ReqwestHttpClient,
	provider::ProviderDescriptor,
	reqwest::Client,
	transport::ReqwestTransportErrorMapper,
	wecom::ReqwestWecomProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/gettoken");
			then.status(200).header("content-type", "application/json").body(
				json!({ "errcode": 0, "errmsg": "ok", "access_token": "demo-app", "expires_in": 7200 })
					.to_string(),
			);
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/auth/getuserinfo").query_param("code", "demo-code");
			then.status(200).header("content-type", "application/json").body(
				json!({ "errcode": 0, "errmsg": "ok", "userid": "lisi", "user_ticket": "demo-ticket" })
					.to_string(),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/cgi-bin/auth/getuserdetail");
			then.status(200).header("content-type", "application/json").body(
				json!({
					"errcode": 0,
					"errmsg": "ok",
					"userid": "lisi",
					"email": "",
					"biz_mail": "lisi@corp.example",
					"avatar": "https://wework.qpic.cn/avatar/0",
				})
				.to_string(),
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/user/get").query_param("userid", "lisi");
			then.status(200).header("content-type", "application/json").body(
				json!({ "errcode": 0, "errmsg": "ok", "name": "李四", "status": 1 }).to_string(),
			);
		})
		.await;

	let descriptor = ProviderDescriptor::wecom()?.rebased(&Url::parse(&server.base_url())?)?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder().timeout(std::time::Duration::from_secs(5)).build()?,
	);
	let provider = ReqwestWecomProvider::with_http_client(
		descriptor,
		http_client,
		Arc::new(ReqwestTransportErrorMapper),
	)
	.with_client_id("ww-demo-corp")
	.with_client_secret("demo-secret")
	.with_agent_id("1000002");
	let request = provider.start_authorization();

	println!("Send the browser to: {}", request.url);

	// The redirect brings back `code` and `state`.
	request.validate_state(&request.state)?;

	let credential = provider.exchange_code("demo-code");
	let user = provider.fetch_authenticated_user(&credential).await?;

	println!(
		"Signed in {} ({}) as {:?} <{}>.",
		user.username,
		user.id,
		user.name.as_deref().unwrap_or("-"),
		user.email.as_deref().unwrap_or("-"),
	);

	let again = provider.fetch_authenticated_user(&credential).await?;

	assert_eq!(again, user);

	token_mock.assert_calls_async(1).await;

	println!("Application token fetched once for both sign-ins.");

	Ok(())
}
