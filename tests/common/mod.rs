//! Shared fixtures for the WeCom integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::prelude::*;
use serde_json::{Value, json};
// self
use wecom_sso::{provider::ProviderDescriptor, url::Url, wecom::ReqwestWecomProvider};

pub const CORP_ID: &str = "ww-corp";
pub const CORP_SECRET: &str = "corp-secret";
pub const AGENT_ID: &str = "1000002";
pub const APP_TOKEN: &str = "app-token-1";

pub const GETTOKEN: &str = "/cgi-bin/gettoken";
pub const USER_INFO: &str = "/cgi-bin/auth/getuserinfo";
pub const USER_DETAIL: &str = "/cgi-bin/auth/getuserdetail";
pub const MEMBER: &str = "/cgi-bin/user/get";

/// Preset WeCom descriptor pointed at `server`.
pub fn descriptor(server: &MockServer) -> ProviderDescriptor {
	let base = Url::parse(&server.base_url()).expect("Mock server URL should parse.");

	ProviderDescriptor::wecom()
		.expect("WeCom preset should be valid.")
		.rebased(&base)
		.expect("Rebased descriptor should be valid.")
}

/// Fully configured provider talking to `server`.
pub fn provider(server: &MockServer) -> ReqwestWecomProvider {
	ReqwestWecomProvider::with_descriptor(descriptor(server))
		.with_client_id(CORP_ID)
		.with_client_secret(CORP_SECRET)
		.with_agent_id(AGENT_ID)
}

/// Mocks a successful `gettoken` reply issuing `token` for `expires_in` seconds.
pub async fn mock_app_token<'a>(
	server: &'a MockServer,
	token: &str,
	expires_in: i64,
) -> httpmock::Mock<'a> {
	let body = json!({ "errcode": 0, "errmsg": "ok", "access_token": token, "expires_in": expires_in });

	server
		.mock_async(|when, then| {
			when.method(GET)
				.path(GETTOKEN)
				.query_param("corpid", CORP_ID)
				.query_param("corpsecret", CORP_SECRET);
			then.status(200).header("content-type", "application/json").body(body.to_string());
		})
		.await
}

/// Mocks a `GET` endpoint answering with `body`.
pub async fn mock_get<'a>(
	server: &'a MockServer,
	path: &str,
	query: &[(&str, &str)],
	body: Value,
) -> httpmock::Mock<'a> {
	server
		.mock_async(|when, then| {
			let mut when = when.method(GET).path(path);

			for (key, value) in query {
				when = when.query_param(*key, *value);
			}

			then.status(200).header("content-type", "application/json").body(body.to_string());
		})
		.await
}

/// Mocks the ticket redemption endpoint answering with `body`.
pub async fn mock_user_detail<'a>(
	server: &'a MockServer,
	ticket: &str,
	body: Value,
) -> httpmock::Mock<'a> {
	server
		.mock_async(|when, then| {
			when.method(POST)
				.path(USER_DETAIL)
				.query_param("access_token", APP_TOKEN)
				.json_body(json!({ "user_ticket": ticket }));
			then.status(200).header("content-type", "application/json").body(body.to_string());
		})
		.await
}
