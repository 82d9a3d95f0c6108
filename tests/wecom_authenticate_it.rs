#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::*;
use wecom_sso::{
	error::{Error, MalformedResponseError, TransportError},
	provider::{AuthProvider, ProviderDescriptor},
	url::Url,
	wecom::ReqwestWecomProvider,
};

fn ok(mut body: serde_json::Value) -> serde_json::Value {
	body["errcode"] = json!(0);
	body["errmsg"] = json!("ok");

	body
}

#[tokio::test]
async fn ticket_flow_builds_enriched_user() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);
	let token = mock_app_token(&server, APP_TOKEN, 7200).await;
	let info = mock_get(
		&server,
		USER_INFO,
		&[("access_token", APP_TOKEN), ("code", "C1")],
		ok(json!({ "userid": "lisi", "user_ticket": "T1", "openid": "" })),
	)
	.await;
	let detail = mock_user_detail(
		&server,
		"T1",
		ok(json!({
			"userid": "lisi",
			"email": "",
			"biz_mail": "zs@corp.com",
			"avatar": "http://x/0",
			"mobile": "13800000000",
		})),
	)
	.await;
	let member = mock_get(
		&server,
		MEMBER,
		&[("access_token", APP_TOKEN), ("userid", "lisi")],
		ok(json!({ "name": "张三", "status": 1, "department": [1] })),
	)
	.await;
	let credential = provider.exchange_code("C1");
	let user =
		provider.fetch_authenticated_user(&credential).await.expect("Sign-in should succeed.");

	assert_eq!(user.id, "lisi");
	assert_eq!(user.username, "lisi");
	assert_eq!(user.name.as_deref(), Some("张三"));
	assert_eq!(user.email.as_deref(), Some("zs@corp.com"));
	assert_eq!(user.avatar_url.as_deref(), Some("http://x/0"));
	assert_eq!(user.raw.get("mobile"), Some(&json!("13800000000")));
	assert!(!user.raw.contains_key("email"));
	assert!(!user.raw.contains_key("errcode"));

	token.assert_calls_async(1).await;
	info.assert_calls_async(1).await;
	detail.assert_calls_async(1).await;
	member.assert_calls_async(1).await;
}

#[tokio::test]
async fn personal_email_wins_and_open_id_becomes_id() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);

	mock_app_token(&server, APP_TOKEN, 7200).await;
	mock_get(
		&server,
		USER_INFO,
		&[("code", "C1")],
		ok(json!({ "userid": "lisi", "user_ticket": "T1", "openid": "o-lisi" })),
	)
	.await;
	mock_user_detail(
		&server,
		"T1",
		ok(json!({ "userid": "lisi", "email": "li@home.com", "biz_mail": "zs@corp.com" })),
	)
	.await;
	mock_get(&server, MEMBER, &[("userid", "lisi")], ok(json!({ "name": "李四", "status": 1 })))
		.await;

	let user = provider
		.fetch_authenticated_user(&provider.exchange_code("C1"))
		.await
		.expect("Sign-in should succeed.");

	assert_eq!(user.id, "o-lisi");
	assert_eq!(user.email.as_deref(), Some("li@home.com"));
	assert_eq!(user.raw.get("email"), Some(&json!("li@home.com")));
}

#[tokio::test]
async fn missing_ticket_skips_detail() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);

	mock_app_token(&server, APP_TOKEN, 7200).await;
	mock_get(&server, USER_INFO, &[("code", "C1")], ok(json!({ "userid": "wangwu" }))).await;

	let detail = mock_user_detail(&server, "T1", ok(json!({ "userid": "wangwu" }))).await;

	mock_get(&server, MEMBER, &[("userid", "wangwu")], ok(json!({ "name": "王五", "status": 1 })))
		.await;

	let user = provider
		.fetch_authenticated_user(&provider.exchange_code("C1"))
		.await
		.expect("Sign-in should succeed.");

	assert_eq!(user.id, "wangwu");
	assert_eq!(user.username, "wangwu");
	assert_eq!(user.name.as_deref(), Some("王五"));
	assert_eq!(user.email, None);
	assert_eq!(user.avatar_url, None);
	assert!(user.raw.is_empty());

	detail.assert_calls_async(0).await;
}

#[tokio::test]
async fn rejected_code_stops_before_member_lookup() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);

	mock_app_token(&server, APP_TOKEN, 7200).await;
	mock_get(&server, USER_INFO, &[], json!({ "errcode": 1, "errmsg": "invalid code" })).await;

	let member = mock_get(&server, MEMBER, &[], ok(json!({ "status": 1 }))).await;
	let err = provider
		.fetch_authenticated_user(&provider.exchange_code("bad"))
		.await
		.expect_err("Rejected code should fail.");

	match err {
		Error::UpstreamRejected { code, message } => {
			assert_eq!(code, Some(1));
			assert_eq!(message, "invalid code");
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	member.assert_calls_async(0).await;
}

#[tokio::test]
async fn inactive_member_is_not_authorized() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);

	mock_app_token(&server, APP_TOKEN, 7200).await;
	mock_get(&server, USER_INFO, &[], ok(json!({ "userid": "lisi" }))).await;
	mock_get(&server, MEMBER, &[], ok(json!({ "name": "张三", "status": 2 }))).await;

	let err = provider
		.fetch_authenticated_user(&provider.exchange_code("C1"))
		.await
		.expect_err("Disabled account should fail.");

	assert!(matches!(err, Error::AccountNotAuthorized { status: 2 }));
	assert!(err.to_string().contains('2'));
}

#[tokio::test]
async fn department_lookup_returns_active_records_only() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);

	mock_app_token(&server, APP_TOKEN, 7200).await;
	mock_get(
		&server,
		MEMBER,
		&[("userid", "lisi")],
		ok(json!({ "name": "张三", "status": 1, "department": [1, 7], "position": "engineer" })),
	)
	.await;
	mock_get(&server, MEMBER, &[("userid", "zhangsan")], ok(json!({ "name": "张三", "status": 4 })))
		.await;

	let record = provider.fetch_department("lisi").await.expect("Member lookup should succeed.");

	assert_eq!(record.status, 1);
	assert_eq!(record.department, vec![1, 7]);
	assert_eq!(record.position.as_deref(), Some("engineer"));

	let err = provider.fetch_department("zhangsan").await.expect_err("Inactive member should fail.");

	assert!(matches!(err, Error::AccountNotAuthorized { status: 4 }));
}

#[tokio::test]
async fn rejected_ticket_surfaces_provider_message() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);

	mock_app_token(&server, APP_TOKEN, 7200).await;
	mock_user_detail(&server, "T0", json!({ "errcode": 40014, "errmsg": "invalid ticket" })).await;

	let err = provider.fetch_user_detail("T0").await.expect_err("Bad ticket should fail.");

	assert!(matches!(
		err,
		Error::UpstreamRejected { code: Some(40014), ref message } if message == "invalid ticket"
	));
}

#[tokio::test]
async fn raw_user_is_returned_verbatim() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);
	let body = r#"{"errcode":0,"errmsg":"ok","userid":"lisi"}"#;

	mock_app_token(&server, APP_TOKEN, 7200).await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(USER_INFO);
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await;

	let raw = provider
		.fetch_raw_user(&provider.exchange_code("C1"))
		.await
		.expect("Raw lookup should succeed.");

	assert_eq!(raw, body.as_bytes());
}

#[tokio::test]
async fn non_json_reply_is_malformed() {
	let server = MockServer::start_async().await;
	let provider = provider(&server);

	mock_app_token(&server, APP_TOKEN, 7200).await;
	server
		.mock_async(|when, then| {
			when.method(GET).path(USER_INFO);
			then.status(502).body("<html>bad gateway</html>");
		})
		.await;

	let err = provider
		.fetch_authenticated_user(&provider.exchange_code("C1"))
		.await
		.expect_err("HTML reply should fail.");

	assert!(matches!(
		err,
		Error::MalformedResponse(MalformedResponseError::Json {
			endpoint: "user_info",
			status: Some(502),
			..
		})
	));
}

#[tokio::test]
async fn unreachable_provider_is_a_transport_error() {
	let base = Url::parse("http://127.0.0.1:1/").expect("Fixture URL should parse.");
	let descriptor = ProviderDescriptor::wecom()
		.expect("WeCom preset should be valid.")
		.rebased(&base)
		.expect("Rebased descriptor should be valid.");
	let provider = ReqwestWecomProvider::with_descriptor(descriptor)
		.with_client_id(CORP_ID)
		.with_client_secret(CORP_SECRET);
	let err = provider
		.fetch_authenticated_user(&provider.exchange_code("C1"))
		.await
		.expect_err("Closed port should fail.");

	assert!(matches!(err, Error::Transport(TransportError::Network { endpoint: "app_token", .. })));
}

#[tokio::test]
async fn trait_object_dispatches_to_the_provider() {
	let server = MockServer::start_async().await;
	let provider: Box<dyn AuthProvider> = Box::new(common::provider(&server));

	mock_app_token(&server, APP_TOKEN, 7200).await;
	mock_get(&server, USER_INFO, &[("code", "C9")], ok(json!({ "userid": "zhaoliu" }))).await;
	mock_get(&server, MEMBER, &[("userid", "zhaoliu")], ok(json!({ "status": 1 }))).await;

	let credential = provider.exchange_code("C9").await.expect("Exchange never fails.");
	let user = provider
		.fetch_authenticated_user(&credential)
		.await
		.expect("Sign-in should succeed.");

	assert_eq!(provider.name(), "wecom");
	assert_eq!(user.id, "zhaoliu");
	assert_eq!(user.name, None);
}
