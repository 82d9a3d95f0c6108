//! Typed WeCom API payloads and the attribute rules applied to them.

// self
use crate::{
	_prelude::*,
	auth::CanonicalUser,
	error::MalformedResponseError,
	transport::ApiResponse,
};

/// `errmsg` value WeCom returns on success.
pub const OK_MESSAGE: &str = "ok";
/// Member status that allows sign-in.
pub const ACTIVE_STATUS: i64 = 1;

const ERROR_KEYS: [&str; 2] = ["errcode", "errmsg"];

#[derive(Debug, Deserialize)]
pub(crate) struct AppTokenPayload {
	#[serde(default)]
	pub errcode: i64,
	#[serde(default)]
	pub access_token: Option<String>,
	#[serde(default)]
	pub expires_in: Option<i64>,
}

/// Reply of the user-info (code lookup) endpoint.
///
/// Older WeCom deployments spell the identifiers `UserId`/`OpenId`; both spellings are
/// accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProfileResponse {
	/// Provider error code; `0` on success.
	#[serde(default, rename = "errcode")]
	pub error_code: i64,
	/// Provider error text; `"ok"` on success.
	#[serde(default, rename = "errmsg")]
	pub error_message: String,
	/// Internal member id.
	#[serde(default, rename = "userid", alias = "UserId")]
	pub user_id: String,
	/// Ticket granting access to the privileged profile, issued under the privileged scope.
	#[serde(default, rename = "user_ticket", skip_serializing_if = "Option::is_none")]
	pub ticket: Option<String>,
	/// Identifier for non-member visitors.
	#[serde(default, rename = "openid", alias = "OpenId", skip_serializing_if = "Option::is_none")]
	pub open_id: Option<String>,
	/// External contact id, when the visitor is an external contact.
	#[serde(default, rename = "external_userid", skip_serializing_if = "Option::is_none")]
	pub external_user_id: Option<String>,
}
impl RawProfileResponse {
	/// Parses and validates a user-info reply.
	///
	/// Rejections surface as [`Error::UpstreamRejected`] with the provider's `errmsg`; a
	/// successful reply without a member id is a [`MalformedResponseError::MissingField`].
	pub fn from_response(response: &ApiResponse) -> Result<Self> {
		let payload = response.json::<Self>()?;

		if !payload.is_ok() {
			return Err(Error::rejected(Some(payload.error_code), payload.error_message));
		}
		if payload.user_id.is_empty() {
			return Err(MalformedResponseError::MissingField {
				endpoint: response.flow.as_str(),
				field: "userid",
			}
			.into());
		}

		Ok(payload)
	}

	/// Returns true when the provider reported success.
	pub fn is_ok(&self) -> bool {
		self.error_code == 0 && self.error_message == OK_MESSAGE
	}

	/// Non-empty user ticket.
	pub fn ticket(&self) -> Option<&str> {
		non_empty(self.ticket.as_deref())
	}

	/// Non-empty open id.
	pub fn open_id(&self) -> Option<&str> {
		non_empty(self.open_id.as_deref())
	}
}

#[derive(Debug, Deserialize)]
struct UserDetailPayload {
	#[serde(default)]
	errcode: i64,
	#[serde(default)]
	errmsg: String,
	#[serde(default)]
	userid: String,
	#[serde(default)]
	avatar: Option<String>,
	#[serde(default)]
	email: Option<String>,
	#[serde(default)]
	biz_mail: Option<String>,
	#[serde(default)]
	mobile: Option<String>,
	#[serde(default)]
	address: Option<String>,
	#[serde(default)]
	gender: Option<String>,
	#[serde(default)]
	qr_code: Option<String>,
}

/// Privileged profile obtained by redeeming a user ticket.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnrichedProfile {
	/// Member id.
	pub user_id: String,
	/// Avatar URL.
	pub avatar_url: Option<String>,
	/// Personal email.
	pub email: Option<String>,
	/// Corporate mailbox.
	pub business_email: Option<String>,
	/// Mobile number.
	pub mobile: Option<String>,
	/// Postal address.
	pub address: Option<String>,
	/// Gender code as sent by WeCom (`"0"` unknown, `"1"` male, `"2"` female).
	pub gender: Option<String>,
	/// Personal QR code URL.
	pub qr_code: Option<String>,
	/// Every attribute of the reply except the error fields, keyed by upstream names.
	///
	/// An empty `email` is dropped so that the corporate mailbox is the only address left.
	pub raw: JsonMap<String, JsonValue>,
}
impl EnrichedProfile {
	/// Parses and validates a user-detail reply.
	pub fn from_response(response: &ApiResponse) -> Result<Self> {
		let payload = response.json::<UserDetailPayload>()?;

		if payload.errmsg != OK_MESSAGE {
			return Err(Error::rejected(Some(payload.errcode), payload.errmsg));
		}
		if payload.userid.is_empty() {
			return Err(MalformedResponseError::MissingField {
				endpoint: response.flow.as_str(),
				field: "userid",
			}
			.into());
		}

		let mut raw = response.json::<JsonMap<String, JsonValue>>()?;

		for key in ERROR_KEYS {
			raw.remove(key);
		}

		if non_empty(payload.email.as_deref()).is_none() {
			raw.remove("email");
		}

		Ok(Self {
			user_id: payload.userid,
			avatar_url: payload.avatar.filter(|value| !value.is_empty()),
			email: payload.email.filter(|value| !value.is_empty()),
			business_email: payload.biz_mail.filter(|value| !value.is_empty()),
			mobile: payload.mobile.filter(|value| !value.is_empty()),
			address: payload.address.filter(|value| !value.is_empty()),
			gender: payload.gender.filter(|value| !value.is_empty()),
			qr_code: payload.qr_code.filter(|value| !value.is_empty()),
			raw,
		})
	}

	/// Personal email when set, else the corporate mailbox.
	pub fn preferred_email(&self) -> Option<&str> {
		non_empty(self.email.as_deref()).or_else(|| non_empty(self.business_email.as_deref()))
	}

	/// Seeds a canonical user from this profile; `id` is assigned by the caller.
	pub fn into_user(self) -> CanonicalUser {
		let email = self.preferred_email().map(str::to_owned);

		CanonicalUser {
			id: String::new(),
			username: self.user_id,
			name: None,
			email,
			avatar_url: self.avatar_url,
			raw: self.raw,
		}
	}
}

#[derive(Debug, Deserialize)]
struct MemberPayload {
	#[serde(default)]
	errcode: i64,
	#[serde(default)]
	errmsg: String,
	#[serde(default)]
	name: String,
	#[serde(default)]
	status: Option<i64>,
	#[serde(default)]
	department: Vec<i64>,
	#[serde(default)]
	position: Option<String>,
}

/// Member directory record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRecord {
	/// Display name.
	pub name: String,
	/// Account status; only [`ACTIVE_STATUS`] may sign in.
	pub status: i64,
	/// Department ids the member belongs to.
	#[serde(default)]
	pub department: Vec<i64>,
	/// Job title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<String>,
}
impl DepartmentRecord {
	/// Parses and validates a member reply.
	pub fn from_response(response: &ApiResponse) -> Result<Self> {
		let payload = response.json::<MemberPayload>()?;

		if payload.errmsg != OK_MESSAGE {
			return Err(Error::rejected(Some(payload.errcode), payload.errmsg));
		}

		let status = payload.status.ok_or(MalformedResponseError::MissingField {
			endpoint: response.flow.as_str(),
			field: "status",
		})?;

		Ok(Self {
			name: payload.name,
			status,
			department: payload.department,
			position: payload.position.filter(|value| !value.is_empty()),
		})
	}

	/// Returns true when the account may sign in.
	pub fn is_active(&self) -> bool {
		self.status == ACTIVE_STATUS
	}
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.is_empty())
}
