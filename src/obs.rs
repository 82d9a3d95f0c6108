//! Optional observability helpers for provider calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to run every provider call inside a span named `wecom_sso.flow` carrying
//!   `provider`, `corp`, `flow`, and `stage` fields, plus debug events for token refreshes and
//!   completed sign-ins. Secrets and tokens are never recorded.
//! - Enable `metrics` to increment the `wecom_sso_flow_total` counter for every
//!   attempt/success/failure, labeled by `provider`, `corp`, `flow`, and `outcome`.

// self
use crate::_prelude::*;

/// Identifies the provider instance a call belongs to.
///
/// `corp` is the configured corp id, which tells apart instances that share one descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FlowLabels<'a> {
	/// Registry name of the provider.
	pub provider: &'a str,
	/// Corp id the call is made for; empty when not yet configured.
	pub corp: &'a str,
}

/// Provider calls observed by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Application token fetch (`gettoken`).
	AppToken,
	/// User info by authorization code (`auth/getuserinfo`).
	UserInfo,
	/// Ticket-based user detail (`auth/getuserdetail`).
	UserDetail,
	/// Member directory lookup (`user/get`).
	Member,
	/// Whole authentication attempt.
	Authenticate,
}
impl FlowKind {
	/// Returns a stable label suitable for span, metric, or error fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::AppToken => "app_token",
			FlowKind::UserInfo => "user_info",
			FlowKind::UserDetail => "user_detail",
			FlowKind::Member => "member",
			FlowKind::Authenticate => "authenticate",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to an adapter helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records a flow outcome via the global metrics recorder (when enabled).
pub fn record_flow_outcome(labels: FlowLabels<'_>, kind: FlowKind, outcome: FlowOutcome) {
	#[cfg(feature = "metrics")]
	{
		::metrics::counter!(
			"wecom_sso_flow_total",
			"provider" => labels.provider.to_owned(),
			"corp" => labels.corp.to_owned(),
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
	#[cfg(not(feature = "metrics"))]
	{
		let _ = (labels, kind, outcome);
	}
}

/// Runs `fut` inside a `wecom_sso.flow` span and records attempt/success/failure outcomes.
pub(crate) async fn observe<T, Fut>(
	labels: FlowLabels<'_>,
	kind: FlowKind,
	stage: &'static str,
	fut: Fut,
) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	record_flow_outcome(labels, kind, FlowOutcome::Attempt);

	#[cfg(feature = "tracing")]
	let result = {
		use ::tracing::Instrument;

		let span = ::tracing::info_span!(
			"wecom_sso.flow",
			provider = labels.provider,
			corp = labels.corp,
			flow = kind.as_str(),
			stage
		);

		fut.instrument(span).await
	};
	#[cfg(not(feature = "tracing"))]
	let result = {
		let _ = stage;

		fut.await
	};

	match &result {
		Ok(_) => record_flow_outcome(labels, kind, FlowOutcome::Success),
		Err(_err) => {
			record_flow_outcome(labels, kind, FlowOutcome::Failure);
			#[cfg(feature = "tracing")]
			::tracing::debug!(
				provider = labels.provider,
				corp = labels.corp,
				flow = kind.as_str(),
				stage,
				error = %_err,
				"provider call failed"
			);
		},
	}

	result
}
