//! Observability helpers for OTP requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `analytics_otp.request` with a `stage` field and
//!   to route [`TracingSink`] warnings through `tracing`.
//! - Enable `metrics` to increment the `analytics_otp_request_total` counter for every
//!   attempt/skip/success/failure, labeled by `outcome`.

mod metrics;
mod sink;
mod tracing;

pub use metrics::*;
pub use sink::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each OTP request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to the requester.
	Attempt,
	/// No access token was stored, so nothing was sent.
	Skipped,
	/// An OTP was obtained.
	Success,
	/// The request was sent (or the token could not be read) and no OTP came back.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Skipped => "skipped",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
