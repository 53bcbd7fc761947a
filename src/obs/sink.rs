// self
use crate::_prelude::*;

/// Destination for warning-level diagnostics emitted by the requester.
pub trait DiagnosticSink
where
	Self: Send + Sync,
{
	/// Emits a warning message.
	fn warn(&self, message: &str);
}

/// Sink forwarding warnings to `tracing` under the `analytics_otp` target.
///
/// Drops messages when the `tracing` feature is disabled.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;
impl DiagnosticSink for TracingSink {
	fn warn(&self, message: &str) {
		#[cfg(feature = "tracing")]
		{
			tracing::warn!(target: "analytics_otp", "{message}");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = message;
		}
	}
}

/// Sink that keeps every warning in memory, for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink(Arc<Mutex<Vec<String>>>);
impl RecordingSink {
	/// Returns a copy of the recorded warnings, oldest first.
	pub fn messages(&self) -> Vec<String> {
		self.0.lock().clone()
	}
}
impl DiagnosticSink for RecordingSink {
	fn warn(&self, message: &str) {
		self.0.lock().push(message.to_owned());
	}
}
