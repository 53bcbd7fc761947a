// self
use crate::obs::RequestOutcome;

/// Records a request outcome via the global metrics recorder (when enabled).
pub fn record_request_outcome(outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("analytics_otp_request_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
