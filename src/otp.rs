//! OTP requester: exchanges the stored analytics access token for a one-time password.
//!
//! [`OtpRequester::obtain_otp`] performs at most one `POST` to the configured OTP service
//! and never returns an error. Every failure folds into `None`; the
//! [`DiagnosticSink`] receives one warning for each failed exchange so operators can tell
//! the causes apart.

// self
#[cfg(feature = "reqwest")]
use crate::{convert::JsonConverter, http::ReqwestTransport};
use crate::{
	_prelude::*,
	auth::{AccessToken, Otp, OtpSecret},
	config::{ConfigReader, OTP_URL_PATH, SECURE_BASE_URL_PATH},
	convert::BodyConverter,
	error::TransportError,
	http::{HttpResponse, HttpTransport, Method, Payload},
	obs::{self, DiagnosticSink, RequestOutcome, RequestSpan, TracingSink},
	store::{StoreError, TokenStore},
};

/// Payload field carrying the stored access token.
pub const ACCESS_TOKEN_FIELD: &str = "access-token";
/// Payload field carrying the store's secure base URL.
pub const BASE_URL_FIELD: &str = "url";
/// Response field holding the issued password.
pub const OTP_FIELD: &str = "otp";
/// Only status the OTP service uses to signal an issued password.
pub const CREATED_STATUS: u16 = 201;
/// Substituted for the body in failure warnings when there is nothing to show.
pub const EMPTY_BODY_MARKER: &str = "Response body is empty.";

const FAILURE_PREFIX: &str = "Obtaining of an OTP from the MBI service has been failed";

#[cfg(feature = "reqwest")]
/// Requester specialized for the crate's default reqwest transport.
pub type ReqwestOtpRequester = OtpRequester<ReqwestTransport>;

/// Outbound request sent to the OTP service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OtpRequest {
	/// HTTP method; always [`Method::Post`].
	pub method: Method,
	/// OTP service URL as read from configuration (empty when unset).
	pub url: String,
	/// `access-token` and `url` fields.
	pub payload: Payload,
}
impl OtpRequest {
	/// Builds the request for `token` against the given URLs.
	pub fn new(url: impl Into<String>, token: &AccessToken, base_url: impl Into<String>) -> Self {
		let mut payload = Payload::new();

		payload.insert(ACCESS_TOKEN_FIELD.into(), token.expose().into());
		payload.insert(BASE_URL_FIELD.into(), base_url.into());

		Self { method: Method::Post, url: url.into(), payload }
	}
}

enum Attempt {
	Skipped,
	Obtained(Otp),
	Failed,
}

/// Asks the MBI service for a one-time password on behalf of the stored access token.
///
/// The requester holds no state of its own: the token and both configuration values are
/// re-read on every call.
#[derive(Clone)]
pub struct OtpRequester<T>
where
	T: ?Sized + HttpTransport,
{
	/// Holder of the long-lived access token.
	pub store: Arc<dyn TokenStore>,
	/// Installation settings providing the OTP service and secure base URLs.
	pub config: Arc<dyn ConfigReader>,
	/// Transport used for the outbound call.
	pub transport: Arc<T>,
	/// Converter decoding the service's response body.
	pub converter: Arc<dyn BodyConverter>,
	/// Destination for failure warnings.
	pub sink: Arc<dyn DiagnosticSink>,
}
impl<T> OtpRequester<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a requester around caller-provided collaborators.
	///
	/// Warnings go to [`TracingSink`] until [`with_sink`](Self::with_sink) replaces it.
	pub fn with_transport(
		store: Arc<dyn TokenStore>,
		config: Arc<dyn ConfigReader>,
		transport: impl Into<Arc<T>>,
		converter: Arc<dyn BodyConverter>,
	) -> Self {
		Self { store, config, transport: transport.into(), converter, sink: Arc::new(TracingSink) }
	}

	/// Sets or replaces the diagnostic sink.
	pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
		self.sink = sink;

		self
	}

	/// Obtains an OTP from the MBI service.
	///
	/// Returns `None` when no access token is stored (nothing is sent), when the transport
	/// yields no response, when the status is not 201, or when the body lacks a non-empty
	/// `otp` string.
	pub async fn obtain_otp(&self) -> Option<Otp> {
		let span = RequestSpan::new("obtain_otp");

		obs::record_request_outcome(RequestOutcome::Attempt);

		let attempt = span.instrument(self.attempt(&span)).await;

		match attempt {
			Attempt::Skipped => {
				obs::record_request_outcome(RequestOutcome::Skipped);

				None
			},
			Attempt::Obtained(otp) => {
				obs::record_request_outcome(RequestOutcome::Success);

				Some(otp)
			},
			Attempt::Failed => {
				obs::record_request_outcome(RequestOutcome::Failure);

				None
			},
		}
	}

	/// Alias of [`obtain_otp`](Self::obtain_otp).
	pub async fn call(&self) -> Option<Otp> {
		self.obtain_otp().await
	}

	/// Builds the request [`obtain_otp`](Self::obtain_otp) would send, without sending it.
	///
	/// Returns `Ok(None)` when no access token is stored.
	pub async fn build_request(&self) -> Result<Option<OtpRequest>> {
		Ok(self.stored_token().await?.map(|token| self.request_for(&token)))
	}

	async fn attempt(&self, span: &RequestSpan) -> Attempt {
		let token = match self.stored_token().await {
			Ok(Some(token)) => token,
			Ok(None) => return Attempt::Skipped,
			Err(e) => {
				self.sink.warn(&format!("Unable to read the analytics access token: {e}"));

				return Attempt::Failed;
			},
		};

		span.record_token_fingerprint(&token.fingerprint());

		let request = self.request_for(&token);
		let response =
			self.transport.request(request.method, &request.url, &request.payload).await;

		match self.parse_result(response) {
			Some(otp) => Attempt::Obtained(otp),
			None => Attempt::Failed,
		}
	}

	async fn stored_token(&self) -> Result<Option<AccessToken>, StoreError> {
		if !self.store.exists().await? {
			return Ok(None);
		}

		self.store.fetch().await
	}

	fn request_for(&self, token: &AccessToken) -> OtpRequest {
		let url = self.config.value(OTP_URL_PATH).unwrap_or_default();
		let base_url = self.config.value(SECURE_BASE_URL_PATH).unwrap_or_default();

		OtpRequest::new(url, token, base_url)
	}

	fn parse_result(&self, response: Result<HttpResponse, TransportError>) -> Option<Otp> {
		let response = match response {
			Ok(response) => response,
			Err(_) => {
				self.report_failure("");

				return None;
			},
		};

		if response.status == CREATED_STATUS {
			if let Some(otp) = self.extract_otp(&response.body) {
				return Some(otp);
			}
		}

		self.report_failure(&response.body);

		None
	}

	fn extract_otp(&self, body: &str) -> Option<Otp> {
		let fields = self.converter.from_body(body).ok()?;
		let value = fields.get(OTP_FIELD)?.as_str()?;

		OtpSecret::new(value).ok().map(Otp::new)
	}

	fn report_failure(&self, body: &str) {
		let shown = if body.is_empty() { EMPTY_BODY_MARKER } else { body };

		self.sink.warn(&format!("{FAILURE_PREFIX}: {shown}"));
	}
}
#[cfg(feature = "reqwest")]
impl OtpRequester<ReqwestTransport> {
	/// Creates a requester backed by a fresh [`ReqwestTransport`] and [`JsonConverter`].
	///
	/// Fails with [`Error::Config`](crate::error::Error::Config) when the HTTP client cannot be built.
	pub fn new(store: Arc<dyn TokenStore>, config: Arc<dyn ConfigReader>) -> Result<Self> {
		Ok(Self::with_transport(store, config, ReqwestTransport::new()?, Arc::new(JsonConverter)))
	}
}
impl<T> Debug for OtpRequester<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OtpRequester")
			.field("otp_url", &self.config.value(OTP_URL_PATH))
			.field("content_type", &self.converter.content_type())
			.finish()
	}
}
