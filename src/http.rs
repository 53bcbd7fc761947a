//! Transport primitives for calls to the MBI service.
//!
//! The module exposes [`HttpTransport`] alongside the [`Method`], [`Payload`], and
//! [`HttpResponse`] values it exchanges so downstream crates can plug in their own HTTP
//! stack. A transport returns `Err` only when no response was obtained at all; every
//! HTTP status, including 4xx and 5xx, comes back as an [`HttpResponse`].

// crates.io
#[cfg(feature = "reqwest")]
use reqwest::{
	Method as ReqwestMethod,
	header::{ACCEPT, CONTENT_TYPE},
	redirect::Policy,
};
// self
#[cfg(feature = "reqwest")]
use crate::{
	convert::{BodyConverter, JsonConverter},
	error::ConfigError,
};
use crate::{_prelude::*, error::TransportError};

/// Key/value request payload, encoded by the transport's body converter.
pub type Payload = BTreeMap<String, String>;

/// Boxed future returned by [`HttpTransport::request`].
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TransportError>> + 'a + Send>>;

/// HTTP methods supported by the transport contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the method token as sent on the wire.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
#[cfg(feature = "reqwest")]
impl From<Method> for ReqwestMethod {
	fn from(method: Method) -> Self {
		match method {
			Method::Get => ReqwestMethod::GET,
			Method::Post => ReqwestMethod::POST,
			Method::Put => ReqwestMethod::PUT,
			Method::Delete => ReqwestMethod::DELETE,
		}
	}
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// Numeric HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
}
impl HttpResponse {
	/// Builds a response from its parts.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		Self { status, body: body.into() }
	}
}

/// Abstraction over HTTP stacks able to deliver a payload and hand back the response.
///
/// Implementations must be `Send + Sync + 'static` so a single transport can be shared
/// behind an `Arc` by every requester in the process.
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `payload` to `url` using `method`.
	///
	/// `url` is passed exactly as read from configuration; validating it is the
	/// transport's job.
	fn request<'a>(
		&'a self,
		method: Method,
		url: &'a str,
		payload: &'a Payload,
	) -> TransportFuture<'a, HttpResponse>;
}

/// Reqwest-backed [`HttpTransport`] that encodes payloads through a [`BodyConverter`].
///
/// Clients built by [`ReqwestTransport::new`] do not follow redirects; the OTP endpoint
/// must answer directly.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestTransport {
	client: ReqwestClient,
	converter: Arc<dyn BodyConverter>,
}
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a transport with a fresh client that does not follow redirects.
	pub fn new() -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().redirect(Policy::none()).build()?;

		Ok(Self::with_client(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	///
	/// Configure timeouts and redirect handling on the client before passing it in.
	pub fn with_client(client: ReqwestClient) -> Self {
		Self { client, converter: Arc::new(JsonConverter) }
	}

	/// Replaces the converter used to encode request payloads.
	pub fn with_converter(mut self, converter: Arc<dyn BodyConverter>) -> Self {
		self.converter = converter;

		self
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ReqwestTransport")
			.field("content_type", &self.converter.content_type())
			.finish()
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn request<'a>(
		&'a self,
		method: Method,
		url: &'a str,
		payload: &'a Payload,
	) -> TransportFuture<'a, HttpResponse> {
		Box::pin(async move {
			let target = Url::parse(url)
				.map_err(|source| TransportError::InvalidUrl { url: url.to_owned(), source })?;
			let body = self.converter.to_body(payload)?;
			let content_type = self.converter.content_type();
			let response = self
				.client
				.request(method.into(), target)
				.header(CONTENT_TYPE, content_type)
				.header(ACCEPT, content_type)
				.body(body)
				.send()
				.await?;
			let status = response.status().as_u16();
			let body = response.text().await?;

			Ok(HttpResponse { status, body })
		})
	}
}
