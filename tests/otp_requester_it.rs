// std
use std::{collections::VecDeque, sync::Arc};
// crates.io
use parking_lot::Mutex;
// self
use analytics_otp::{
	OtpRequester,
	auth::AccessToken,
	config::{OTP_URL_PATH, SECURE_BASE_URL_PATH, StaticConfig},
	convert::JsonConverter,
	error::TransportError,
	http::{HttpResponse, HttpTransport, Method, Payload, TransportFuture},
	obs::RecordingSink,
	store::{MemoryStore, StoreError, StoreFuture, TokenStore},
};

const OTP_URL: &str = "https://mbi.example.com/otp";
const BASE_URL: &str = "https://store.example.com/";
const FAILURE_PREFIX: &str = "Obtaining of an OTP from the MBI service has been failed: ";

#[derive(Clone, Debug)]
struct RecordedCall {
	method: Method,
	url: String,
	payload: Payload,
}

#[derive(Default)]
struct ScriptedTransport {
	replies: Mutex<VecDeque<Option<HttpResponse>>>,
	calls: Mutex<Vec<RecordedCall>>,
}
impl ScriptedTransport {
	fn replying(reply: Option<HttpResponse>) -> Arc<Self> {
		let transport = Self::default();

		transport.replies.lock().push_back(reply);

		Arc::new(transport)
	}

	fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().clone()
	}
}
impl HttpTransport for ScriptedTransport {
	fn request<'a>(
		&'a self,
		method: Method,
		url: &'a str,
		payload: &'a Payload,
	) -> TransportFuture<'a, HttpResponse> {
		self.calls.lock().push(RecordedCall {
			method,
			url: url.to_owned(),
			payload: payload.clone(),
		});

		let reply = self.replies.lock().pop_front().flatten();

		Box::pin(async move {
			reply.ok_or_else(|| TransportError::Io(std::io::ErrorKind::TimedOut.into()))
		})
	}
}

struct BrokenStore;
impl TokenStore for BrokenStore {
	fn fetch(&self) -> StoreFuture<'_, Option<AccessToken>> {
		Box::pin(async move {
			Err::<Option<AccessToken>, _>(StoreError::Backend { message: "disk offline".into() })
		})
	}

	fn save(&self, _token: AccessToken) -> StoreFuture<'_, ()> {
		Box::pin(async move { Ok(()) })
	}

	fn clear(&self) -> StoreFuture<'_, Option<AccessToken>> {
		Box::pin(async move { Ok(None) })
	}
}

/// Store that claims a token exists but hands back nothing, as after a concurrent clear.
struct VanishingStore;
impl TokenStore for VanishingStore {
	fn fetch(&self) -> StoreFuture<'_, Option<AccessToken>> {
		Box::pin(async move { Ok(None) })
	}

	fn exists(&self) -> StoreFuture<'_, bool> {
		Box::pin(async move { Ok(true) })
	}

	fn save(&self, _token: AccessToken) -> StoreFuture<'_, ()> {
		Box::pin(async move { Ok(()) })
	}

	fn clear(&self) -> StoreFuture<'_, Option<AccessToken>> {
		Box::pin(async move { Ok(None) })
	}
}

fn config() -> StaticConfig {
	StaticConfig::default()
		.with_value(OTP_URL_PATH, OTP_URL)
		.with_value(SECURE_BASE_URL_PATH, BASE_URL)
}

fn token_store(value: &str) -> Arc<dyn TokenStore> {
	Arc::new(MemoryStore::with_token(
		AccessToken::new(value).expect("Access token fixture should be valid."),
	))
}

fn build_requester(
	store: Arc<dyn TokenStore>,
	transport: Arc<ScriptedTransport>,
) -> (OtpRequester<ScriptedTransport>, RecordingSink) {
	let sink = RecordingSink::default();
	let requester = OtpRequester::with_transport(
		store,
		Arc::new(config()),
		transport,
		Arc::new(JsonConverter),
	)
	.with_sink(Arc::new(sink.clone()));

	(requester, sink)
}

#[tokio::test]
async fn missing_token_skips_network_and_logging() {
	let transport = ScriptedTransport::replying(Some(HttpResponse::new(201, r#"{"otp":"x"}"#)));
	let (requester, sink) = build_requester(Arc::new(MemoryStore::default()), transport.clone());

	assert!(requester.obtain_otp().await.is_none());
	assert!(transport.calls().is_empty(), "No request may be sent without a token.");
	assert!(sink.messages().is_empty(), "A missing token must not be logged.");
}

#[tokio::test]
async fn created_response_with_otp_yields_password() {
	let transport = ScriptedTransport::replying(Some(HttpResponse::new(
		201,
		r#"{"otp":"249e6b658877bde2a77bc4ab"}"#,
	)));
	let (requester, sink) = build_requester(token_store("stored-token"), transport.clone());
	let otp = requester.obtain_otp().await.expect("A 201 response with an OTP should succeed.");

	assert_eq!(otp.expose(), "249e6b658877bde2a77bc4ab");
	assert!(sink.messages().is_empty());
	assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn created_response_without_otp_logs_body() {
	for body in [r#"{"status":"ok"}"#, r#"{"otp":""}"#, r#"{"otp":42}"#, "not json"] {
		let transport = ScriptedTransport::replying(Some(HttpResponse::new(201, body)));
		let (requester, sink) = build_requester(token_store("stored-token"), transport);

		assert!(requester.obtain_otp().await.is_none(), "Body {body} must not yield an OTP.");
		assert_eq!(sink.messages(), vec![format!("{FAILURE_PREFIX}{body}")]);
	}
}

#[tokio::test]
async fn non_created_status_logs_body() {
	for status in [200, 400, 401, 500] {
		let body = format!("{{\"otp\":\"ignored\",\"status\":{status}}}");
		let transport = ScriptedTransport::replying(Some(HttpResponse::new(status, body.clone())));
		let (requester, sink) = build_requester(token_store("stored-token"), transport);

		assert!(requester.obtain_otp().await.is_none(), "Status {status} must not yield an OTP.");
		assert_eq!(sink.messages(), vec![format!("{FAILURE_PREFIX}{body}")]);
	}
}

#[tokio::test]
async fn empty_error_body_logs_marker() {
	let transport = ScriptedTransport::replying(Some(HttpResponse::new(500, "")));
	let (requester, sink) = build_requester(token_store("stored-token"), transport);

	assert!(requester.obtain_otp().await.is_none());
	assert_eq!(sink.messages(), vec![format!("{FAILURE_PREFIX}Response body is empty.")]);
}

#[tokio::test]
async fn missing_response_logs_marker() {
	let transport = ScriptedTransport::replying(None);
	let (requester, sink) = build_requester(token_store("stored-token"), transport.clone());

	assert!(requester.call().await.is_none());
	assert_eq!(transport.calls().len(), 1);
	assert_eq!(sink.messages(), vec![format!("{FAILURE_PREFIX}Response body is empty.")]);
}

#[tokio::test]
async fn payload_always_carries_token_and_base_url() {
	let replies = [
		Some(HttpResponse::new(201, r#"{"otp":"abc"}"#)),
		Some(HttpResponse::new(500, "boom")),
		None,
	];

	for reply in replies {
		let transport = ScriptedTransport::replying(reply);
		let (requester, _) = build_requester(token_store("stored-token"), transport.clone());

		let _ = requester.obtain_otp().await;

		let calls = transport.calls();
		let call = calls.first().expect("Exactly one request should be recorded.");

		assert_eq!(calls.len(), 1);
		assert_eq!(call.method, Method::Post);
		assert_eq!(call.url, OTP_URL);
		assert_eq!(call.payload.len(), 2);
		assert_eq!(call.payload.get("access-token").map(String::as_str), Some("stored-token"));
		assert_eq!(call.payload.get("url").map(String::as_str), Some(BASE_URL));
	}
}

#[tokio::test]
async fn store_failure_is_absorbed_with_one_warning() {
	let transport = ScriptedTransport::replying(Some(HttpResponse::new(201, r#"{"otp":"x"}"#)));
	let (requester, sink) = build_requester(Arc::new(BrokenStore), transport.clone());

	assert!(requester.obtain_otp().await.is_none());
	assert!(transport.calls().is_empty());

	let messages = sink.messages();

	assert_eq!(messages.len(), 1);
	assert!(messages[0].contains("disk offline"));
}

#[tokio::test]
async fn token_vanishing_after_existence_check_is_treated_as_missing() {
	let transport = ScriptedTransport::replying(Some(HttpResponse::new(201, r#"{"otp":"x"}"#)));
	let (requester, sink) = build_requester(Arc::new(VanishingStore), transport.clone());

	assert!(requester.obtain_otp().await.is_none());
	assert!(transport.calls().is_empty());
	assert!(sink.messages().is_empty());
}

#[tokio::test]
async fn token_is_reread_on_every_call() {
	let transport = Arc::new(ScriptedTransport::default());
	let store = Arc::new(MemoryStore::default());
	let (requester, _) = build_requester(store.clone(), transport.clone());

	assert!(requester.obtain_otp().await.is_none());

	store
		.save(AccessToken::new("late-token").expect("Access token fixture should be valid."))
		.await
		.expect("Saving into the memory store should succeed.");

	assert!(requester.obtain_otp().await.is_none());

	let calls = transport.calls();

	assert_eq!(calls.len(), 1, "Only the call made after the token was saved may hit the wire.");
	assert_eq!(calls[0].payload.get("access-token").map(String::as_str), Some("late-token"));
}
