//! Exchange a stored analytics access token for a one-time password issued by the MBI
//! service, with pluggable token stores, transports, converters, and diagnostics.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod convert;
pub mod error;
pub mod http;
pub mod obs;
pub mod otp;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use reqwest::redirect::Policy;
	// self
	use crate::{
		auth::AccessToken,
		config::StaticConfig,
		convert::JsonConverter,
		http::ReqwestTransport,
		obs::RecordingSink,
		otp::{OtpRequester, ReqwestOtpRequester},
		store::MemoryStore,
	};

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests. Redirects stay disabled, as in [`ReqwestTransport::new`].
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.redirect(Policy::none())
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs a requester over [`test_reqwest_transport`] holding `token` in memory,
	/// together with the sink recording its warnings.
	pub fn build_reqwest_test_requester(
		config: StaticConfig,
		token: &str,
	) -> (ReqwestOtpRequester, RecordingSink) {
		let token = AccessToken::new(token).expect("Test access token should be valid.");
		let sink = RecordingSink::default();
		let requester = OtpRequester::with_transport(
			Arc::new(MemoryStore::with_token(token)),
			Arc::new(config),
			test_reqwest_transport(),
			Arc::new(JsonConverter),
		)
		.with_sink(Arc::new(sink.clone()));

		(requester, sink)
	}
}

pub use otp::{OtpRequest, OtpRequester};

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::Result;
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
