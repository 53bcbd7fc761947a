//! Requests an OTP from a live MBI service.
//!
//! ```sh
//! ANALYTICS_ACCESS_TOKEN=... cargo run --example request_otp -- settings.json
//! ```
//!
//! `settings.json` is a flat object holding `analytics/url/otp` and `web/secure/base_url`.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use analytics_otp::{
	auth::AccessToken,
	config::StaticConfig,
	obs::RecordingSink,
	otp::ReqwestOtpRequester,
	store::MemoryStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let settings = env::args().nth(1).ok_or_else(|| eyre!("Usage: request_otp <settings.json>"))?;
	let config = StaticConfig::from_json_file(settings)?;
	let store = match env::var("ANALYTICS_ACCESS_TOKEN") {
		Ok(value) => MemoryStore::with_token(AccessToken::new(value)?),
		Err(_) => MemoryStore::default(),
	};
	let sink = RecordingSink::default();
	let requester = ReqwestOtpRequester::new(Arc::new(store), Arc::new(config))?
		.with_sink(Arc::new(sink.clone()));

	match requester.obtain_otp().await {
		Some(otp) => println!("OTP received at {}: {}.", otp.received_at, otp.expose()),
		None => {
			println!("No OTP was issued.");

			for message in sink.messages() {
				println!("warning: {message}");
			}
		},
	}

	Ok(())
}
