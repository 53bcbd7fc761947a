//! Redacted secret wrappers for the stored access token and the issued OTP.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Errors emitted when validating secret values.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum SecretError {
	/// Secret is an empty string.
	#[error("{kind} cannot be empty.")]
	Empty {
		/// Secret kind label.
		kind: &'static str,
	},
	/// Secret is whitespace-only or carries leading/trailing whitespace.
	#[error("{kind} cannot contain surrounding whitespace.")]
	Whitespace {
		/// Secret kind label.
		kind: &'static str,
	},
}

macro_rules! def_secret {
	($name:ident, $doc:literal, $kind:literal, $validate:path) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Wraps a secret string after validation.
			pub fn new(value: impl Into<String>) -> Result<Self, SecretError> {
				let value = value.into();

				$validate($kind, &value)?;

				Ok(Self(value))
			}

			/// Returns the inner value. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.expose()
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = SecretError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&"<redacted>").finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("<redacted>")
			}
		}
	};
}

def_secret!(
	AccessToken,
	"Long-lived analytics access token exchanged for OTPs.",
	"Access token",
	validate_token
);
def_secret!(
	OtpSecret,
	"Raw one-time password value returned by the MBI service.",
	"OTP",
	validate_non_empty
);

impl AccessToken {
	/// Stable, log-safe fingerprint of the token.
	///
	/// Unpadded base64 encoding of the SHA-256 digest of the raw value.
	pub fn fingerprint(&self) -> String {
		let digest = Sha256::digest(self.0.as_bytes());

		STANDARD_NO_PAD.encode(digest)
	}
}

/// One-time password issued by the MBI service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Otp {
	/// Redacted password value.
	pub secret: OtpSecret,
	/// Instant the password was received.
	pub received_at: OffsetDateTime,
}
impl Otp {
	/// Wraps a received password, stamping it with the current instant.
	pub fn new(secret: OtpSecret) -> Self {
		Self { secret, received_at: OffsetDateTime::now_utc() }
	}

	/// Returns the password. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.secret.expose()
	}
}

fn validate_non_empty(kind: &'static str, view: &str) -> Result<(), SecretError> {
	if view.is_empty() {
		return Err(SecretError::Empty { kind });
	}

	Ok(())
}

fn validate_token(kind: &'static str, view: &str) -> Result<(), SecretError> {
	validate_non_empty(kind, view)?;

	if view.trim() != view {
		return Err(SecretError::Whitespace { kind });
	}

	Ok(())
}
