//! Configuration lookup consumed by the OTP requester.

// std
use std::{fs, path::Path};
// self
use crate::{_prelude::*, error::ConfigError};

/// Path of the setting that holds the OTP service URL.
pub const OTP_URL_PATH: &str = "analytics/url/otp";
/// Path of the setting that holds the store's secure base URL.
pub const SECURE_BASE_URL_PATH: &str = "web/secure/base_url";

/// Read-only view over installation settings keyed by slash-delimited paths.
pub trait ConfigReader
where
	Self: Send + Sync,
{
	/// Returns the value stored at `path`, if any.
	fn value(&self, path: &str) -> Option<String>;
}

/// Static path → value map, typically loaded once from a JSON document.
///
/// Empty values are treated as absent so lookups never hand out blank URLs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticConfig(BTreeMap<String, String>);
impl StaticConfig {
	/// Sets or replaces the value at `path`.
	pub fn with_value(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(path.into(), value.into());

		self
	}

	/// Parses a flat JSON object of `"path": "value"` pairs.
	pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
		let de = &mut serde_json::Deserializer::from_str(raw);

		Ok(serde_path_to_error::deserialize(de)?)
	}

	/// Reads and parses a JSON configuration file.
	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let raw = fs::read_to_string(path)?;

		Self::from_json_str(&raw)
	}
}
impl ConfigReader for StaticConfig {
	fn value(&self, path: &str) -> Option<String> {
		self.0.get(path).filter(|value| !value.is_empty()).cloned()
	}
}
