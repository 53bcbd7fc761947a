//! Body converters translating between request payloads and response mappings.

// crates.io
use serde_json::{Map, Value};
// self
use crate::{_prelude::*, http::Payload};

/// Decoded response body: field name → JSON value.
pub type BodyMap = Map<String, Value>;

/// Converter failures.
#[derive(Debug, ThisError)]
pub enum ConvertError {
	/// Body is not valid for the converter's format.
	#[error("Body could not be parsed.")]
	Parse(#[from] serde_json::Error),
	/// Body parsed but is not a key/value document.
	#[error("Body is a JSON {found}, expected an object.")]
	NotAnObject {
		/// JSON type label of the top-level value.
		found: &'static str,
	},
}

/// Encodes request payloads and decodes response bodies for one wire format.
pub trait BodyConverter
where
	Self: Send + Sync,
{
	/// Serializes a request payload.
	fn to_body(&self, payload: &Payload) -> Result<String, ConvertError>;

	/// Deserializes a response body into a field mapping.
	fn from_body(&self, body: &str) -> Result<BodyMap, ConvertError>;

	/// `Content-Type` header value matching [`to_body`](Self::to_body).
	fn content_type(&self) -> &'static str;
}

/// JSON converter used by the MBI connector.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonConverter;
impl BodyConverter for JsonConverter {
	fn to_body(&self, payload: &Payload) -> Result<String, ConvertError> {
		Ok(serde_json::to_string(payload)?)
	}

	fn from_body(&self, body: &str) -> Result<BodyMap, ConvertError> {
		match serde_json::from_str::<Value>(body)? {
			Value::Object(map) => Ok(map),
			other => Err(ConvertError::NotAnObject { found: json_type(&other) }),
		}
	}

	fn content_type(&self) -> &'static str {
		"application/json"
	}
}

fn json_type(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
