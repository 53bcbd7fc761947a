//! Storage contract and built-in holders for the analytics access token.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::AccessToken};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by access token holders.
///
/// A store holds at most one token. The OTP requester only reads from it; writers are
/// whatever subscribes the installation to the analytics service.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Fetches the stored token, if present.
	fn fetch(&self) -> StoreFuture<'_, Option<AccessToken>>;

	/// Reports whether a token is stored.
	fn exists(&self) -> StoreFuture<'_, bool> {
		Box::pin(async move { Ok(self.fetch().await?.is_some()) })
	}

	/// Persists or replaces the stored token.
	fn save(&self, token: AccessToken) -> StoreFuture<'_, ()>;

	/// Removes the stored token, returning the previous value.
	fn clear(&self) -> StoreFuture<'_, Option<AccessToken>>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
