//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	store::{StoreFuture, TokenStore},
};

type Slot = Arc<RwLock<Option<AccessToken>>>;

/// Thread-safe storage backend that keeps the token in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Slot);
impl MemoryStore {
	/// Creates a store that already holds `token`.
	pub fn with_token(token: AccessToken) -> Self {
		Self(Arc::new(RwLock::new(Some(token))))
	}
}
impl TokenStore for MemoryStore {
	fn fetch(&self) -> StoreFuture<'_, Option<AccessToken>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn save(&self, token: AccessToken) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(token);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, Option<AccessToken>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.write().take()) })
	}
}
