//! Process-wide holder of the current access credential.
//!
//! [`CredentialStore`] keeps at most one [`Credential`] in memory together with a
//! [`Generation`] counter that advances on every mutation. The dispatcher records the
//! generation each request was sent with, which lets the refresh coordinator tell a
//! genuinely expired credential apart from a 401 that raced an already completed refresh.

// self
use crate::{_prelude::*, auth::Credential};

/// Monotonic counter identifying one state of the [`CredentialStore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);
impl Generation {
	/// Returns the raw counter value.
	pub const fn get(self) -> u64 {
		self.0
	}

	const fn next(self) -> Self {
		Self(self.0.wrapping_add(1))
	}
}

/// Consistent view of the store taken under a single read lock.
#[derive(Clone, Debug, Default)]
pub struct CredentialSnapshot {
	/// Credential that was current when the snapshot was taken.
	pub credential: Option<Credential>,
	/// Store generation at the time of the snapshot.
	pub generation: Generation,
}

#[derive(Debug, Default)]
struct StoreState {
	current: Option<Credential>,
	generation: Generation,
}

/// Thread-safe, in-memory credential holder shared by every request.
///
/// Writers are the refresh coordinator (on a successful refresh), the fallback policy (on
/// clear), and the session operations (login/logout). Everything else only reads.
#[derive(Debug, Default)]
pub struct CredentialStore(RwLock<StoreState>);
impl CredentialStore {
	/// Creates a store pre-populated with `credential`.
	pub fn with_credential(credential: Credential) -> Self {
		let store = Self::default();

		store.replace(credential);

		store
	}

	/// Returns the current credential and generation atomically.
	pub fn snapshot(&self) -> CredentialSnapshot {
		let state = self.0.read();

		CredentialSnapshot { credential: state.current.clone(), generation: state.generation }
	}

	/// Returns a clone of the current credential, if any.
	pub fn current(&self) -> Option<Credential> {
		self.0.read().current.clone()
	}

	/// Returns the current generation.
	pub fn generation(&self) -> Generation {
		self.0.read().generation
	}

	/// Returns `true` when a credential is held.
	pub fn is_authenticated(&self) -> bool {
		self.0.read().current.is_some()
	}

	/// Installs `credential`, superseding the previous one for every subsequent request.
	pub fn replace(&self, credential: Credential) -> Generation {
		let mut state = self.0.write();

		state.current = Some(credential);
		state.generation = state.generation.next();

		state.generation
	}

	/// Drops the current credential, returning it if one was held.
	pub fn clear(&self) -> Option<Credential> {
		let mut state = self.0.write();
		let previous = state.current.take();

		state.generation = state.generation.next();

		previous
	}

	/// Returns the current credential if the store moved past `observed` and still holds one.
	pub fn newer_than(&self, observed: Generation) -> Option<Credential> {
		let state = self.0.read();

		if state.generation > observed { state.current.clone() } else { None }
	}
}
