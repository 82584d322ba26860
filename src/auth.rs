//! Auth-domain values: the bearer credential, single-use nonces, and path identifiers.

pub mod credential;
pub mod id;
pub mod nonce;

pub use credential::*;
pub use id::*;
pub use nonce::*;
