//! Auth-domain models: the caller's credential, redacted secrets, and verified identity claims.

pub mod claims;
pub mod credential;
pub mod secret;

pub use claims::*;
pub use credential::*;
pub use secret::*;
