//! Provider-facing endpoints (data) and strategies (behavior).
//!
//! `endpoint` names the two provider endpoints the hook talks to and derives their URLs from a
//! tenant subdomain. `strategy` defines [`ProviderStrategy`], an HTTP-client-agnostic hook used
//! to decorate grant requests and map token endpoint errors into the hook's error taxonomy.

pub mod endpoint;
pub mod strategy;

pub use endpoint::*;
pub use strategy::*;
