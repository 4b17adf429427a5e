//! Post-authentication redirect validation.
//!
//! A redirect target is acceptable when it matches the configured whitelist,
//! or when the request came in on a recognized environment domain whose
//! same-origin exception covers the target. Hosts outside the recognized
//! environments get whitelist-only behavior.

mod exception;
mod validator;
mod whitelist;

pub use exception::{EnvironmentDomain, SameOriginException};
pub use validator::{RedirectError, RedirectValidator};
pub use whitelist::RedirectWhitelist;
