//! Sibling service URLs derived from the inbound request host.
//!
//! Services are reached on hosts like `api.<environment domain>` and their
//! siblings live next to them, e.g. `sso.<environment domain>`. Swapping the
//! leading label means one configuration works for every environment.

mod request;
mod resolve;

pub use request::{InboundRequest, RequestInfo};
pub use resolve::{replace_domain_prefix, service_url, ServiceUrlError};
