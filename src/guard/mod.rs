//! Redirect guard middleware.
//!
//! Rejects requests whose redirect query parameter points somewhere the
//! registry does not allow.

mod middleware;

pub use middleware::{RedirectGuardLayer, RedirectGuardService};
