//! # bloodlink-api
//!
//! HTTP surface for the BloodLink application:
//! - Posting and listing blood requests
//! - Registering donor profiles and managing availability
//!
//! Creating a request publishes a `BloodRequestCreated` job for the
//! notifier; the POST succeeds independently of notification outcome.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{configure_routes, ApiDoc, ApiState};
