//! # bloodlink-notifier
//!
//! Donor-matching and notification fan-out for new blood requests.
//!
//! This crate provides functionality for:
//! - Listening for blood-request creation events on the job queue
//! - Matching eligible donors by blood group and availability
//! - Rendering notification emails (HTML + plain text)
//! - Writing one outbound mail record per eligible donor

mod listener;
mod mock;
mod outbox;
mod service;
mod templates;

pub use listener::RequestEventListener;
pub use mock::MockMailOutbox;
pub use outbox::{MailOutbox, OutboundEmail, OutboxError, SeaOrmMailOutbox};
pub use service::{FanoutSummary, NotifierError, NotifierService};
