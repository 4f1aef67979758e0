//! Implementation of job queue using tokio channels
//!
//! This crate implements the JobQueue trait from bloodlink-core using
//! tokio's broadcast channel, so every subscriber sees every job.

pub mod queue;

pub use queue::*;

// Re-export core traits for convenience
pub use bloodlink_core::{Job, JobQueue, JobReceiver, QueueError};
