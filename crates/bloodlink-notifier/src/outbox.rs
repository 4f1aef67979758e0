//! Outbound mail queue abstraction
//!
//! The notifier never sends email itself; it appends one record per
//! notification to the `mail` table, which an external mail-dispatch
//! service consumes. The trait exists so tests can observe and fail
//! individual writes.

use async_trait::async_trait;
use bloodlink_core::chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// One outbound message task, addressed to a single donor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[derive(Error, Debug)]
pub enum OutboxError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Mail write rejected: {0}")]
    Rejected(String),
}

/// Append-only interface to the outbound mail queue
#[async_trait]
pub trait MailOutbox: Send + Sync {
    async fn enqueue(&self, email: OutboundEmail) -> Result<(), OutboxError>;
}

/// Production outbox backed by the `mail` table
pub struct SeaOrmMailOutbox {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmMailOutbox {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MailOutbox for SeaOrmMailOutbox {
    async fn enqueue(&self, email: OutboundEmail) -> Result<(), OutboxError> {
        let record = bloodlink_entities::mail::ActiveModel {
            id: Set(Uuid::new_v4()),
            to_address: Set(email.to),
            subject: Set(email.subject),
            html_body: Set(email.html),
            text_body: Set(email.text),
            created_at: Set(Utc::now()),
        };
        record.insert(self.db.as_ref()).await?;
        Ok(())
    }
}
