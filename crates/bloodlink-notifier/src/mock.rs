//! Mock mail outbox for testing

use crate::outbox::{MailOutbox, OutboundEmail, OutboxError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock outbox that records enqueued emails and can be configured to
/// reject writes for specific addresses (or all of them).
#[derive(Debug, Default)]
pub struct MockMailOutbox {
    sent: Mutex<Vec<OutboundEmail>>,
    fail_addresses: Vec<String>,
    fail_all: bool,
}

impl MockMailOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject writes addressed to `address`
    pub fn with_failure_for(mut self, address: impl Into<String>) -> Self {
        self.fail_addresses.push(address.into());
        self
    }

    /// Reject every write
    pub fn with_all_failures(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl MailOutbox for MockMailOutbox {
    async fn enqueue(&self, email: OutboundEmail) -> Result<(), OutboxError> {
        if self.fail_all || self.fail_addresses.iter().any(|a| a == &email.to) {
            return Err(OutboxError::Rejected(format!(
                "mock failure for {}",
                email.to
            )));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(to: &str) -> OutboundEmail {
        OutboundEmail {
            to: to.to_string(),
            subject: "s".to_string(),
            html: "h".to_string(),
            text: "t".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_records_sends() {
        let outbox = MockMailOutbox::new();
        outbox.enqueue(email("a@x.com")).await.unwrap();
        assert_eq!(outbox.sent_count(), 1);
        assert_eq!(outbox.sent()[0].to, "a@x.com");
    }

    #[tokio::test]
    async fn test_mock_per_address_failure() {
        let outbox = MockMailOutbox::new().with_failure_for("a@x.com");
        assert!(outbox.enqueue(email("a@x.com")).await.is_err());
        assert!(outbox.enqueue(email("b@x.com")).await.is_ok());
        assert_eq!(outbox.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_fail_all() {
        let outbox = MockMailOutbox::new().with_all_failures();
        assert!(outbox.enqueue(email("a@x.com")).await.is_err());
        assert_eq!(outbox.sent_count(), 0);
    }
}
