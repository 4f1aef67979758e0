use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Point-in-time snapshot of a blood request, taken when the record is
/// persisted. The notifier acts on this snapshot, not on a re-read of the
/// row, so it always sees the record as it was created.
///
/// Fields mirror storage: `status` and `required_blood_group` stay raw
/// strings so a malformed record short-circuits the notifier instead of
/// failing event deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestSnapshot {
    pub id: Uuid,
    pub patient_name: String,
    pub required_blood_group: String,
    pub units_required: i32,
    pub hospital_name: String,
    pub hospital_location: Option<String>,
    pub urgency: Option<String>,
    pub contact_person: String,
    pub contact_number: String,
    pub additional_info: Option<String>,
    pub status: String,
}

/// Job for when a blood request is created
///
/// `request` is `None` when the producer could not attach a snapshot of
/// the new row; the notifier logs and skips such events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BloodRequestCreatedJob {
    pub request_id: Uuid,
    pub request: Option<RequestSnapshot>,
}

/// Job for when a blood request changes status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestStatusChangedJob {
    pub request_id: Uuid,
    pub status: String,
}

/// Job for when a donor registers a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorRegisteredJob {
    pub donor_id: Uuid,
    pub blood_group: String,
}

/// Core job enum containing all possible job types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Job {
    BloodRequestCreated(BloodRequestCreatedJob),
    RequestStatusChanged(RequestStatusChangedJob),
    DonorRegistered(DonorRegisteredJob),
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Job::BloodRequestCreated(job) => {
                write!(f, "BloodRequestCreated(request_id: {})", job.request_id)
            }
            Job::RequestStatusChanged(job) => write!(
                f,
                "RequestStatusChanged(request_id: {}, status: {})",
                job.request_id, job.status
            ),
            Job::DonorRegistered(job) => write!(
                f,
                "DonorRegistered(donor_id: {}, blood_group: {})",
                job.donor_id, job.blood_group
            ),
        }
    }
}

// Core queue abstraction - bloodlink-queue implements this
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("Failed to send job: {0}")]
    SendError(String),
    #[error("Failed to receive job: {0}")]
    ReceiveError(String),
    #[error("Queue channel closed")]
    ChannelClosed,
    #[error("Invalid job data: {0}")]
    InvalidData(String),
}

/// Core trait for job queue operations
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Send a job to the queue
    async fn send(&self, job: Job) -> Result<(), QueueError>;

    /// Create a new receiver for jobs
    fn subscribe(&self) -> Box<dyn JobReceiver>;
}

/// Core trait for receiving jobs
#[async_trait]
pub trait JobReceiver: Send {
    /// Receive the next job
    async fn recv(&mut self) -> Result<Job, QueueError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_display() {
        let id = Uuid::new_v4();
        let job = Job::BloodRequestCreated(BloodRequestCreatedJob {
            request_id: id,
            request: None,
        });
        assert_eq!(job.to_string(), format!("BloodRequestCreated(request_id: {})", id));
    }

    #[test]
    fn test_job_serialization_round_trip() {
        let job = Job::RequestStatusChanged(RequestStatusChangedJob {
            request_id: Uuid::new_v4(),
            status: "fulfilled".to_string(),
        });
        let json = serde_json::to_string(&job).unwrap();
        let parsed: Job = serde_json::from_str(&json).unwrap();
        match parsed {
            Job::RequestStatusChanged(j) => assert_eq!(j.status, "fulfilled"),
            other => panic!("unexpected job: {}", other),
        }
    }
}
