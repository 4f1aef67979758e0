//! Donor-matching and notification fan-out for newly created blood requests.

use crate::outbox::{MailOutbox, OutboundEmail};
use crate::templates;
use bloodlink_core::{BloodRequestCreatedJob, RequestStatus};
use bloodlink_entities::donors;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Notifier service errors
#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Donor directory query failed: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Outcome counts for one fan-out invocation
///
/// Recorded to the operational log only; nothing consumes this as a
/// result value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanoutSummary {
    /// Donors matching blood group, availability and profile-active flags
    pub matched: usize,
    /// Notification records written to the mail queue
    pub notified: usize,
    /// Matched donors skipped for having no email on file
    pub skipped_no_email: usize,
    /// Matched donors whose mail-queue write failed
    pub failed: usize,
}

enum DispatchOutcome {
    Sent,
    SkippedNoEmail,
    Failed,
}

/// Reacts to blood-request creation events: looks up eligible donors and
/// writes one outbound mail record per matched donor.
///
/// Stateless per invocation; dependencies are injected once at startup.
pub struct NotifierService {
    db: Arc<DatabaseConnection>,
    outbox: Arc<dyn MailOutbox>,
    org_name: String,
}

impl NotifierService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        outbox: Arc<dyn MailOutbox>,
        org_name: impl Into<String>,
    ) -> Self {
        Self {
            db,
            outbox,
            org_name: org_name.into(),
        }
    }

    /// Process one request-created event.
    ///
    /// Precondition failures (missing payload, inactive status, missing
    /// blood group, empty match set) are informational skips, not errors.
    /// A donor directory failure ends the invocation with nothing written.
    /// Per-donor write failures are isolated: they are logged and counted,
    /// and never block the remaining donors.
    pub async fn notify_donors(
        &self,
        job: &BloodRequestCreatedJob,
    ) -> Result<FanoutSummary, NotifierError> {
        let Some(request) = job.request.as_ref() else {
            info!(
                "No data associated with request-created event {}. No notifications will be sent.",
                job.request_id
            );
            return Ok(FanoutSummary::default());
        };

        if RequestStatus::from_str(&request.status) != Some(RequestStatus::Active) {
            info!(
                "Request {} is not active (status: {}). No notifications will be sent.",
                request.id, request.status
            );
            return Ok(FanoutSummary::default());
        }

        let blood_group = request.required_blood_group.trim();
        if blood_group.is_empty() {
            info!(
                "Request {} has no required blood group. No notifications will be sent.",
                request.id
            );
            return Ok(FanoutSummary::default());
        }

        info!(
            "Processing request {} for blood group {}",
            request.id, blood_group
        );

        let matching_donors = donors::Entity::find()
            .filter(donors::Column::BloodGroup.eq(blood_group))
            .filter(donors::Column::IsAvailable.eq(true))
            .filter(donors::Column::IsProfileActive.eq(true))
            .all(self.db.as_ref())
            .await?;

        if matching_donors.is_empty() {
            info!(
                "No matching available/active donors found for blood group {}.",
                blood_group
            );
            return Ok(FanoutSummary::default());
        }

        info!(
            "Found {} matching donors for {}.",
            matching_donors.len(),
            blood_group
        );

        // Fire all writes, then wait for all to settle. One donor's failure
        // neither cancels nor blocks the others.
        let dispatches = matching_donors.iter().map(|donor| {
            let outbox = self.outbox.clone();
            async move {
                let Some(email) = donor
                    .email
                    .as_deref()
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                else {
                    info!("Donor {} has no email. Skipping.", donor.id);
                    return DispatchOutcome::SkippedNoEmail;
                };

                let message = OutboundEmail {
                    to: email.to_string(),
                    subject: templates::render_subject(blood_group, &self.org_name),
                    html: templates::render_html_body(&donor.full_name, request, &self.org_name),
                    text: templates::render_text_body(&donor.full_name, request, &self.org_name),
                };

                match outbox.enqueue(message).await {
                    Ok(()) => {
                        info!("📧 Mail record created for donor: {}", email);
                        DispatchOutcome::Sent
                    }
                    Err(e) => {
                        error!("Failed to create mail record for donor {}: {}", email, e);
                        DispatchOutcome::Failed
                    }
                }
            }
        });

        let outcomes = futures::future::join_all(dispatches).await;

        let mut summary = FanoutSummary {
            matched: outcomes.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                DispatchOutcome::Sent => summary.notified += 1,
                DispatchOutcome::SkippedNoEmail => summary.skipped_no_email += 1,
                DispatchOutcome::Failed => summary.failed += 1,
            }
        }

        info!(
            "Finished processing notifications for request {}: {} matched, {} notified, {} skipped, {} failed",
            request.id, summary.matched, summary.notified, summary.skipped_no_email, summary.failed
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockMailOutbox;
    use bloodlink_core::chrono::Utc;
    use bloodlink_core::RequestSnapshot;
    use bloodlink_database::test_utils::setup_test_db;
    use bloodlink_database::DbConnection;
    use sea_orm::ActiveValue::Set;
    use sea_orm::ActiveModelTrait;
    use uuid::Uuid;

    async fn insert_donor(
        db: &DbConnection,
        blood_group: &str,
        is_available: bool,
        is_profile_active: bool,
        email: Option<&str>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        donors::ActiveModel {
            id: Set(id),
            user_id: Set(format!("user-{}", id)),
            email: Set(email.map(|e| e.to_string())),
            full_name: Set("Test Donor".to_string()),
            blood_group: Set(blood_group.to_string()),
            phone_number: Set("555-0199".to_string()),
            is_available: Set(is_available),
            is_profile_active: Set(is_profile_active),
            is_verified: Set(None),
            show_contact: Set(None),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
        }
        .insert(db)
        .await
        .unwrap();
        id
    }

    fn snapshot(status: &str, blood_group: &str) -> RequestSnapshot {
        RequestSnapshot {
            id: Uuid::new_v4(),
            patient_name: "Jane Smith".to_string(),
            required_blood_group: blood_group.to_string(),
            units_required: 2,
            hospital_name: "University Hospital".to_string(),
            hospital_location: None,
            urgency: Some("urgent".to_string()),
            contact_person: "John Roe".to_string(),
            contact_number: "555-0100".to_string(),
            additional_info: None,
            status: status.to_string(),
        }
    }

    fn job(request: Option<RequestSnapshot>) -> BloodRequestCreatedJob {
        BloodRequestCreatedJob {
            request_id: request.as_ref().map(|r| r.id).unwrap_or_else(Uuid::new_v4),
            request,
        }
    }

    fn service(
        db: Arc<DbConnection>,
        outbox: Arc<MockMailOutbox>,
    ) -> NotifierService {
        NotifierService::new(db, outbox, "BloodLink")
    }

    #[tokio::test]
    async fn test_matching_donor_gets_one_notification() {
        let db = setup_test_db().await;
        insert_donor(&db, "O-", true, true, Some("a@x.com")).await;
        insert_donor(&db, "O-", false, true, Some("b@x.com")).await;
        let outbox = Arc::new(MockMailOutbox::new());

        let summary = service(db, outbox.clone())
            .notify_donors(&job(Some(snapshot("active", "O-"))))
            .await
            .unwrap();

        assert_eq!(summary.matched, 1);
        assert_eq!(summary.notified, 1);
        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@x.com");
        assert_eq!(sent[0].subject, "Urgent Blood Request: O- Needed - BloodLink");
    }

    #[tokio::test]
    async fn test_inactive_request_sends_nothing() {
        let db = setup_test_db().await;
        insert_donor(&db, "A+", true, true, Some("a@x.com")).await;
        let outbox = Arc::new(MockMailOutbox::new());

        let summary = service(db, outbox.clone())
            .notify_donors(&job(Some(snapshot("fulfilled", "A+"))))
            .await
            .unwrap();

        assert_eq!(summary, FanoutSummary::default());
        assert_eq!(outbox.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_blood_group_sends_nothing() {
        let db = setup_test_db().await;
        insert_donor(&db, "A+", true, true, Some("a@x.com")).await;
        let outbox = Arc::new(MockMailOutbox::new());

        let summary = service(db, outbox.clone())
            .notify_donors(&job(Some(snapshot("active", "  "))))
            .await
            .unwrap();

        assert_eq!(summary, FanoutSummary::default());
        assert_eq!(outbox.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_payload_sends_nothing() {
        let db = setup_test_db().await;
        insert_donor(&db, "A+", true, true, Some("a@x.com")).await;
        let outbox = Arc::new(MockMailOutbox::new());

        let summary = service(db, outbox.clone())
            .notify_donors(&job(None))
            .await
            .unwrap();

        assert_eq!(summary, FanoutSummary::default());
        assert_eq!(outbox.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_no_matching_donors_is_clean_exit() {
        let db = setup_test_db().await;
        insert_donor(&db, "A+", true, true, Some("a@x.com")).await;
        let outbox = Arc::new(MockMailOutbox::new());

        let summary = service(db, outbox.clone())
            .notify_donors(&job(Some(snapshot("active", "B+"))))
            .await
            .unwrap();

        assert_eq!(summary, FanoutSummary::default());
        assert_eq!(outbox.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_donor_without_email_is_skipped() {
        let db = setup_test_db().await;
        insert_donor(&db, "AB-", true, true, None).await;
        let outbox = Arc::new(MockMailOutbox::new());

        let summary = service(db, outbox.clone())
            .notify_donors(&job(Some(snapshot("active", "AB-"))))
            .await
            .unwrap();

        assert_eq!(summary.matched, 1);
        assert_eq!(summary.skipped_no_email, 1);
        assert_eq!(summary.notified, 0);
        assert_eq!(outbox.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_eligibility_requires_all_flags() {
        let db = setup_test_db().await;
        insert_donor(&db, "B+", true, true, Some("eligible@x.com")).await;
        insert_donor(&db, "B+", false, true, Some("unavailable@x.com")).await;
        insert_donor(&db, "B+", true, false, Some("inactive@x.com")).await;
        insert_donor(&db, "O+", true, true, Some("wrong-group@x.com")).await;
        let outbox = Arc::new(MockMailOutbox::new());

        let summary = service(db, outbox.clone())
            .notify_donors(&job(Some(snapshot("active", "B+"))))
            .await
            .unwrap();

        assert_eq!(summary.matched, 1);
        assert_eq!(summary.notified, 1);
        assert_eq!(outbox.sent()[0].to, "eligible@x.com");
    }

    #[tokio::test]
    async fn test_one_failing_write_does_not_block_others() {
        let db = setup_test_db().await;
        insert_donor(&db, "O-", true, true, Some("first@x.com")).await;
        insert_donor(&db, "O-", true, true, Some("second@x.com")).await;
        let outbox = Arc::new(MockMailOutbox::new().with_failure_for("first@x.com"));

        let summary = service(db, outbox.clone())
            .notify_donors(&job(Some(snapshot("active", "O-"))))
            .await
            .unwrap();

        assert_eq!(summary.matched, 2);
        assert_eq!(summary.notified, 1);
        assert_eq!(summary.failed, 1);
        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "second@x.com");
    }

    #[tokio::test]
    async fn test_redelivery_duplicates_notifications() {
        // Idempotence is explicitly not guaranteed for re-delivered events.
        let db = setup_test_db().await;
        insert_donor(&db, "A-", true, true, Some("a@x.com")).await;
        let outbox = Arc::new(MockMailOutbox::new());
        let service = service(db, outbox.clone());
        let event = job(Some(snapshot("active", "A-")));

        service.notify_donors(&event).await.unwrap();
        service.notify_donors(&event).await.unwrap();

        assert_eq!(outbox.sent_count(), 2);
    }

    #[tokio::test]
    async fn test_bodies_carry_request_details() {
        let db = setup_test_db().await;
        insert_donor(&db, "O-", true, true, Some("a@x.com")).await;
        let outbox = Arc::new(MockMailOutbox::new());

        let mut request = snapshot("active", "O-");
        request.hospital_location = Some("North Campus".to_string());
        request.additional_info = Some("Needed before Friday".to_string());

        service(db, outbox.clone())
            .notify_donors(&job(Some(request)))
            .await
            .unwrap();

        let sent = outbox.sent();
        for body in [&sent[0].html, &sent[0].text] {
            assert!(body.contains("Jane Smith"));
            assert!(body.contains("University Hospital (North Campus)"));
            assert!(body.contains("Urgent"));
            assert!(body.contains("John Roe"));
            assert!(body.contains("Needed before Friday"));
        }
    }
}
