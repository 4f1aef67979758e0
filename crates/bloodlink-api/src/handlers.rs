//! HTTP handlers for blood requests and donor profiles.

use crate::error::ApiError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use bloodlink_core::chrono::Utc;
use bloodlink_core::{
    BloodGroup, BloodRequestCreatedJob, DonorRegisteredJob, Job, JobQueue, RequestSnapshot,
    RequestStatus, RequestStatusChangedJob, Urgency,
};
use bloodlink_entities::{blood_requests, donors};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

/// Shared state for API handlers
pub struct ApiState {
    pub db: Arc<DatabaseConnection>,
    pub queue: Arc<dyn JobQueue>,
}

impl ApiState {
    pub fn new(db: Arc<DatabaseConnection>, queue: Arc<dyn JobQueue>) -> Self {
        Self { db, queue }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_request,
        list_requests,
        update_request_status,
        create_donor,
        list_donors,
        update_donor_availability,
    ),
    components(
        schemas(
            CreateRequestBody,
            RequestResponse,
            UpdateRequestStatusBody,
            CreateDonorBody,
            DonorResponse,
            UpdateAvailabilityBody,
        )
    ),
    info(
        title = "BloodLink API",
        description = "API endpoints for blood requests and donor profiles",
        version = "1.0.0"
    ),
    tags(
        (name = "Requests", description = "Blood request endpoints"),
        (name = "Donors", description = "Donor profile endpoints")
    )
)]
pub struct ApiDoc;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRequestBody {
    /// Account identifier of the requester
    pub requester_id: String,
    #[schema(example = "requester@example.edu")]
    pub requester_email: String,
    pub patient_name: String,
    /// One of the 8 canonical ABO/Rh values
    #[schema(example = "O-")]
    pub required_blood_group: String,
    #[schema(example = 2)]
    pub units_required: i32,
    pub hospital_name: String,
    pub hospital_location: Option<String>,
    /// urgent | moderate | low
    #[schema(example = "urgent")]
    pub urgency: String,
    pub contact_person: String,
    pub contact_number: String,
    pub additional_info: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestResponse {
    pub id: Uuid,
    pub requester_id: String,
    pub patient_name: String,
    pub required_blood_group: String,
    pub units_required: i32,
    pub hospital_name: String,
    pub hospital_location: Option<String>,
    pub urgency: String,
    pub contact_person: String,
    pub contact_number: String,
    pub additional_info: Option<String>,
    pub status: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: bloodlink_core::UtcDateTime,
}

impl From<blood_requests::Model> for RequestResponse {
    fn from(model: blood_requests::Model) -> Self {
        Self {
            id: model.id,
            requester_id: model.requester_id,
            patient_name: model.patient_name,
            required_blood_group: model.required_blood_group,
            units_required: model.units_required,
            hospital_name: model.hospital_name,
            hospital_location: model.hospital_location,
            urgency: model.urgency,
            contact_person: model.contact_person,
            contact_number: model.contact_number,
            additional_info: model.additional_info,
            status: model.status,
            created_at: model.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequestStatusBody {
    /// active | fulfilled | cancelled
    #[schema(example = "fulfilled")]
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDonorBody {
    /// Owning account identifier
    pub user_id: String,
    #[schema(example = "donor@example.edu")]
    pub email: Option<String>,
    pub full_name: String,
    #[schema(example = "A+")]
    pub blood_group: String,
    pub phone_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DonorResponse {
    pub id: Uuid,
    pub full_name: String,
    pub blood_group: String,
    /// Hidden when the donor has opted out of contact visibility
    pub phone_number: Option<String>,
    pub is_available: bool,
    pub is_verified: bool,
}

impl From<donors::Model> for DonorResponse {
    fn from(model: donors::Model) -> Self {
        let show_contact = model.show_contact.unwrap_or(true);
        Self {
            id: model.id,
            full_name: model.full_name,
            blood_group: model.blood_group,
            phone_number: show_contact.then_some(model.phone_number),
            is_available: model.is_available,
            is_verified: model.is_verified.unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListDonorsQuery {
    pub blood_group: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAvailabilityBody {
    pub is_available: bool,
}

// ============================================================================
// Validation helpers
// ============================================================================

fn validate_blood_group(raw: &str) -> Result<BloodGroup, ApiError> {
    BloodGroup::from_str(raw)
        .ok_or_else(|| ApiError::Validation(format!("unknown blood group: {}", raw)))
}

fn validate_urgency(raw: &str) -> Result<Urgency, ApiError> {
    Urgency::from_str(raw).ok_or_else(|| ApiError::Validation(format!("unknown urgency: {}", raw)))
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a blood request
#[utoipa::path(
    post,
    path = "/api/requests",
    tag = "Requests",
    request_body = CreateRequestBody,
    responses(
        (status = 201, description = "Request created", body = RequestResponse),
        (status = 400, description = "Validation error")
    )
)]
async fn create_request(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<RequestResponse>), ApiError> {
    let blood_group = validate_blood_group(&body.required_blood_group)?;
    let urgency = validate_urgency(&body.urgency)?;
    if body.units_required <= 0 {
        return Err(ApiError::Validation(
            "units_required must be positive".to_string(),
        ));
    }

    let model = blood_requests::ActiveModel {
        id: Set(Uuid::new_v4()),
        requester_id: Set(body.requester_id),
        requester_email: Set(body.requester_email),
        patient_name: Set(body.patient_name),
        required_blood_group: Set(blood_group.as_str().to_string()),
        units_required: Set(body.units_required),
        hospital_name: Set(body.hospital_name),
        hospital_location: Set(body.hospital_location),
        urgency: Set(urgency.as_str().to_string()),
        contact_person: Set(body.contact_person),
        contact_number: Set(body.contact_number),
        additional_info: Set(body.additional_info),
        status: Set(RequestStatus::Active.as_str().to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(state.db.as_ref())
    .await?;

    info!(
        "Created blood request {} for group {}",
        model.id, model.required_blood_group
    );

    // Fire-and-forget: the POST succeeds whether or not the notifier hears
    // about it.
    let job = Job::BloodRequestCreated(BloodRequestCreatedJob {
        request_id: model.id,
        request: Some(RequestSnapshot::from(&model)),
    });
    if let Err(e) = state.queue.send(job).await {
        warn!(
            "Failed to publish creation event for request {}: {}",
            model.id, e
        );
    }

    Ok((StatusCode::CREATED, Json(model.into())))
}

/// List blood requests, newest first
#[utoipa::path(
    get,
    path = "/api/requests",
    tag = "Requests",
    params(
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "Requests", body = [RequestResponse])
    )
)]
async fn list_requests(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<Vec<RequestResponse>>, ApiError> {
    let mut find = blood_requests::Entity::find()
        .order_by_desc(blood_requests::Column::CreatedAt);

    if let Some(status) = &query.status {
        let status = RequestStatus::from_str(status)
            .ok_or_else(|| ApiError::Validation(format!("unknown status: {}", status)))?;
        find = find.filter(blood_requests::Column::Status.eq(status.as_str()));
    }

    let requests = find.all(state.db.as_ref()).await?;
    Ok(Json(requests.into_iter().map(Into::into).collect()))
}

/// Update a request's status
///
/// Status transitions never re-trigger donor notifications.
#[utoipa::path(
    put,
    path = "/api/requests/{id}/status",
    tag = "Requests",
    params(("id" = Uuid, Path, description = "Request id")),
    request_body = UpdateRequestStatusBody,
    responses(
        (status = 200, description = "Updated", body = RequestResponse),
        (status = 404, description = "Request not found")
    )
)]
async fn update_request_status(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRequestStatusBody>,
) -> Result<Json<RequestResponse>, ApiError> {
    let status = RequestStatus::from_str(&body.status)
        .ok_or_else(|| ApiError::Validation(format!("unknown status: {}", body.status)))?;

    let request = blood_requests::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("request {}", id)))?;

    let mut active: blood_requests::ActiveModel = request.into();
    active.status = Set(status.as_str().to_string());
    let updated = active.update(state.db.as_ref()).await?;

    let job = Job::RequestStatusChanged(RequestStatusChangedJob {
        request_id: updated.id,
        status: updated.status.clone(),
    });
    if let Err(e) = state.queue.send(job).await {
        warn!(
            "Failed to publish status change for request {}: {}",
            updated.id, e
        );
    }

    Ok(Json(updated.into()))
}

/// Register a donor profile
#[utoipa::path(
    post,
    path = "/api/donors",
    tag = "Donors",
    request_body = CreateDonorBody,
    responses(
        (status = 201, description = "Donor registered", body = DonorResponse),
        (status = 400, description = "Validation error")
    )
)]
async fn create_donor(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<CreateDonorBody>,
) -> Result<(StatusCode, Json<DonorResponse>), ApiError> {
    let blood_group = validate_blood_group(&body.blood_group)?;

    let now = Utc::now();
    let model = donors::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(body.user_id),
        email: Set(body.email),
        full_name: Set(body.full_name),
        blood_group: Set(blood_group.as_str().to_string()),
        phone_number: Set(body.phone_number),
        is_available: Set(true),
        is_profile_active: Set(true),
        is_verified: Set(None),
        show_contact: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(state.db.as_ref())
    .await?;

    info!(
        "Registered donor {} with blood group {}",
        model.id, model.blood_group
    );

    let job = Job::DonorRegistered(DonorRegisteredJob {
        donor_id: model.id,
        blood_group: model.blood_group.clone(),
    });
    if let Err(e) = state.queue.send(job).await {
        warn!("Failed to publish donor registration {}: {}", model.id, e);
    }

    Ok((StatusCode::CREATED, Json(model.into())))
}

/// List available, active donors
#[utoipa::path(
    get,
    path = "/api/donors",
    tag = "Donors",
    params(
        ("blood_group" = Option<String>, Query, description = "Filter by blood group")
    ),
    responses(
        (status = 200, description = "Donors", body = [DonorResponse])
    )
)]
async fn list_donors(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListDonorsQuery>,
) -> Result<Json<Vec<DonorResponse>>, ApiError> {
    let mut find = donors::Entity::find()
        .filter(donors::Column::IsAvailable.eq(true))
        .filter(donors::Column::IsProfileActive.eq(true))
        .order_by_asc(donors::Column::FullName);

    if let Some(group) = &query.blood_group {
        let group = validate_blood_group(group)?;
        find = find.filter(donors::Column::BloodGroup.eq(group.as_str()));
    }

    let donors = find.all(state.db.as_ref()).await?;
    Ok(Json(donors.into_iter().map(Into::into).collect()))
}

/// Toggle a donor's availability
#[utoipa::path(
    put,
    path = "/api/donors/{id}/availability",
    tag = "Donors",
    params(("id" = Uuid, Path, description = "Donor id")),
    request_body = UpdateAvailabilityBody,
    responses(
        (status = 200, description = "Updated", body = DonorResponse),
        (status = 404, description = "Donor not found")
    )
)]
async fn update_donor_availability(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAvailabilityBody>,
) -> Result<Json<DonorResponse>, ApiError> {
    let donor = donors::Entity::find_by_id(id)
        .one(state.db.as_ref())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("donor {}", id)))?;

    let mut active: donors::ActiveModel = donor.into();
    active.is_available = Set(body.is_available);
    active.updated_at = Set(Utc::now());
    let updated = active.update(state.db.as_ref()).await?;

    Ok(Json(updated.into()))
}

/// Build the API router
pub fn configure_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/requests", get(list_requests).post(create_request))
        .route("/api/requests/{id}/status", put(update_request_status))
        .route("/api/donors", get(list_donors).post(create_donor))
        .route("/api/donors/{id}/availability", put(update_donor_availability))
        .with_state(state)
}
