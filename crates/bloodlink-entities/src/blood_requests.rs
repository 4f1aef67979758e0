//! Blood requests entity

use bloodlink_core::{DbDateTime, RequestSnapshot};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "blood_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub requester_id: String,
    pub requester_email: String,
    pub patient_name: String,
    pub required_blood_group: String,
    pub units_required: i32,
    pub hospital_name: String,
    pub hospital_location: Option<String>,
    pub urgency: String,
    pub contact_person: String,
    pub contact_number: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub additional_info: Option<String>,
    pub status: String,
    pub created_at: DbDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Model> for RequestSnapshot {
    fn from(model: &Model) -> Self {
        RequestSnapshot {
            id: model.id,
            patient_name: model.patient_name.clone(),
            required_blood_group: model.required_blood_group.clone(),
            units_required: model.units_required,
            hospital_name: model.hospital_name.clone(),
            hospital_location: model.hospital_location.clone(),
            urgency: Some(model.urgency.clone()),
            contact_person: model.contact_person.clone(),
            contact_number: model.contact_number.clone(),
            additional_info: model.additional_info.clone(),
            status: model.status.clone(),
        }
    }
}
