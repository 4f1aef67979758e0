//! Donor profiles entity

use bloodlink_core::DbDateTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "donors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    /// Nullable to tolerate legacy records; donors without an email are
    /// skipped at notification time.
    pub email: Option<String>,
    pub full_name: String,
    pub blood_group: String,
    pub phone_number: String,
    pub is_available: bool,
    pub is_profile_active: bool,
    pub is_verified: Option<bool>,
    pub show_contact: Option<bool>,
    pub created_at: DbDateTime,
    pub updated_at: DbDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
