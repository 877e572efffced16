use electo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A mobilized voter registration. Immutable once created.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MobilizedVoter {
    pub id: DbId,
    pub organization_id: DbId,
    pub full_name: String,
    pub dni: String,
    pub phone: String,
    pub destination_school: String,
    pub registered_by: Option<DbId>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateVoter {
    pub organization_id: DbId,
    pub full_name: String,
    pub dni: String,
    pub phone: String,
    pub destination_school: String,
    pub registered_by: DbId,
}
