use electo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: DbId,
    pub organization_id: DbId,
    pub full_name: String,
    pub role: String,
    pub dni: String,
    pub address: String,
    pub operating_barrio: Option<String>,
    pub created_at: Timestamp,
}

/// Dirigente listing row with the number of vehicles currently assigned.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DirigenteWithVehicles {
    pub id: DbId,
    pub organization_id: DbId,
    pub full_name: String,
    pub role: String,
    pub dni: String,
    pub address: String,
    pub operating_barrio: Option<String>,
    pub created_at: Timestamp,
    pub vehicles_count: i64,
}

/// Shares the user's id; callers insert the user row first.
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub id: DbId,
    pub organization_id: DbId,
    pub full_name: String,
    pub role: String,
    pub dni: String,
    pub address: String,
    pub operating_barrio: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub dni: Option<String>,
    pub address: Option<String>,
    pub operating_barrio: Option<String>,
}
