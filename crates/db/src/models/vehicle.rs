use electo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vehicle {
    pub id: DbId,
    pub organization_id: DbId,
    pub license_plate: String,
    pub description: String,
    pub capacity: i32,
    pub status: String,
    pub assigned_dirigente_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Fleet listing row joined with the assigned dirigente's name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct VehicleWithDirigente {
    pub id: DbId,
    pub organization_id: DbId,
    pub license_plate: String,
    pub description: String,
    pub capacity: i32,
    pub status: String,
    pub assigned_dirigente_id: Option<DbId>,
    pub assigned_dirigente_name: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateVehicle {
    pub organization_id: DbId,
    pub license_plate: String,
    pub description: String,
    pub capacity: i32,
    pub status: String,
    pub assigned_dirigente_id: Option<DbId>,
}

/// Partial update. The outer `Option` on `assigned_dirigente_id`
/// distinguishes "leave as is" (`None`) from "set" (`Some(Some(id))`) and
/// "unassign" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UpdateVehicle {
    pub description: Option<String>,
    pub capacity: Option<i32>,
    pub status: Option<String>,
    pub assigned_dirigente_id: Option<Option<DbId>>,
}
