use electo_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}
