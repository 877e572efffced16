//! Repository for the `vehicles` table.

use electo_core::import::ValidVehicleRow;
use electo_core::status::VehicleStatus;
use electo_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::vehicle::{CreateVehicle, UpdateVehicle, Vehicle, VehicleWithDirigente};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, license_plate, description, capacity, \
                        status, assigned_dirigente_id, created_at";

/// Provides CRUD operations for vehicles, scoped to an organization.
pub struct VehicleRepo;

impl VehicleRepo {
    /// Insert a new vehicle, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateVehicle) -> Result<Vehicle, sqlx::Error> {
        let query = format!(
            "INSERT INTO vehicles (organization_id, license_plate, description, capacity, status, assigned_dirigente_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(input.organization_id)
            .bind(&input.license_plate)
            .bind(&input.description)
            .bind(input.capacity)
            .bind(&input.status)
            .bind(input.assigned_dirigente_id)
            .fetch_one(pool)
            .await
    }

    /// Find a vehicle by internal ID within an organization.
    pub async fn find_in_org(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vehicles WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List an organization's fleet joined with assigned dirigente names,
    /// newest first. `search` filters on plate or description; `status`
    /// filters on the exact canonical value.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        search: Option<&str>,
        status: Option<&str>,
    ) -> Result<Vec<VehicleWithDirigente>, sqlx::Error> {
        let query = "SELECT v.id, v.organization_id, v.license_plate, v.description, v.capacity,
                            v.status, v.assigned_dirigente_id, p.full_name AS assigned_dirigente_name,
                            v.created_at
                     FROM vehicles v
                     LEFT JOIN profiles p ON p.id = v.assigned_dirigente_id
                     WHERE v.organization_id = $1
                       AND ($2::text IS NULL OR v.license_plate ILIKE '%' || $2 || '%'
                            OR v.description ILIKE '%' || $2 || '%')
                       AND ($3::text IS NULL OR v.status = $3)
                     ORDER BY v.created_at DESC";
        sqlx::query_as::<_, VehicleWithDirigente>(query)
            .bind(organization_id)
            .bind(search)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// List the vehicles currently assigned to a profile, newest first.
    /// Same projection as [`Self::list`] so both feed the same response.
    pub async fn list_assigned_to(
        pool: &PgPool,
        organization_id: DbId,
        profile_id: DbId,
    ) -> Result<Vec<VehicleWithDirigente>, sqlx::Error> {
        let query = "SELECT v.id, v.organization_id, v.license_plate, v.description, v.capacity,
                            v.status, v.assigned_dirigente_id, p.full_name AS assigned_dirigente_name,
                            v.created_at
                     FROM vehicles v
                     LEFT JOIN profiles p ON p.id = v.assigned_dirigente_id
                     WHERE v.organization_id = $1 AND v.assigned_dirigente_id = $2
                     ORDER BY v.created_at DESC";
        sqlx::query_as::<_, VehicleWithDirigente>(query)
            .bind(organization_id)
            .bind(profile_id)
            .fetch_all(pool)
            .await
    }

    /// List every vehicle of an organization, oldest first.
    pub async fn list_all(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<Vehicle>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vehicles WHERE organization_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Update a vehicle within an organization. All fields apply only when
    /// present; for `assigned_dirigente_id`, an explicit null unassigns
    /// while an absent field keeps the current assignment.
    ///
    /// Returns `None` if no matching row exists.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateVehicle,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "UPDATE vehicles SET
                description = COALESCE($3, description),
                capacity = COALESCE($4, capacity),
                status = COALESCE($5, status),
                assigned_dirigente_id = CASE WHEN $6 THEN $7 ELSE assigned_dirigente_id END
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.description)
            .bind(input.capacity)
            .bind(&input.status)
            .bind(input.assigned_dirigente_id.is_some())
            .bind(input.assigned_dirigente_id.flatten())
            .fetch_optional(pool)
            .await
    }

    /// Update only the status of a vehicle. Returns `None` if no matching
    /// row exists.
    pub async fn update_status(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        status: VehicleStatus,
    ) -> Result<Option<Vehicle>, sqlx::Error> {
        let query = format!(
            "UPDATE vehicles SET status = $3
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vehicle>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a vehicle within an organization. Returns `true` if the row
    /// was deleted.
    pub async fn delete(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1 AND organization_id = $2")
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a license plate exists anywhere in the system. Plates are
    /// globally unique across organizations.
    pub async fn plate_exists(pool: &PgPool, license_plate: &str) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM vehicles WHERE license_plate = $1)")
                .bind(license_plate)
                .fetch_one(pool)
                .await?;
        Ok(exists)
    }

    /// Insert a batch of validated import rows inside an open transaction.
    /// Every row lands with status `disponible` and no assigned dirigente.
    pub async fn insert_batch(
        conn: &mut PgConnection,
        organization_id: DbId,
        rows: &[ValidVehicleRow],
    ) -> Result<Vec<Vehicle>, sqlx::Error> {
        let query = format!(
            "INSERT INTO vehicles (organization_id, license_plate, description, capacity, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let mut created = Vec::with_capacity(rows.len());
        for row in rows {
            let vehicle = sqlx::query_as::<_, Vehicle>(&query)
                .bind(organization_id)
                .bind(&row.license_plate)
                .bind(&row.description)
                .bind(row.capacity)
                .bind(VehicleStatus::Disponible.as_str())
                .fetch_one(&mut *conn)
                .await?;
            created.push(vehicle);
        }
        Ok(created)
    }

    /// Count the vehicles of an organization currently in a given status.
    pub async fn count_by_status(
        pool: &PgPool,
        organization_id: DbId,
        status: VehicleStatus,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM vehicles WHERE organization_id = $1 AND status = $2",
        )
        .bind(organization_id)
        .bind(status.as_str())
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Count the vehicles currently assigned to a profile. Used as the
    /// deletion guard for dirigentes.
    pub async fn count_assigned_to(pool: &PgPool, profile_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM vehicles WHERE assigned_dirigente_id = $1")
                .bind(profile_id)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
