//! Repository for the `profiles` table.

use electo_core::roles::ROLE_DIRIGENTE;
use electo_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::profile::{CreateProfile, DirigenteWithVehicles, Profile, UpdateProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, organization_id, full_name, role, dni, address, operating_barrio, created_at";

/// Provides CRUD operations for profiles, scoped to an organization.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new profile inside an open transaction, returning the created
    /// row. The id must be the id of a user inserted in the same transaction.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateProfile,
    ) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (id, organization_id, full_name, role, dni, address, operating_barrio)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(input.id)
            .bind(input.organization_id)
            .bind(&input.full_name)
            .bind(&input.role)
            .bind(&input.dni)
            .bind(&input.address)
            .bind(&input.operating_barrio)
            .fetch_one(conn)
            .await
    }

    /// Find a profile by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by internal ID within an organization.
    pub async fn find_in_org(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a DNI is already taken within an organization.
    pub async fn dni_exists(
        pool: &PgPool,
        organization_id: DbId,
        dni: &str,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM profiles WHERE organization_id = $1 AND dni = $2)",
        )
        .bind(organization_id)
        .bind(dni)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Whether the given profile is a dirigente of the given organization.
    /// Used to validate vehicle assignment targets.
    pub async fn is_dirigente_in_org(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM profiles
             WHERE id = $1 AND organization_id = $2 AND role = $3)",
        )
        .bind(id)
        .bind(organization_id)
        .bind(ROLE_DIRIGENTE)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// List the dirigentes of an organization with their assigned-vehicle
    /// counts, newest first. `search` filters on name or DNI, case-insensitive.
    pub async fn list_dirigentes(
        pool: &PgPool,
        organization_id: DbId,
        search: Option<&str>,
    ) -> Result<Vec<DirigenteWithVehicles>, sqlx::Error> {
        let query = "SELECT p.id, p.organization_id, p.full_name, p.role, p.dni, p.address,
                            p.operating_barrio, p.created_at,
                            COUNT(v.id) AS vehicles_count
                     FROM profiles p
                     LEFT JOIN vehicles v ON v.assigned_dirigente_id = p.id
                     WHERE p.organization_id = $1
                       AND p.role = $2
                       AND ($3::text IS NULL OR p.full_name ILIKE '%' || $3 || '%'
                            OR p.dni ILIKE '%' || $3 || '%')
                     GROUP BY p.id
                     ORDER BY p.created_at DESC";
        sqlx::query_as::<_, DirigenteWithVehicles>(query)
            .bind(organization_id)
            .bind(ROLE_DIRIGENTE)
            .bind(search)
            .fetch_all(pool)
            .await
    }

    /// List every dirigente profile of an organization, oldest first.
    pub async fn list_dirigente_profiles(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles
             WHERE organization_id = $1 AND role = $2
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(organization_id)
            .bind(ROLE_DIRIGENTE)
            .fetch_all(pool)
            .await
    }

    /// Update a profile within an organization. Only non-`None` fields in
    /// `input` are applied.
    ///
    /// Returns `None` if no matching row exists.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                full_name = COALESCE($3, full_name),
                dni = COALESCE($4, dni),
                address = COALESCE($5, address),
                operating_barrio = COALESCE($6, operating_barrio)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.full_name)
            .bind(&input.dni)
            .bind(&input.address)
            .bind(&input.operating_barrio)
            .fetch_optional(pool)
            .await
    }
}
